//! Per-design selection state machine
//!
//! One field per category with the arity fixed in the type: the five
//! single-select categories hold `Option<EmbroideryOption>`, the two
//! multi-select categories hold a set (vector with id-checked
//! membership, order irrelevant). Every operation is synchronous and
//! total; there is no reachable invalid state.
//!
//! Incompatibility is advisory metadata: `select` never refuses an
//! option that conflicts with a selection in another category.
//! [`SelectionSet::conflicts`] surfaces the conflicting pairs for the
//! review UI to render.

use crate::models::{EmbroideryOption, OptionCategory, SelectionArity};
use serde::{Deserialize, Serialize};

/// Selection state for one design, one entry per category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SelectionSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<EmbroideryOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<EmbroideryOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<EmbroideryOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing: Option<EmbroideryOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutting: Option<EmbroideryOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub threads: Vec<EmbroideryOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upgrades: Vec<EmbroideryOption>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn single_slot(&self, category: OptionCategory) -> Option<&Option<EmbroideryOption>> {
        match category {
            OptionCategory::Coverage => Some(&self.coverage),
            OptionCategory::Material => Some(&self.material),
            OptionCategory::Border => Some(&self.border),
            OptionCategory::Backing => Some(&self.backing),
            OptionCategory::Cutting => Some(&self.cutting),
            OptionCategory::Threads | OptionCategory::Upgrades => None,
        }
    }

    fn single_slot_mut(&mut self, category: OptionCategory) -> Option<&mut Option<EmbroideryOption>> {
        match category {
            OptionCategory::Coverage => Some(&mut self.coverage),
            OptionCategory::Material => Some(&mut self.material),
            OptionCategory::Border => Some(&mut self.border),
            OptionCategory::Backing => Some(&mut self.backing),
            OptionCategory::Cutting => Some(&mut self.cutting),
            OptionCategory::Threads | OptionCategory::Upgrades => None,
        }
    }

    fn multi_slot(&self, category: OptionCategory) -> Option<&Vec<EmbroideryOption>> {
        match category {
            OptionCategory::Threads => Some(&self.threads),
            OptionCategory::Upgrades => Some(&self.upgrades),
            _ => None,
        }
    }

    fn multi_slot_mut(&mut self, category: OptionCategory) -> Option<&mut Vec<EmbroideryOption>> {
        match category {
            OptionCategory::Threads => Some(&mut self.threads),
            OptionCategory::Upgrades => Some(&mut self.upgrades),
            _ => None,
        }
    }

    /// Select an option in a single-select category.
    ///
    /// Re-selecting the current option clears the category (re-clicking
    /// deselects); any other option replaces the current selection
    /// unconditionally. Called on a multi-select category this behaves
    /// as [`toggle`](Self::toggle), keeping the operation total.
    pub fn select(&mut self, option: EmbroideryOption) {
        let category = option.category;
        match category.arity() {
            SelectionArity::Single => {
                // slot is always Some for single-arity categories
                if let Some(slot) = self.single_slot_mut(category) {
                    match slot {
                        Some(current) if current.id == option.id => *slot = None,
                        _ => *slot = Some(option),
                    }
                }
            }
            SelectionArity::Multi => self.toggle(option),
        }
    }

    /// Toggle an option in a multi-select category: remove it if
    /// present (by id), add it otherwise. Called on a single-select
    /// category this behaves as [`select`](Self::select).
    pub fn toggle(&mut self, option: EmbroideryOption) {
        let category = option.category;
        match category.arity() {
            SelectionArity::Multi => {
                if let Some(set) = self.multi_slot_mut(category) {
                    if let Some(idx) = set.iter().position(|o| o.id == option.id) {
                        set.remove(idx);
                    } else {
                        set.push(option);
                    }
                }
            }
            SelectionArity::Single => self.select(option),
        }
    }

    /// Membership check by option id
    pub fn is_selected(&self, category: OptionCategory, option_id: &str) -> bool {
        match category.arity() {
            SelectionArity::Single => self
                .single_slot(category)
                .and_then(|slot| slot.as_ref())
                .is_some_and(|o| o.id == option_id),
            SelectionArity::Multi => self
                .multi_slot(category)
                .is_some_and(|set| set.iter().any(|o| o.id == option_id)),
        }
    }

    /// Current selection of a single-select category
    pub fn single(&self, category: OptionCategory) -> Option<&EmbroideryOption> {
        self.single_slot(category).and_then(|slot| slot.as_ref())
    }

    /// Current selection set of a multi-select category
    pub fn multi(&self, category: OptionCategory) -> &[EmbroideryOption] {
        self.multi_slot(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every currently selected option across all categories
    pub fn selected_options(&self) -> Vec<&EmbroideryOption> {
        let mut out = Vec::new();
        for category in OptionCategory::ALL {
            match category.arity() {
                SelectionArity::Single => {
                    if let Some(opt) = self.single(category) {
                        out.push(opt);
                    }
                }
                SelectionArity::Multi => out.extend(self.multi(category)),
            }
        }
        out
    }

    /// No selection in any category
    pub fn is_empty(&self) -> bool {
        self.selected_options().is_empty()
    }

    /// True iff every required category has a selection. Optional and
    /// multi-select categories never block finalization.
    pub fn can_finalize(&self) -> bool {
        OptionCategory::ALL
            .iter()
            .filter(|c| c.is_required())
            .all(|c| self.single(*c).is_some())
    }

    /// Advisory: pairs of selected option ids that declare each other
    /// incompatible (either direction counts). Never blocks selection.
    pub fn conflicts(&self) -> Vec<(String, String)> {
        let selected = self.selected_options();
        let mut out = Vec::new();
        for (i, a) in selected.iter().enumerate() {
            for b in &selected[i + 1..] {
                if a.conflicts_with(&b.id) || b.conflicts_with(&a.id) {
                    out.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        out
    }

    /// Clear every category
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
