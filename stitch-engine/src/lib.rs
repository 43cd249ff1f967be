//! Embroidery customization and pricing engine
//!
//! Turns a user-supplied design, physical dimensions, and a set of
//! mutually-constrained option selections into a reproducible price
//! quote, and keeps in-progress work persisted across reloads without
//! ever touching unrelated stored state.
//!
//! Entry point is [`manager::CustomizationManager`]: one owned handle
//! per product customization, synchronous operations only.

pub mod catalog;
pub mod manager;
pub mod pricing;
pub mod storage;

pub use catalog::{OptionCatalog, OptionSource, SourceError};
pub use manager::{CustomizationManager, FileUpload};
pub use pricing::MaterialRates;
pub use storage::{KvStore, MemoryKvStore, RedbKvStore, SessionStore, StoreError};
