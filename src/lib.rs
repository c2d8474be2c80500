// TaskRoll - Roll a random task from user-defined categories

pub mod categories;
pub mod config;
pub mod error;
pub mod exporter;
pub mod format;
pub mod importer;
pub mod models;
pub mod selector;
pub mod store;

// Re-export main types for convenience
pub use categories::CATEGORIES_KEY;
pub use config::Config;
pub use error::{Result, RollError};
pub use exporter::{ExportResult, Permission, WritePermission};
pub use format::Format;
pub use importer::ImportResult;
pub use models::{Category, KeyedCategory, Task, TimeBucket, now_ms};
pub use selector::Selection;
pub use store::{KeyValue, MemoryStore, Store};
