/// Data layer: discovery, merging, indexing and querying of fragment files.
///
/// Architecture:
/// ```text
///   dir/*.csv  (fragments sharing a key column)
///        │
///        ├──────────────────────────┐
///        ▼                          ▼
///   ┌──────────┐              ┌──────────┐
///   │  loader   │ outer-align  │  index    │ row-wise, last
///   └──────────┘ by key        └──────────┘ file wins
///        │                          │
///        ▼                          ▼
///   ┌─────────────┐           ┌─────────────┐
///   │ MergedTable  │           │ RecordIndex  │
///   └─────────────┘           └─────────────┘
///        │
///        ▼
///   ┌──────────────────────────────┐
///   │ filter / transform / aggregate │  masks, dates, group counts
///   └──────────────────────────────┘
/// ```
pub mod aggregate;
pub mod discover;
pub mod error;
pub mod filter;
pub mod index;
pub mod loader;
pub mod model;
pub mod transform;

use serde::{Deserialize, Serialize};

/// What to do with a row whose key is not an integer when indexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPolicy {
    /// Abort the whole load.
    #[default]
    Strict,
    /// Skip the row and log a warning.
    Lenient,
}

/// Options shared by the loader and the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Name of the join key column.
    pub key_column: String,
    /// Fragment file extension, without the dot.
    pub extension: String,
    pub delimiter: u8,
    pub key_policy: KeyPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            key_column: "id".to_string(),
            extension: "csv".to_string(),
            delimiter: b',',
            key_policy: KeyPolicy::Strict,
        }
    }
}
