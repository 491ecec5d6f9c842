//! Merge column-partitioned CSV fragments into one key-aligned table, index
//! their rows by key, and query the result.
//!
//! ```text
//!  archive (.zip / .tar.gz) ──extract──▶ dir/*.csv ──┬─▶ merge_fragments ─▶ MergedTable
//!                                                    └─▶ build_index     ─▶ RecordIndex
//! ```

pub mod archive;
pub mod config;
pub mod data;
pub mod report;
pub mod series;

pub use archive::extract_archive;
pub use data::error::{Error, ErrorKind, Result};
pub use data::index::{build_index, Fields, RecordIndex};
pub use data::loader::merge_fragments;
pub use data::model::{Key, MergedTable, Timed};
pub use data::{KeyPolicy, LoadOptions};
