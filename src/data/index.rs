use std::collections::BTreeMap;
use std::path::Path;

use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::discover::{discover_fragments, open_fragment, FileOrder};
use super::error::{Error, Result};
use super::model::{file_label, Timed};
use super::{KeyPolicy, LoadOptions};

// ---------------------------------------------------------------------------
// Fields – schema-agnostic record
// ---------------------------------------------------------------------------

/// The non-key fields of one row, by column name, as raw strings.
///
/// Use this when the fragment schema is not known at compile time; otherwise
/// index into a `#[derive(Deserialize)]` struct instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RecordIndex
// ---------------------------------------------------------------------------

/// Integer key → record, accumulated row by row over every fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordIndex<R = Fields> {
    key_column: String,
    entries: BTreeMap<i64, R>,
    skipped: usize,
}

impl<R> RecordIndex<R> {
    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    pub fn get(&self, key: i64) -> Option<&R> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: i64) -> bool {
        self.entries.contains_key(&key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &R)> {
        self.entries.iter().map(|(k, r)| (*k, r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows dropped because their key could not be read as an integer
    /// (lenient policy only).
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Index every row of every fragment in `dir` by its integer key.
///
/// Fragments are processed in ascending file-name order.  Each row's non-key
/// fields are deserialized into `R`; a later row with the same key replaces
/// the earlier record as a whole, fields are never merged.
///
/// A key cell that is not an integer aborts with [`Error::KeyCoercion`] under
/// [`KeyPolicy::Strict`] and is skipped (and counted) under
/// [`KeyPolicy::Lenient`].
pub fn build_index<R: DeserializeOwned>(
    dir: &Path,
    options: &LoadOptions,
) -> Result<Timed<RecordIndex<R>>> {
    let timed = Timed::measure(|| {
        let files = discover_fragments(dir, &options.extension, FileOrder::Ascending)?;
        let mut index = RecordIndex {
            key_column: options.key_column.clone(),
            entries: BTreeMap::new(),
            skipped: 0,
        };
        for file in &files {
            index_fragment(&mut index, file, options)?;
        }
        Ok::<_, Error>(index)
    })?;

    log::info!(
        "Indexed {} keys from {} in {:.4}s ({} rows skipped)",
        timed.value.len(),
        dir.display(),
        timed.elapsed,
        timed.value.skipped
    );
    Ok(timed)
}

fn index_fragment<R: DeserializeOwned>(
    index: &mut RecordIndex<R>,
    path: &Path,
    options: &LoadOptions,
) -> Result<()> {
    let mut fragment = open_fragment(path, options)?;
    let key_idx = fragment.key_idx;
    let rest_headers = without(&fragment.headers, key_idx);

    let mut replaced = 0usize;
    for result in fragment.reader.records() {
        let record = result.map_err(|e| Error::csv(path, e))?;
        let raw = record.get(key_idx).unwrap_or("");

        let key = match raw.trim().parse::<i64>() {
            Ok(key) => key,
            Err(_) => {
                let line = record.position().map_or(0, |p| p.line());
                match options.key_policy {
                    KeyPolicy::Strict => {
                        return Err(Error::KeyCoercion {
                            file: path.to_path_buf(),
                            line,
                            value: raw.to_string(),
                        })
                    }
                    KeyPolicy::Lenient => {
                        log::warn!(
                            "{} line {line}: skipping row with malformed key '{raw}'",
                            file_label(path)
                        );
                        index.skipped += 1;
                        continue;
                    }
                }
            }
        };

        let rest = without(&record, key_idx);
        let value: R = rest
            .deserialize(Some(&rest_headers))
            .map_err(|e| Error::csv(path, e))?;
        if index.entries.insert(key, value).is_some() {
            replaced += 1;
        }
    }

    log::debug!("{}: {} records replaced", file_label(path), replaced);
    Ok(())
}

/// Copy of `record` without the field at `skip`.
fn without(record: &StringRecord, skip: usize) -> StringRecord {
    record
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, v)| v)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::data::error::ErrorKind;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).expect("should write fragment");
    }

    fn two_fragments() -> TempDir {
        let dir = TempDir::new().expect("should create temp dir");
        write(&dir, "a.csv", "id,value1,value2\n1,100,casa\n2,200,piso\n");
        write(&dir, "b.csv", "id,value3,value4\n3,300,solar\n4,400,piso\n");
        dir
    }

    #[test]
    fn indexes_every_row_by_integer_key() {
        //* Given
        let dir = two_fragments();

        //* When
        let index = build_index::<Fields>(dir.path(), &LoadOptions::default())
            .expect("should index")
            .value;

        //* Then
        assert_eq!(index.keys().collect::<Vec<_>>(), [1, 2, 3, 4]);
        assert_eq!(index.get(1).and_then(|r| r.get("value1")), Some("100"));
        assert_eq!(index.get(2).and_then(|r| r.get("value2")), Some("piso"));
        assert_eq!(index.get(3).and_then(|r| r.get("value4")), Some("solar"));
        assert_eq!(index.get(1).map(Fields::len), Some(2));
        assert!(index.get(1).and_then(|r| r.get("id")).is_none());
    }

    #[test]
    fn later_file_replaces_whole_record() {
        //* Given
        let dir = TempDir::new().expect("should create temp dir");
        write(&dir, "a.csv", "id,name,status\n7,Old,Ended\n");
        write(&dir, "b.csv", "id,name\n7,New\n");

        //* When
        let index = build_index::<Fields>(dir.path(), &LoadOptions::default())
            .expect("should index")
            .value;

        //* Then
        let record = index.get(7).expect("key 7");
        assert_eq!(record.get("name"), Some("New"));
        assert_eq!(record.get("status"), None);
    }

    #[test]
    fn typed_records_deserialize_from_rows() {
        #[derive(Debug, Deserialize)]
        struct Sample {
            value1: Option<u32>,
            value4: Option<String>,
        }

        let dir = two_fragments();
        let index = build_index::<Sample>(dir.path(), &LoadOptions::default())
            .expect("should index")
            .value;

        assert_eq!(index.get(1).and_then(|s| s.value1), Some(100));
        assert_eq!(index.get(1).and_then(|s| s.value4.clone()), None);
        assert_eq!(index.get(4).and_then(|s| s.value4.as_deref()), Some("piso"));
    }

    #[test]
    fn strict_policy_rejects_malformed_key() {
        let dir = TempDir::new().expect("should create temp dir");
        write(&dir, "a.csv", "id,name\n1,ok\nabc,bad\n");

        let err = build_index::<Fields>(dir.path(), &LoadOptions::default()).expect_err("should fail");

        assert_eq!(err.kind(), ErrorKind::KeyCoercion);
        match err {
            Error::KeyCoercion { line, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lenient_policy_skips_and_counts_malformed_keys() {
        let dir = TempDir::new().expect("should create temp dir");
        write(&dir, "a.csv", "id,name\n1,ok\nabc,bad\n2,fine\n");
        let options = LoadOptions {
            key_policy: KeyPolicy::Lenient,
            ..LoadOptions::default()
        };

        let index = build_index::<Fields>(dir.path(), &options).expect("should index").value;

        assert_eq!(index.len(), 2);
        assert_eq!(index.skipped(), 1);
        assert!(index.contains(2));
    }

    #[test]
    fn same_directory_twice_gives_identical_index() {
        let dir = two_fragments();
        let first = build_index::<Fields>(dir.path(), &LoadOptions::default()).expect("should index");
        let second = build_index::<Fields>(dir.path(), &LoadOptions::default()).expect("should index");
        assert_eq!(first.value, second.value);
    }
}
