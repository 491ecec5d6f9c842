use std::collections::HashSet;
use std::path::Path;

use super::discover::{discover_fragments, open_fragment, FileOrder};
use super::error::{Error, Result};
use super::model::{file_label, Column, Key, MergedTable, Timed};
use super::LoadOptions;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Merge every fragment file in `dir` into one wide table aligned on the key
/// column.
///
/// Fragments are processed in reverse lexical file-name order.  Rows are
/// matched by key value, never by position, and the result holds one row per
/// distinct key (outer alignment).  A column name used by two fragments yields
/// two distinct columns.
///
/// Errors:
/// * missing directory or no matching files → [`Error::MissingDirectory`] /
///   [`Error::NoFragments`]
/// * a fragment without the key column → [`Error::MissingKeyColumn`]
/// * the same key twice inside one fragment → [`Error::DuplicateKey`]
pub fn merge_fragments(dir: &Path, options: &LoadOptions) -> Result<Timed<MergedTable>> {
    let timed = Timed::measure(|| {
        let files = discover_fragments(dir, &options.extension, FileOrder::Descending)?;
        let mut table = MergedTable::new(options.key_column.as_str());
        for file in &files {
            merge_fragment(&mut table, file, options)?;
        }
        table.finish();
        Ok::<_, Error>(table)
    })?;

    log::info!(
        "Merged {} rows x {} columns from {} in {:.4}s",
        timed.value.len(),
        timed.value.columns().len(),
        dir.display(),
        timed.elapsed
    );
    Ok(timed)
}

// ---------------------------------------------------------------------------
// Per-fragment merge
// ---------------------------------------------------------------------------

fn merge_fragment(table: &mut MergedTable, path: &Path, options: &LoadOptions) -> Result<()> {
    let mut fragment = open_fragment(path, options)?;
    let key_idx = fragment.key_idx;

    // (field index in this fragment, column index in the table)
    let targets: Vec<(usize, usize)> = fragment
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key_idx)
        .map(|(i, name)| (i, table.push_column(Column::new(name, path))))
        .collect();

    let mut seen = HashSet::new();
    let mut rows = 0usize;
    for result in fragment.reader.records() {
        let record = result.map_err(|e| Error::csv(path, e))?;
        let key = Key::parse(record.get(key_idx).unwrap_or(""));
        if !seen.insert(key.clone()) {
            return Err(Error::DuplicateKey {
                file: path.to_path_buf(),
                key: key.to_string(),
            });
        }

        let row = table.row_for(key);
        for &(field, column) in &targets {
            let value = record
                .get(field)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            table.set_cell(column, row, value);
        }
        rows += 1;
    }

    log::debug!(
        "{}: {} rows, {} columns",
        file_label(path),
        rows,
        targets.len()
    );
    Ok(())
}
