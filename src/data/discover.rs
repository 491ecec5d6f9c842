use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use super::error::{Error, Result};
use super::LoadOptions;

/// Order in which fragment files are processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOrder {
    /// Lexical by file name.
    Ascending,
    /// Reverse lexical by file name.
    Descending,
}

/// List the fragment files with the given extension directly inside `dir`.
///
/// Sub-directories are not searched.  The extension match is
/// case-insensitive and given without the leading dot.
pub fn discover_fragments(dir: &Path, extension: &str, order: FileOrder) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::MissingDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoFragments {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if order == FileOrder::Descending {
        files.reverse();
    }
    log::debug!("Discovered {} fragment(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// An opened fragment with its header parsed and the key column located.
pub struct Fragment {
    pub reader: csv::Reader<File>,
    pub headers: StringRecord,
    pub key_idx: usize,
}

/// Open a fragment file and locate the key column in its header.
pub fn open_fragment(path: &Path, options: &LoadOptions) -> Result<Fragment> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(|e| Error::csv(path, e))?;
    let headers = reader.headers().map_err(|e| Error::csv(path, e))?.clone();

    let key_idx = headers
        .iter()
        .position(|h| h == options.key_column)
        .ok_or_else(|| Error::MissingKeyColumn {
            file: path.to_path_buf(),
            key: options.key_column.clone(),
        })?;

    Ok(Fragment {
        reader,
        headers,
        key_idx,
    })
}
