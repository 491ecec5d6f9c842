use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Error – everything that can abort a load
// ---------------------------------------------------------------------------

/// Broad classification of an [`Error`], used by callers that only care
/// about what went wrong, not where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing directory, or no fragment files in it.
    Input,
    /// Unsupported archive, or a fragment without the key column.
    Format,
    /// A key cell could not be converted to the key type.
    KeyCoercion,
    /// The same key appears twice within one fragment.
    DuplicateKey,
    /// Underlying I/O, CSV or archive failure.
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no input: directory '{}' does not exist", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("no input: no '.{extension}' files found in '{}'", dir.display())]
    NoFragments { dir: PathBuf, extension: String },

    #[error("schema: '{}' has no '{key}' column", file.display())]
    MissingKeyColumn { file: PathBuf, key: String },

    #[error("unsupported archive format: '{}' (expected .zip, .tar.gz or .tgz)", path.display())]
    UnsupportedArchive { path: PathBuf },

    #[error("malformed key '{value}' in '{}' line {line}", file.display())]
    KeyCoercion {
        file: PathBuf,
        line: u64,
        value: String,
    },

    #[error("duplicate key '{key}' in fragment '{}'", file.display())]
    DuplicateKey { file: PathBuf, key: String },

    #[error("failed to access '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}'", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to extract '{}'", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingDirectory { .. } | Error::NoFragments { .. } => ErrorKind::Input,
            Error::MissingKeyColumn { .. } | Error::UnsupportedArchive { .. } => ErrorKind::Format,
            Error::KeyCoercion { .. } => ErrorKind::KeyCoercion,
            Error::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Error::Io { .. } | Error::Csv { .. } | Error::Zip { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
