//! Archive extraction for fragment bundles.
//!
//! Supported formats, chosen by file name:
//! * `.zip`
//! * `.tar.gz` / `.tgz`

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::data::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Format implied by the archive's file name, if supported.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else {
            None
        }
    }
}

/// Extract the whole archive into `dest`, creating it if needed.
///
/// Returns the extracted regular files, sorted.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let format = ArchiveFormat::detect(archive).ok_or_else(|| Error::UnsupportedArchive {
        path: archive.to_path_buf(),
    })?;

    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
    let file = File::open(archive).map_err(|e| Error::io(archive, e))?;

    let mut files = match format {
        ArchiveFormat::Zip => extract_zip(file, archive, dest)?,
        ArchiveFormat::TarGz => extract_tar_gz(file, archive, dest)?,
    };
    files.sort();

    log::info!(
        "Extracted {} file(s) from {} into {}",
        files.len(),
        archive.display(),
        dest.display()
    );
    Ok(files)
}

fn extract_zip(file: File, archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let zip_err = |source| Error::Zip {
        path: archive.to_path_buf(),
        source,
    };
    let mut zip = zip::ZipArchive::new(file).map_err(zip_err)?;

    let mut files = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip.by_index(i).map_err(zip_err)?;
        if entry.is_file() {
            if let Some(name) = entry.enclosed_name() {
                files.push(dest.join(name));
            }
        }
    }

    zip.extract(dest).map_err(zip_err)?;
    Ok(files)
}

fn extract_tar_gz(file: File, archive: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |e| Error::io(archive, e);
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    let mut files = Vec::new();
    for entry in tar.entries().map_err(io_err)? {
        let mut entry = entry.map_err(io_err)?;
        let path = entry.path().map_err(io_err)?.into_owned();
        let is_file = entry.header().entry_type().is_file();
        // unpack_in refuses paths escaping `dest` and reports it with `false`
        if entry.unpack_in(dest).map_err(io_err)? && is_file {
            files.push(dest.join(path));
        }
    }
    Ok(files)
}
