//! Write rendered files to a directory or a zip archive.
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::codegen::RenderedFiles;
use crate::error::BundleError;

/// Write each file under `dir`, creating it if needed. Existing files with the
/// same names are replaced.
pub fn write_to_dir(files: &RenderedFiles, dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
    if files.is_empty() {
        return Err(BundleError::Empty);
    }
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(files.len());
    for (file_name, text) in files {
        let path = dir.join(file_name);
        fs::write(&path, text)?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "wrote sources");
    Ok(written)
}

/// Pack every file into a flat, deflated zip archive at `path`.
pub fn write_zip(files: &RenderedFiles, path: &Path) -> Result<(), BundleError> {
    if files.is_empty() {
        return Err(BundleError::Empty);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (file_name, text) in files {
        zip.start_file(file_name.as_str(), options)?;
        zip.write_all(text.as_bytes())?;
    }
    zip.finish()?;
    info!(archive = %path.display(), files = files.len(), "wrote archive");
    Ok(())
}
