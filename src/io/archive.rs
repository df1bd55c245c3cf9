use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// A named file destined for the output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Packs the entries into a deflate-compressed zip archive, in order.
pub fn pack(entries: &[ArchiveEntry]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Packs the entries and writes the archive to `path`.
pub fn write_archive(path: &Path, entries: &[ArchiveEntry]) -> Result<()> {
    let bytes = pack(entries)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Writes each entry as a separate file inside `dir`, creating it if needed.
pub fn write_directory(dir: &Path, entries: &[ArchiveEntry]) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for entry in entries {
        std::fs::write(dir.join(&entry.name), &entry.bytes)?;
    }
    Ok(())
}
