//! Bit-exact archive serialization.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ArchiveError;
use crate::layout::{layout_entries, ArchiveEntry, ArchiveInput};
use crate::{DATA_TAG, ENTRY_TAG, MAGIC};

/// Build an archive at `destination` from the given input pairs.
///
/// Lays out the full entry table first, then streams the directory and the
/// data section. Returns the entry table that was written. Fails fast on
/// any error; a failed build may leave a truncated file at `destination`.
pub fn build_archive(
    destination: &Path,
    inputs: &[ArchiveInput],
) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let entries = layout_entries(inputs)?;
    let file = File::create(destination)?;
    let mut writer = BufWriter::new(file);
    write_archive(&mut writer, &entries)?;
    writer.flush()?;
    log::info!(
        "packed {} entries into {}",
        entries.len(),
        destination.display()
    );
    Ok(entries)
}

/// Serialize a laid-out entry table and its data section to `writer`.
pub fn write_archive(
    writer: &mut impl Write,
    entries: &[ArchiveEntry],
) -> Result<(), ArchiveError> {
    writer.write_all(MAGIC)?;
    for entry in entries {
        let path = entry.archive_path.as_bytes();
        writer.write_all(ENTRY_TAG)?;
        writer.write_all(&[path.len() as u8])?;
        writer.write_all(path)?;
        writer.write_all(&entry.offset.to_le_bytes())?;
        writer.write_all(&entry.size.to_le_bytes())?;
    }
    writer.write_all(DATA_TAG)?;
    for entry in entries {
        let mut source = File::open(&entry.source)?;
        let copied = std::io::copy(&mut source, writer)?;
        if copied != entry.size {
            return Err(ArchiveError::SourceChanged(entry.source.clone()));
        }
    }
    Ok(())
}
