//! Archive reading: the inverse view of the writer's layout.
//!
//! Used by the round-trip tests and the `blob-pack` inspection CLI. The
//! whole archive is held in memory; entry extraction is a bounds-checked
//! slice of the data section.

use std::path::Path;

use crate::error::ArchiveError;
use crate::{DATA_TAG, ENTRY_TAG, MAGIC};

/// One parsed directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    /// Archive-relative path of the entry.
    pub archive_path: String,
    /// Byte offset of the entry's data, relative to the data section.
    pub offset: u64,
    /// Size of the entry's data in bytes.
    pub size: u64,
}

/// A parsed archive.
pub struct Archive {
    bytes: Vec<u8>,
    records: Vec<DirectoryRecord>,
    data_start: usize,
}

impl Archive {
    /// Read and parse an archive file.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        Self::parse(std::fs::read(path)?)
    }

    /// Parse an archive from raw bytes.
    pub fn parse(bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        let magic: [u8; 8] = read_array(&bytes, 0)?;
        if &magic != MAGIC {
            return Err(ArchiveError::BadMagic(magic));
        }

        let mut records = Vec::new();
        let mut cursor = MAGIC.len();
        let data_start = loop {
            let tag: [u8; 4] = read_array(&bytes, cursor)?;
            cursor += 4;
            if &tag == DATA_TAG {
                break cursor;
            }
            if &tag != ENTRY_TAG {
                return Err(ArchiveError::BadTag(tag));
            }

            let [length] = read_array::<1>(&bytes, cursor)?;
            cursor += 1;
            let length = length as usize;
            let path_bytes = bytes
                .get(cursor..cursor + length)
                .ok_or(ArchiveError::Truncated)?;
            let archive_path = std::str::from_utf8(path_bytes)
                .map_err(|_| ArchiveError::NonUtf8Path(String::from_utf8_lossy(path_bytes).into_owned().into()))?
                .to_owned();
            cursor += length;

            let offset = u64::from_le_bytes(read_array(&bytes, cursor)?);
            cursor += 8;
            let size = u64::from_le_bytes(read_array(&bytes, cursor)?);
            cursor += 8;

            records.push(DirectoryRecord {
                archive_path,
                offset,
                size,
            });
        };

        let data_len = (bytes.len() - data_start) as u64;
        for record in &records {
            let end = record
                .offset
                .checked_add(record.size)
                .ok_or_else(|| ArchiveError::RangeOutOfBounds(record.archive_path.clone()))?;
            if end > data_len {
                return Err(ArchiveError::RangeOutOfBounds(record.archive_path.clone()));
            }
        }

        Ok(Self {
            bytes,
            records,
            data_start,
        })
    }

    /// The parsed directory records, in archive order.
    pub fn records(&self) -> &[DirectoryRecord] {
        &self.records
    }

    /// Find a record by its archive path.
    pub fn record(&self, archive_path: &str) -> Option<&DirectoryRecord> {
        self.records.iter().find(|r| r.archive_path == archive_path)
    }

    /// The raw data bytes of a record.
    pub fn entry_data(&self, record: &DirectoryRecord) -> &[u8] {
        let start = self.data_start + record.offset as usize;
        &self.bytes[start..start + record.size as usize]
    }

    /// Extract an entry's bytes by archive path.
    pub fn extract(&self, archive_path: &str) -> Option<&[u8]> {
        self.record(archive_path).map(|r| self.entry_data(r))
    }
}

fn read_array<const N: usize>(bytes: &[u8], at: usize) -> Result<[u8; N], ArchiveError> {
    let slice = bytes.get(at..at + N).ok_or(ArchiveError::Truncated)?;
    let mut array = [0u8; N];
    array.copy_from_slice(slice);
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ArchiveInput;
    use crate::writer::build_archive;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kiln_archive_reader_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn round_trip_reproduces_file_contents() {
        let dir = temp_dir("roundtrip");
        let contents: [(&str, &[u8]); 3] = [
            ("first.bin", b"first file"),
            ("second.bin", b""),
            ("third.bin", b"\x00\xff\x7f binary \x01"),
        ];
        let mut inputs = Vec::new();
        for (name, data) in contents {
            std::fs::write(dir.join(name), data).unwrap();
            inputs.push(ArchiveInput::new(dir.join(name), name));
        }

        let out = dir.join("out.blob");
        build_archive(&out, &inputs).unwrap();

        let archive = Archive::open(&out).unwrap();
        assert_eq!(archive.records().len(), 3);
        for (name, data) in contents {
            assert_eq!(archive.extract(name).unwrap(), data, "entry {name}");
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_records_match_layout() {
        let dir = temp_dir("records");
        std::fs::write(dir.join("a.bin"), b"12345").unwrap();
        std::fs::write(dir.join("b.bin"), b"678").unwrap();

        let inputs = [
            ArchiveInput::new(dir.join("a.bin"), "a.bin"),
            ArchiveInput::new(dir.join("b.bin"), "b.bin"),
        ];
        let out = dir.join("out.blob");
        build_archive(&out, &inputs).unwrap();

        let archive = Archive::open(&out).unwrap();
        let records = archive.records();
        assert_eq!(records[0].offset, 0);
        assert_eq!(records[0].size, 5);
        assert_eq!(records[1].offset, 5);
        assert_eq!(records[1].size, 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let result = Archive::parse(b"NOTBLOB1DATA".to_vec());
        assert!(matches!(result, Err(ArchiveError::BadMagic(_))));
    }

    #[test]
    fn truncated_header_is_rejected() {
        let result = Archive::parse(b"BLOB".to_vec());
        assert!(matches!(result, Err(ArchiveError::Truncated)));
    }

    #[test]
    fn truncated_record_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"BLOBBY01");
        bytes.extend_from_slice(b"ENTR");
        bytes.push(5);
        bytes.extend_from_slice(b"ab");
        let result = Archive::parse(bytes);
        assert!(matches!(result, Err(ArchiveError::Truncated)));
    }

    #[test]
    fn bad_tag_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"BLOBBY01");
        bytes.extend_from_slice(b"XXXX");
        let result = Archive::parse(bytes);
        assert!(matches!(result, Err(ArchiveError::BadTag(_))));
    }

    #[test]
    fn out_of_range_entry_is_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"BLOBBY01");
        bytes.extend_from_slice(b"ENTR");
        bytes.push(1);
        bytes.extend_from_slice(b"f");
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&100u64.to_le_bytes());
        bytes.extend_from_slice(b"DATA");
        bytes.extend_from_slice(b"short");
        let result = Archive::parse(bytes);
        assert!(matches!(result, Err(ArchiveError::RangeOutOfBounds(_))));
    }
}
