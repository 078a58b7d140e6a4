//! Input expansion and directory layout.
//!
//! The archive is built in two passes: the full entry table (paths,
//! offsets, sizes) is computed here before any byte of the archive is
//! written.

use std::path::{Path, PathBuf};

use crate::error::ArchiveError;

/// Maximum encoded length of an archive path, in UTF-8 bytes.
pub const MAX_PATH_BYTES: usize = 255;

/// One `(source path, archive path)` input pair.
///
/// A source naming a directory expands into one entry per contained file,
/// with each file's archive path joined from the declared archive path and
/// the file's path relative to the scanned directory root.
#[derive(Debug, Clone)]
pub struct ArchiveInput {
    /// Filesystem path of the file or directory to pack.
    pub source: PathBuf,
    /// Archive-relative path (or directory prefix) to record.
    pub archive_path: String,
}

impl ArchiveInput {
    /// Create an input pair.
    pub fn new(source: impl Into<PathBuf>, archive_path: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            archive_path: archive_path.into(),
        }
    }
}

/// A fully laid-out directory entry.
///
/// Offsets are assigned by a single monotonically increasing cursor over
/// the concatenation order of entries, with no padding between entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Filesystem path the data will be read from.
    pub source: PathBuf,
    /// Path recorded in the archive directory.
    pub archive_path: String,
    /// Byte offset of the entry's data, relative to the data section.
    pub offset: u64,
    /// Size of the entry's data in bytes.
    pub size: u64,
}

/// Expand input pairs into the final entry table and assign offsets.
///
/// Directory inputs are walked recursively; walk order follows
/// `read_dir`, which is not normalized across platforms. Single-file
/// inputs keep exactly the order they were given in.
///
/// Fails with [`ArchiveError::NoInputs`] for an empty input list and
/// [`ArchiveError::PathTooLong`] if any resulting archive path encodes to
/// more than [`MAX_PATH_BYTES`] bytes. Filesystem errors propagate.
pub fn layout_entries(inputs: &[ArchiveInput]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    if inputs.is_empty() {
        return Err(ArchiveError::NoInputs);
    }

    let mut files: Vec<(PathBuf, String, u64)> = Vec::new();
    for input in inputs {
        let meta = std::fs::metadata(&input.source)?;
        if meta.is_dir() {
            collect_dir(&input.source, &input.archive_path, &mut files)?;
        } else {
            files.push((input.source.clone(), input.archive_path.clone(), meta.len()));
        }
    }

    let mut entries = Vec::with_capacity(files.len());
    let mut cursor = 0u64;
    for (source, archive_path, size) in files {
        let length = archive_path.len();
        if length > MAX_PATH_BYTES {
            return Err(ArchiveError::PathTooLong {
                path: archive_path,
                length,
            });
        }
        entries.push(ArchiveEntry {
            source,
            archive_path,
            offset: cursor,
            size,
        });
        cursor += size;
    }

    log::debug!(
        "laid out {} entries, {} data bytes",
        entries.len(),
        cursor
    );
    Ok(entries)
}

fn collect_dir(
    root: &Path,
    prefix: &str,
    out: &mut Vec<(PathBuf, String, u64)>,
) -> Result<(), ArchiveError> {
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        let name = entry
            .file_name()
            .into_string()
            .map_err(|name| ArchiveError::NonUtf8Path(root.join(name)))?;
        let archive_path = join_archive_path(prefix, &name);
        let meta = entry.metadata()?;
        if meta.is_dir() {
            collect_dir(&entry.path(), &archive_path, out)?;
        } else {
            out.push((entry.path(), archive_path, meta.len()));
        }
    }
    Ok(())
}

fn join_archive_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kiln_archive_layout_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn empty_inputs_rejected() {
        let result = layout_entries(&[]);
        assert!(matches!(result, Err(ArchiveError::NoInputs)));
    }

    #[test]
    fn missing_source_propagates() {
        let inputs = [ArchiveInput::new("/nonexistent/kiln/file.bin", "file.bin")];
        assert!(matches!(layout_entries(&inputs), Err(ArchiveError::Io(_))));
    }

    #[test]
    fn offsets_are_cumulative() {
        let dir = temp_dir("offsets");
        std::fs::write(dir.join("a.bin"), [0u8; 10]).unwrap();
        std::fs::write(dir.join("b.bin"), [0u8; 3]).unwrap();
        std::fs::write(dir.join("c.bin"), []).unwrap();

        let inputs = [
            ArchiveInput::new(dir.join("a.bin"), "a.bin"),
            ArchiveInput::new(dir.join("b.bin"), "b.bin"),
            ArchiveInput::new(dir.join("c.bin"), "c.bin"),
        ];
        let entries = layout_entries(&inputs).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!((entries[0].offset, entries[0].size), (0, 10));
        assert_eq!((entries[1].offset, entries[1].size), (10, 3));
        assert_eq!((entries[2].offset, entries[2].size), (13, 0));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_expansion_prefixes_paths() {
        let dir = temp_dir("expand");
        std::fs::create_dir_all(dir.join("tex/sub")).unwrap();
        std::fs::write(dir.join("tex/a.png"), b"aa").unwrap();
        std::fs::write(dir.join("tex/sub/b.png"), b"bbb").unwrap();

        let inputs = [ArchiveInput::new(dir.join("tex"), "textures")];
        let mut entries = layout_entries(&inputs).unwrap();
        entries.sort_by(|a, b| a.archive_path.cmp(&b.archive_path));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].archive_path, "textures/a.png");
        assert_eq!(entries[1].archive_path, "textures/sub/b.png");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let dir = temp_dir("bare");
        std::fs::write(dir.join("x.bin"), b"x").unwrap();

        let inputs = [ArchiveInput::new(&dir, "")];
        let entries = layout_entries(&inputs).unwrap();
        assert_eq!(entries[0].archive_path, "x.bin");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[rstest]
    #[case(255, true)]
    #[case(256, false)]
    fn path_length_boundary(#[case] length: usize, #[case] ok: bool) {
        let dir = temp_dir(&format!("pathlen_{length}"));
        std::fs::write(dir.join("f.bin"), b"data").unwrap();

        let inputs = [ArchiveInput::new(dir.join("f.bin"), "p".repeat(length))];
        let result = layout_entries(&inputs);
        if ok {
            assert_eq!(result.unwrap()[0].archive_path.len(), length);
        } else {
            assert!(matches!(
                result,
                Err(ArchiveError::PathTooLong { length: 256, .. })
            ));
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn multibyte_path_length_counts_bytes() {
        let dir = temp_dir("multibyte");
        std::fs::write(dir.join("f.bin"), b"data").unwrap();

        // 86 three-byte characters: 258 encoded bytes.
        let path = "\u{20AC}".repeat(86);
        let inputs = [ArchiveInput::new(dir.join("f.bin"), path)];
        assert!(matches!(
            layout_entries(&inputs),
            Err(ArchiveError::PathTooLong { length: 258, .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
