//! Shared helpers for the kiln command line tools.

use std::path::Path;

use kiln_archive::ArchiveInput;

/// Parse a `SOURCE::ARCHIVE_PATH` input pair.
///
/// A bare `SOURCE` (no `::`) uses the source's file name as the archive
/// path; for a directory source that means entries land at the archive
/// root under the directory's own name.
pub fn parse_input_pair(pair: &str) -> ArchiveInput {
    match pair.split_once("::") {
        Some((source, archive_path)) => ArchiveInput::new(source, archive_path),
        None => {
            let source = Path::new(pair);
            let name = source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            ArchiveInput::new(source, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn explicit_pair_splits_on_double_colon() {
        let input = parse_input_pair("assets/tex.png::textures/tex.png");
        assert_eq!(input.source, PathBuf::from("assets/tex.png"));
        assert_eq!(input.archive_path, "textures/tex.png");
    }

    #[test]
    fn bare_source_uses_its_file_name() {
        let input = parse_input_pair("assets/tex.png");
        assert_eq!(input.source, PathBuf::from("assets/tex.png"));
        assert_eq!(input.archive_path, "tex.png");
    }

    #[test]
    fn windows_style_drive_letters_survive() {
        let input = parse_input_pair("C:/data/file.bin::file.bin");
        assert_eq!(input.source, PathBuf::from("C:/data/file.bin"));
        assert_eq!(input.archive_path, "file.bin");
    }
}
