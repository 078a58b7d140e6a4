use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while building or reading a blob archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// The input pair list was empty.
    NoInputs,
    /// An archive path encodes to more than 255 UTF-8 bytes.
    PathTooLong {
        /// The offending archive path.
        path: String,
        /// Its encoded length in bytes.
        length: usize,
    },
    /// A walked file name is not valid UTF-8 and cannot become an archive path.
    NonUtf8Path(PathBuf),
    /// A source file's size changed between the layout pass and the data pass.
    SourceChanged(PathBuf),
    /// An IO error occurred while reading a source or writing the archive.
    Io(std::io::Error),
    /// The archive does not start with the `BLOBBY01` magic.
    BadMagic([u8; 8]),
    /// A directory record does not start with `ENTR` or `DATA`.
    BadTag([u8; 4]),
    /// The archive ended in the middle of a record or the data section.
    Truncated,
    /// An entry's recorded byte range lies outside the data section.
    RangeOutOfBounds(String),
    /// No directory record carries the requested archive path.
    EntryNotFound(String),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::NoInputs => write!(f, "no input files given"),
            ArchiveError::PathTooLong { path, length } => {
                write!(f, "archive path too long ({length} bytes): {path}")
            }
            ArchiveError::NonUtf8Path(path) => {
                write!(f, "file name is not valid UTF-8: {}", path.display())
            }
            ArchiveError::SourceChanged(path) => {
                write!(f, "source file changed while packing: {}", path.display())
            }
            ArchiveError::Io(err) => write!(f, "IO error: {err}"),
            ArchiveError::BadMagic(magic) => {
                write!(f, "bad archive magic: {:?}", String::from_utf8_lossy(magic))
            }
            ArchiveError::BadTag(tag) => {
                write!(f, "bad record tag: {:?}", String::from_utf8_lossy(tag))
            }
            ArchiveError::Truncated => write!(f, "archive is truncated"),
            ArchiveError::RangeOutOfBounds(path) => {
                write!(f, "entry data out of bounds: {path}")
            }
            ArchiveError::EntryNotFound(path) => write!(f, "no such entry: {path}"),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::Io(err)
    }
}
