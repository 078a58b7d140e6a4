//! # Kiln blob archive
//!
//! A flat, uncompressed, directory-style binary container used to ship
//! asset files to the engine as a single blob. The format is deliberately
//! minimal: a fixed magic, a run of fixed-layout directory records, a data
//! marker, and the concatenated file contents. No compression, no
//! directory metadata, no checksums.
//!
//! Byte layout:
//!
//! ```text
//! "BLOBBY01"                                     8-byte ASCII magic
//! per entry, in discovery order:
//!     "ENTR"                                     4-byte ASCII tag
//!     path length                                1 unsigned byte (0-255)
//!     path bytes                                 UTF-8, no terminator
//!     offset                                     8-byte little-endian
//!     size                                       8-byte little-endian
//! "DATA"                                         4-byte ASCII tag
//! entry 0 bytes, entry 1 bytes, ...              no padding
//! ```
//!
//! Offsets are relative to the end of the `"DATA"` tag and are cumulative
//! sums of entry sizes in discovery order.

mod error;
mod layout;
mod reader;
mod writer;

pub use error::ArchiveError;
pub use layout::{layout_entries, ArchiveEntry, ArchiveInput, MAX_PATH_BYTES};
pub use reader::{Archive, DirectoryRecord};
pub use writer::{build_archive, write_archive};

/// 8-byte magic at the start of every archive.
pub const MAGIC: &[u8; 8] = b"BLOBBY01";

/// Tag preceding each directory record.
pub const ENTRY_TAG: &[u8; 4] = b"ENTR";

/// Tag separating the directory from the data section.
pub const DATA_TAG: &[u8; 4] = b"DATA";
