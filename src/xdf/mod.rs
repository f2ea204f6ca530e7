//! XDF chunk-stream container format
//!
//! An XDF file is a 4 byte magic marker followed by a sequence of
//! length-framed chunks. The format is self-delimiting: every chunk
//! carries its own length up front, so a reader can walk the file
//! chunk by chunk without understanding any of the payloads. Unless
//! otherwise noted everything is stored in Little Endian format.
//!
//! # Top Level
//!
//! | Type      | Name   | Description |
//! | --------: | ------ | ----------- |
//! | [u8; 4]   | magic  | The literal bytes `XDF:` |
//! | chunk*    | chunks | Zero or more chunks, back to back |
//!
//! Each chunk has the following on disk format:
//!
//! | Type      | Name    | Description |
//! | --------: | ------- | ----------- |
//! | VarLenInt | length  | Total length of `tag` and `content`, so `content` is `length - 2` bytes |
//! | u16       | tag     | The chunk type, see [`frame`] |
//! | [u8; N]   | content | The chunk payload, interpret according to `tag` |
//!
//! A `VarLenInt` is a 1 byte width selector (must be 1, 4 or 8)
//! followed by an unsigned little-endian integer of that many bytes.
//! See [`varint`].
//!
//! # Chunk Tags
//!
//! | Tag | Name         | Description |
//! | :-: | ------------ | ----------- |
//! | 2   | StreamHeader | `u32` stream id followed by an XML document |
//! | 3   | Samples      | Sample data, first chunk ends the header region |
//! | 6   | StreamFooter | Per-stream trailer, also ends the header region |
//! | *   | anything else | Opaque, skipped byte-for-byte |
//!
//! Boundary chunks (tag 5 in the wild) carry a fixed 16 byte signature
//! as their content. The tag itself is never matched on; the signature
//! is what [`scan`] searches for when a length field has been corrupted
//! and the stream has to be re-entered at a known chunk boundary.
//!
//! # The metadata stream
//!
//! The one StreamHeader whose document declares `<name>Metadata</name>`
//! and `<type>Metadata</type>` holds the user-editable tag document this
//! tool manages. [`locate`] finds its exact byte span (or the spot where
//! one should be inserted) and [`splice`] rewrites the file around it,
//! reproducing every other byte verbatim.

use std::path::PathBuf;

use thiserror::Error;

pub mod frame;
pub mod locate;
pub mod scan;
pub mod splice;
pub mod varint;

/// Magic marker at offset 0 of every XDF file.
pub const MAGIC: [u8; 4] = *b"XDF:";

/// Content of a boundary chunk, searched for during resynchronization.
pub const BOUNDARY_SIGNATURE: [u8; 16] = [
    0x43, 0xA5, 0x46, 0xDC, 0xCB, 0xF5, 0x41, 0x0F,
    0xB3, 0x0E, 0xD5, 0x46, 0x73, 0x83, 0xCB, 0xE4,
];

// 1 MiB scan window for boundary recovery
pub(crate) const SCAN_BLOCK_SIZE: usize = 1 << 20;

// A malformed length this close to the end of the file is ordinary
// truncation, not corruption worth scanning past.
pub(crate) const EOF_SLACK: u64 = 1024;

#[derive(Error, Debug)]
pub enum XdfError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("invalid variable-length integer encountered")]
    MalformedLength,
    #[error("not a valid XDF file: {}", .0.display())]
    InvalidContainer(PathBuf),
}
