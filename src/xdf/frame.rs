use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::xdf::varint::{read_varlen_int, write_varlen_int};
use crate::xdf::XdfError;

/// Chunk that opens a stream: `u32` stream id plus an XML document.
pub const STREAM_HEADER_TAG: u16 = 2;
/// Sample data. The first one marks the end of the header region.
pub const SAMPLES_TAG: u16 = 3;
/// Per-stream trailer, also ends the header region.
pub const STREAM_FOOTER_TAG: u16 = 6;

/// The decoded front of one chunk. The framed length counts the tag
/// field, so `content_len` is what remains to be read after the header.
#[derive(Debug, PartialEq)]
pub struct FrameHeader {
    pub tag: u16,
    pub content_len: u64,
}

/// Read one chunk's length and tag, leaving the cursor at the first
/// content byte. On failure the cursor is wherever the partial read
/// stopped; recovery is the caller's business.
pub fn read_frame_header<R: Read>(reader: &mut R) -> Result<FrameHeader, XdfError> {
    let chunk_len = read_varlen_int(reader)?;
    // The framed length covers the 2 byte tag at minimum.
    if chunk_len < 2 {
        return Err(XdfError::MalformedLength);
    }
    let tag = match reader.read_u16::<LittleEndian>() {
        Ok(tag) => tag,
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(XdfError::MalformedLength)
        }
        Err(err) => return Err(err.into()),
    };
    Ok(FrameHeader {
        tag,
        content_len: chunk_len - 2,
    })
}

/// Write one complete chunk: framed length, tag, content.
pub fn write_chunk<W: Write>(writer: &mut W, tag: u16, content: &[u8]) -> Result<(), std::io::Error> {
    write_varlen_int(writer, content.len() as u64 + 2)?;
    writer.write_u16::<LittleEndian>(tag)?;
    writer.write_all(content)?;
    Ok(())
}
