use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::buf::copy_range;
use crate::xdf::frame::{write_chunk, STREAM_HEADER_TAG};
use crate::xdf::locate::MetadataLocation;

/// Write a copy of the source to the sink with the metadata chunk
/// described by `location` replaced (or, for a zero-length span,
/// inserted) carrying `new_content`. Every byte outside the span is
/// transferred verbatim; unchanged content takes a plain full-file
/// copy with no framing logic at all.
pub fn splice_metadata<R: Read + Seek, W: Write>(
    reader: &mut R,
    writer: &mut W,
    file_size: u64,
    location: &MetadataLocation,
    new_content: &str,
) -> Result<(), std::io::Error> {
    reader.seek(SeekFrom::Start(0))?;

    if new_content == location.content {
        return copy_range(reader, writer, file_size);
    }

    // Everything in front of the old chunk.
    copy_range(reader, writer, location.begin)?;

    // The replacement StreamHeader chunk.
    let mut content = Vec::with_capacity(4 + new_content.len());
    content.write_u32::<LittleEndian>(location.stream_id)?;
    content.extend_from_slice(new_content.as_bytes());
    write_chunk(writer, STREAM_HEADER_TAG, &content)?;

    // Skip the old chunk's bytes (none when it was synthesized) and
    // copy the rest of the file.
    reader.seek(SeekFrom::Start(location.begin + location.len))?;
    copy_range(reader, writer, file_size - location.begin - location.len)
}
