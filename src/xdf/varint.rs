use std::io::{ErrorKind, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::xdf::XdfError;

// Running off the end of the stream inside a length field is the same
// failure as a bad width selector: the frame header cannot be trusted
// and the caller has to resynchronize or stop.
fn eof_as_malformed(err: std::io::Error) -> XdfError {
    if err.kind() == ErrorKind::UnexpectedEof {
        XdfError::MalformedLength
    } else {
        XdfError::IOError(err)
    }
}

/// Read a variable-length integer: a width selector byte (1, 4 or 8)
/// followed by that many bytes of little-endian unsigned integer.
pub fn read_varlen_int<R: Read>(reader: &mut R) -> Result<u64, XdfError> {
    let nbytes = reader.read_u8().map_err(eof_as_malformed)?;
    match nbytes {
        1 => Ok(u64::from(reader.read_u8().map_err(eof_as_malformed)?)),
        4 => Ok(u64::from(
            reader.read_u32::<LittleEndian>().map_err(eof_as_malformed)?,
        )),
        8 => reader.read_u64::<LittleEndian>().map_err(eof_as_malformed),
        _ => Err(XdfError::MalformedLength),
    }
}

/// Write a variable-length integer using the smallest of the three
/// permitted widths that fits the value.
pub fn write_varlen_int<W: Write>(writer: &mut W, value: u64) -> Result<(), std::io::Error> {
    if value <= u64::from(u8::MAX) {
        writer.write_u8(1)?;
        writer.write_u8(value as u8)?;
    } else if value <= u64::from(u32::MAX) {
        writer.write_u8(4)?;
        writer.write_u32::<LittleEndian>(value as u32)?;
    } else {
        writer.write_u8(8)?;
        writer.write_u64::<LittleEndian>(value)?;
    }
    Ok(())
}
