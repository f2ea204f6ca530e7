use std::io::{Read, Write};

// Block size for exact-length transfers between file handles.
const BLOCK_SIZE: usize = 64 * 1024;

/// Fill `buf` from `data`, looping over short reads. Returns whether the
/// source ran dry and how many bytes actually landed in `buf`.
pub fn fill_buf<R: Read>(data: &mut R, buf: &mut [u8]) -> std::io::Result<(bool, usize)> {
    let mut buf_read = 0;

    while buf_read < buf.len() {
        match data.read(&mut buf[buf_read..]) {
            Ok(0) => return Ok((true, buf_read)),
            Ok(x) => buf_read += x,
            Err(e) => return Err(e),
        };
    }
    Ok((false, buf_read))
}

/// Copy exactly `length` bytes from `reader` to `writer` at their
/// current positions, in fixed-size blocks plus a final partial block.
pub fn copy_range<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    mut length: u64,
) -> std::io::Result<()> {
    let mut block = [0u8; BLOCK_SIZE];

    while length >= BLOCK_SIZE as u64 {
        reader.read_exact(&mut block)?;
        writer.write_all(&block)?;
        length -= BLOCK_SIZE as u64;
    }
    if length > 0 {
        let rest = &mut block[..length as usize];
        reader.read_exact(rest)?;
        writer.write_all(rest)?;
    }
    Ok(())
}
