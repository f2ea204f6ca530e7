use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::buf::fill_buf;
use crate::xdf::{BOUNDARY_SIGNATURE, SCAN_BLOCK_SIZE};

#[derive(Debug, PartialEq)]
pub enum ScanOutcome {
    /// The cursor now sits immediately after a boundary signature.
    BoundaryFound,
    /// No signature between the start position and end of input.
    EndOfFile,
}

/// Scan forward through the given source until just after the next
/// boundary chunk signature. This can be used for seeking or to skip
/// corrupted regions of a file. Not finding one is a normal terminal
/// condition, never an error.
pub fn scan_forward<R: Read + Seek>(reader: &mut R) -> Result<ScanOutcome, std::io::Error> {
    let mut block = vec![0u8; SCAN_BLOCK_SIZE];

    loop {
        let curpos = reader.stream_position()?;
        let (_, len) = fill_buf(reader, &mut block)?;

        if let Some(matchpos) = find_signature(&block[..len]) {
            let after = curpos + matchpos as u64 + BOUNDARY_SIGNATURE.len() as u64;
            reader.seek(SeekFrom::Start(after))?;
            debug!("scan forward found a boundary chunk");
            return Ok(ScanOutcome::BoundaryFound);
        }
        if len < SCAN_BLOCK_SIZE {
            debug!("scan forward reached end of file with no match");
            return Ok(ScanOutcome::EndOfFile);
        }

        // The signature may straddle the window edge, so the next
        // window re-reads the final 15 bytes of this one.
        let overlap = BOUNDARY_SIGNATURE.len() as u64 - 1;
        reader.seek(SeekFrom::Start(curpos + len as u64 - overlap))?;
    }
}

fn find_signature(block: &[u8]) -> Option<usize> {
    block
        .windows(BOUNDARY_SIGNATURE.len())
        .position(|window| window == BOUNDARY_SIGNATURE)
}

#[cfg(test)]
mod test_scan_forward {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn finds_signature() {
        let mut data = vec![0xAB; 100];
        data.extend_from_slice(&BOUNDARY_SIGNATURE);
        data.extend_from_slice(&[0xCD; 50]);

        let mut reader = Cursor::new(data);
        assert_eq!(scan_forward(&mut reader).unwrap(), ScanOutcome::BoundaryFound);
        assert_eq!(reader.position(), 100 + 16);
    }

    #[test]
    fn finds_signature_past_start_position() {
        let mut data = BOUNDARY_SIGNATURE.to_vec();
        data.extend_from_slice(&[0u8; 40]);
        data.extend_from_slice(&BOUNDARY_SIGNATURE);

        let mut reader = Cursor::new(data);
        reader.set_position(1);
        assert_eq!(scan_forward(&mut reader).unwrap(), ScanOutcome::BoundaryFound);
        // The first signature is no longer whole from position 1, so the
        // match is the second one.
        assert_eq!(reader.position(), 16 + 40 + 16);
    }

    #[test]
    fn no_signature_reports_end_of_file() {
        let mut reader = Cursor::new(vec![0x11; 300]);
        assert_eq!(scan_forward(&mut reader).unwrap(), ScanOutcome::EndOfFile);
        assert_eq!(reader.position(), 300);
    }

    #[test]
    fn empty_input() {
        let mut reader = Cursor::new(Vec::new());
        assert_eq!(scan_forward(&mut reader).unwrap(), ScanOutcome::EndOfFile);
    }

    #[test]
    fn signature_straddles_window_edge() {
        // Start the signature 8 bytes before the first window ends so
        // half of it lands in the second window.
        let split = SCAN_BLOCK_SIZE - 8;
        let mut data = vec![0u8; split];
        data.extend_from_slice(&BOUNDARY_SIGNATURE);
        data.extend_from_slice(&[0u8; 100]);

        let mut reader = Cursor::new(data);
        assert_eq!(scan_forward(&mut reader).unwrap(), ScanOutcome::BoundaryFound);
        assert_eq!(reader.position() as usize, split + 16);
    }
}
