use std::collections::HashSet;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use log::{debug, warn};
use rand::Rng;

use crate::tags;
use crate::xdf::frame::{
    read_frame_header, SAMPLES_TAG, STREAM_FOOTER_TAG, STREAM_HEADER_TAG,
};
use crate::xdf::scan::{scan_forward, ScanOutcome};
use crate::xdf::{XdfError, EOF_SLACK, MAGIC};

/// Where the metadata chunk lives, or where one should be inserted.
///
/// For an existing chunk `begin..begin + len` is its exact byte span.
/// For a synthesized one `len` is 0, `begin` is the insertion point at
/// the start of the stream header region, and `content` is the default
/// document.
#[derive(Debug)]
pub struct MetadataLocation {
    pub content: String,
    pub begin: u64,
    pub len: u64,
    pub stream_id: u32,
}

// What the traversal does with a tag.
enum TagClass {
    Header,
    DataBoundary,
    Opaque,
}

fn classify(tag: u16) -> TagClass {
    match tag {
        STREAM_HEADER_TAG => TagClass::Header,
        SAMPLES_TAG | STREAM_FOOTER_TAG => TagClass::DataBoundary,
        _ => TagClass::Opaque,
    }
}

// Accumulator folded over the chunk stream while scanning the header
// region.
#[derive(Default)]
struct ScanState {
    streamheaders_begin: Option<u64>,
    metadata: Option<MetadataLocation>,
    other_ids: HashSet<u32>,
    duplicate_metadata: bool,
}

impl ScanState {
    fn observe_header(&mut self, begin: u64, end: u64, stream_id: u32, document: String) {
        if self.streamheaders_begin.is_none() {
            self.streamheaders_begin = Some(begin);
        }
        if tags::is_metadata_stream(&document) {
            if self.metadata.is_none() {
                self.metadata = Some(MetadataLocation {
                    content: document,
                    begin,
                    len: end - begin,
                    stream_id,
                });
            } else {
                // Only the first metadata stream counts, later ones are
                // left in place untouched.
                self.duplicate_metadata = true;
                self.other_ids.insert(stream_id);
            }
        } else {
            self.other_ids.insert(stream_id);
        }
    }

    // Terminal step: hand out the located chunk, or synthesize an
    // insertion at the start of the header region.
    fn into_location(self, fallback_begin: u64) -> MetadataLocation {
        match self.metadata {
            Some(found) => found,
            None => MetadataLocation {
                content: tags::default_document(),
                begin: self.streamheaders_begin.unwrap_or(fallback_begin),
                len: 0,
                stream_id: allocate_stream_id(&self.other_ids),
            },
        }
    }
}

// The header scan stops at the first Samples/StreamFooter chunk, so any
// headers later in the file were never seen and would typically carry
// low sequential ids. Drawing from a high range keeps a fresh id clear
// of those.
fn allocate_stream_id(taken: &HashSet<u32>) -> u32 {
    let mut rng = rand::thread_rng();
    loop {
        let id = rng.gen_range(10_000..100_000);
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Find the metadata chunk's content and byte span in an XDF stream.
///
/// This is a read-only scan: whatever cursor position the source came
/// in with is restored before returning, so the same handle can be
/// reused for the byte copies of the splice.
pub fn locate_metadata<R: Read + Seek>(
    reader: &mut R,
    path: &Path,
) -> Result<MetadataLocation, XdfError> {
    let oldpos = reader.stream_position()?;
    let filesize = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut magic = [0u8; 4];
    match reader.read_exact(&mut magic) {
        Ok(()) if magic == MAGIC => (),
        Ok(()) => return Err(XdfError::InvalidContainer(path.to_path_buf())),
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
            return Err(XdfError::InvalidContainer(path.to_path_buf()))
        }
        Err(err) => return Err(err.into()),
    }

    let mut state = ScanState::default();
    let mut begin_pos;

    loop {
        begin_pos = reader.stream_position()?;

        let header = match read_frame_header(reader) {
            Ok(header) => header,
            Err(XdfError::MalformedLength) => {
                let pos = reader.stream_position()?;
                if pos + EOF_SLACK < filesize {
                    warn!(
                        "{}: malformed chunk length, scanning forward to the next boundary chunk",
                        path.display()
                    );
                    match scan_forward(reader)? {
                        ScanOutcome::BoundaryFound => continue,
                        ScanOutcome::EndOfFile => break,
                    }
                } else {
                    // A bad length this close to the end is ordinary
                    // truncation.
                    debug!("reached end of file");
                    break;
                }
            }
            Err(err) => return Err(err),
        };
        debug!(
            "read tag {} at {} bytes, length={}",
            header.tag,
            begin_pos,
            header.content_len + 2
        );

        match classify(header.tag) {
            TagClass::Header => {
                let stream_id = reader.read_u32::<LittleEndian>()?;
                let doc_len = header.content_len.saturating_sub(4);
                let mut raw = Vec::new();
                reader.by_ref().take(doc_len).read_to_end(&mut raw)?;
                let document = String::from_utf8_lossy(&raw).into_owned();
                let end = reader.stream_position()?;
                state.observe_header(begin_pos, end, stream_id, document);
            }
            TagClass::DataBoundary => {
                // Done traversing headers. Metadata chunks past this
                // point are deliberately not considered.
                break;
            }
            TagClass::Opaque => {
                let pos = reader.stream_position()?;
                reader.seek(SeekFrom::Start(pos.saturating_add(header.content_len)))?;
            }
        }
    }

    if state.duplicate_metadata {
        warn!(
            "file {} has more than one metadata stream, using only the first one",
            path.display()
        );
    }

    reader.seek(SeekFrom::Start(oldpos))?;
    Ok(state.into_location(begin_pos))
}
