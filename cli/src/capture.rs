// Offline decoding of captured frame streams.
//
// A capture is the concatenation of frames as received from a PMU or PDC, either as
// raw bytes or as hex text. Frames are decoded in order through a single parser so
// that data frames are read with the most recent configuration frame.
use c37118_core::ieee_c37_118::common::{is_valid_sync, FrameType, MIN_FRAME_SIZE};
use c37118_core::ieee_c37_118::frame::{Frame, Parser};
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const SYNC_BYTE: u8 = 0xAA;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub frames: usize,
    pub frame_types: BTreeMap<String, usize>,
    pub errors: usize,
    pub skipped_bytes: usize,
    pub incomplete_bytes: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "frames: {}, errors: {}, skipped bytes: {}, incomplete bytes: {}",
            self.frames, self.errors, self.skipped_bytes, self.incomplete_bytes
        )?;
        for (frame_type, count) in &self.frame_types {
            write!(f, "\n  {}: {}", frame_type, count)?;
        }
        Ok(())
    }
}

pub fn read_capture(path: &Path, hex_text: bool) -> Result<Vec<u8>, Box<dyn Error>> {
    if !hex_text {
        return Ok(fs::read(path)?);
    }
    let content = fs::read_to_string(path)?;
    let hex_string: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(hex::decode(hex_string)?)
}

// Whether `bytes` starts like a frame that is only cut short by the end of the buffer.
// Fields past the end of `bytes` are not checked.
fn is_frame_start(bytes: &[u8]) -> bool {
    if bytes.len() < 2 {
        return bytes.is_empty() || bytes[0] == SYNC_BYTE;
    }
    let sync = u16::from_be_bytes([bytes[0], bytes[1]]);
    if !is_valid_sync(sync) || FrameType::from_sync(sync).is_err() {
        return false;
    }
    bytes.len() < 4 || u16::from_be_bytes([bytes[2], bytes[3]]) as usize >= MIN_FRAME_SIZE
}

// Offset of the next 0xAA byte after `offset`, or the end of the buffer.
fn next_sync(buffer: &[u8], offset: usize) -> usize {
    buffer[offset + 1..]
        .iter()
        .position(|&byte| byte == SYNC_BYTE)
        .map_or(buffer.len(), |position| offset + 1 + position)
}

/// Decodes every frame in `buffer`, calling `on_frame` with each frame and its offset.
///
/// On a decode error the stream is resynchronized at the next 0xAA byte. Decoding stops
/// at the first incomplete frame whose SYNC and FRAMESIZE are valid; anything else that
/// runs past the end of the buffer is skipped like an error.
pub fn decode_stream<F>(buffer: &[u8], mut on_frame: F) -> Summary
where
    F: FnMut(usize, &Frame, &Parser),
{
    let mut parser = Parser::new();
    let mut summary = Summary::default();
    let mut offset = 0;

    while offset < buffer.len() {
        let reason = match parser.deserialize(&buffer[offset..]) {
            Ok(Some(frame)) => {
                on_frame(offset, &frame, &parser);
                summary.frames += 1;
                *summary
                    .frame_types
                    .entry(frame.frame_type().to_string())
                    .or_default() += 1;
                offset += frame.framesize as usize;
                continue;
            }
            Ok(None) if is_frame_start(&buffer[offset..]) => {
                summary.incomplete_bytes = buffer.len() - offset;
                debug!(
                    "stopping at offset {}: {} bytes do not hold a complete frame",
                    offset, summary.incomplete_bytes
                );
                break;
            }
            Ok(None) => "no frame header".to_string(),
            Err(err) => err.to_string(),
        };

        let next = next_sync(buffer, offset);
        warn!(
            "offset {}: {}, skipping {} bytes",
            offset,
            reason,
            next - offset
        );
        summary.errors += 1;
        summary.skipped_bytes += next - offset;
        offset = next;
    }
    summary
}
