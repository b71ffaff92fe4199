//! # IEEE C37.118 Frame Envelope
//!
//! Every frame shares one envelope: a 14-byte prefix, a body whose shape depends on the
//! frame type, and a trailing CRC-CCITT.
//!
//! ```text
//! offset  size  field
//! 0       2     SYNC       0xAA, frame type (bits 6-4), version (bits 3-0)
//! 2       2     FRAMESIZE  total length including SYNC and CHK
//! 4       2     IDCODE
//! 6       4     SOC
//! 10      4     FRACSEC
//! 14      N     body
//! 14+N    2     CHK
//! ```
//!
//! ## Key Components
//!
//! - `Frame`: The envelope fields and the decoded body.
//! - `Message`: The body, one variant per frame type.
//! - `Parser`: Stateful codec for one stream. It remembers the last configuration
//!   frame so that data frames, which are not self-describing, can be read.
//!
//! ## Usage
//!
//! ```
//! use c37118_core::ieee_c37_118::commands::{Command, CommandType};
//! use c37118_core::ieee_c37_118::frame::{Frame, Message, Parser};
//!
//! let mut parser = Parser::new();
//! let frame = Frame::new(7, Message::Command(Command::from(CommandType::GetConfig2)));
//! let bytes = parser.serialize(&frame).unwrap();
//!
//! let decoded = parser.deserialize(&bytes).unwrap().unwrap();
//! assert_eq!(decoded.message, frame.message);
//! assert_eq!(decoded.framesize as usize, bytes.len());
//! ```

use super::commands::Command;
use super::common::{
    is_valid_sync, sync_word, CodecError, FrameType, Result, CHK_SIZE, MIN_FRAME_SIZE,
    VERSION_MASK,
};
use super::config::{Config, Config1, Config2};
use super::cursor::{Reader, Writer};
use super::data_frame::Data;
use super::header::Header;
use super::utils::{calculate_crc, validate_checksum};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Version reported by frames built with `Frame::new` (IEEE C37.118-2005).
pub const DEFAULT_VERSION: u8 = 1;

/// Body of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Data(Data),
    Header(Header),
    Config1(Config1),
    Config2(Config2),
    Command(Command),
}

impl Message {
    pub fn frame_type(&self) -> FrameType {
        match self {
            Message::Data(_) => FrameType::Data,
            Message::Header(_) => FrameType::Header,
            Message::Config1(_) => FrameType::Config1,
            Message::Config2(_) => FrameType::Config2,
            Message::Command(_) => FrameType::Command,
        }
    }

    /// The layout schema carried by a configuration frame.
    pub fn config(&self) -> Option<&Config> {
        match self {
            Message::Config1(config) => Some(&config.0),
            Message::Config2(config) => Some(&config.0),
            _ => None,
        }
    }
}

/// A decoded or to-be-encoded frame.
///
/// `fracsec` is kept as transmitted, including the time quality byte. `message` is
/// `None` only for a data frame received before any configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub version: u8,
    pub framesize: u16,
    pub idcode: u16,
    pub soc: u32,
    pub fracsec: u32,
    pub message: Option<Message>,
}

impl Frame {
    /// Creates a version 1 frame with a zero timestamp.
    ///
    /// `framesize` is left at zero; `Parser::serialize` computes the real one.
    pub fn new(idcode: u16, message: Message) -> Self {
        Frame {
            version: DEFAULT_VERSION,
            framesize: 0,
            idcode,
            soc: 0,
            fracsec: 0,
            message: Some(message),
        }
    }

    pub fn with_time(mut self, soc: u32, fracsec: u32) -> Self {
        self.soc = soc;
        self.fracsec = fracsec;
        self
    }

    /// The frame type; a frame without a message is an unread data frame.
    pub fn frame_type(&self) -> FrameType {
        self.message
            .as_ref()
            .map_or(FrameType::Data, Message::frame_type)
    }
}

/// Stateful frame codec for one PMU or concentrator stream.
///
/// The parser holds the stream's current configuration. It is replaced wholesale each
/// time a CFG-1 or CFG-2 frame is decoded or `set_config` is called.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: Option<Config>,
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_config(config: Config) -> Self {
        Parser {
            config: Some(config),
        }
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = Some(config);
    }

    pub fn get_config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Decodes the frame at the start of `buffer`.
    ///
    /// # Parameters
    ///
    /// * `buffer`: Received bytes, starting at a frame boundary. Bytes past FRAMESIZE
    ///   are not touched.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Frame))`: A complete frame. Consume `framesize` bytes before the next
    ///   call.
    /// * `Ok(None)`: The buffer does not hold a complete frame yet.
    /// * `Err(CodecError)`: The frame is corrupt. After `InvalidSync` the caller must
    ///   resynchronize on the next 0xAA byte.
    pub fn deserialize(&mut self, buffer: &[u8]) -> Result<Option<Frame>> {
        let mut reader = Reader::new(buffer);
        if buffer.len() < 4 {
            trace!("incomplete frame: {} bytes buffered", buffer.len());
            return Ok(None);
        }

        let sync = reader.read_u16()?;
        let framesize = reader.read_u16()?;
        if buffer.len() < framesize as usize {
            trace!(
                "incomplete frame: {} of {} bytes buffered",
                buffer.len(),
                framesize
            );
            return Ok(None);
        }

        if !is_valid_sync(sync) {
            warn!("invalid sync word 0x{:04X}", sync);
            return Err(CodecError::InvalidSync { sync });
        }
        if (framesize as usize) < MIN_FRAME_SIZE {
            return Err(CodecError::InvalidFrameSize { framesize });
        }

        let frame_type = FrameType::from_sync(sync)?;
        let version = (sync & VERSION_MASK) as u8;

        let body_end = framesize as usize - CHK_SIZE;
        reader.limit(body_end);
        let idcode = reader.read_u16()?;
        let soc = reader.read_u32()?;
        let fracsec = reader.read_u32()?;

        // CHK is checked before the body is decoded.
        if let Err(err) = validate_checksum(&buffer[..framesize as usize]) {
            warn!("{} from idcode {}: {}", frame_type, idcode, err);
            return Err(err);
        }

        trace!("decoding {} from idcode {}", frame_type, idcode);
        let message = match frame_type {
            FrameType::Data => match &self.config {
                Some(config) => Some(Message::Data(Data::decode(&mut reader, config)?)),
                None => {
                    debug!("no configuration loaded, skipping data frame body");
                    reader.take_rest();
                    None
                }
            },
            FrameType::Header => Some(Message::Header(Header::decode(&mut reader))),
            FrameType::Config1 => Some(Message::Config1(Config1(Config::decode(&mut reader)?))),
            FrameType::Config2 => Some(Message::Config2(Config2(Config::decode(&mut reader)?))),
            FrameType::Command => Some(Message::Command(Command::decode(&mut reader)?)),
        };

        if reader.remaining() > 0 {
            debug!(
                "ignoring {} trailing body bytes in {}",
                reader.remaining(),
                frame_type
            );
        }

        if let Some(config) = message.as_ref().and_then(Message::config) {
            debug!(
                "replacing configuration: {} PMUs, time base {}",
                config.pmus.len(),
                config.time_base
            );
            self.config = Some(config.clone());
        }

        Ok(Some(Frame {
            version,
            framesize,
            idcode,
            soc,
            fracsec,
            message,
        }))
    }

    /// Encodes `frame`, computing FRAMESIZE and CHK.
    ///
    /// `frame.framesize` is ignored. Data frames are laid out by the stored
    /// configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)`: The complete frame.
    /// * `Err(CodecError::MissingMessage)`: If the frame has no message.
    /// * `Err(CodecError::MissingConfig)`: If a data frame is encoded with no stored
    ///   configuration.
    /// * `Err(CodecError::SizeMismatch | FormatMismatch)`: If a data frame does not
    ///   match the stored configuration.
    pub fn serialize(&self, frame: &Frame) -> Result<Vec<u8>> {
        let message = frame.message.as_ref().ok_or(CodecError::MissingMessage)?;

        let mut writer = Writer::with_capacity(MIN_FRAME_SIZE);
        writer.write_u16(sync_word(message.frame_type(), frame.version as u16));
        writer.write_u16(0);
        writer.write_u16(frame.idcode);
        writer.write_u32(frame.soc);
        writer.write_u32(frame.fracsec);

        match message {
            Message::Data(data) => {
                let config = self.config.as_ref().ok_or(CodecError::MissingConfig)?;
                data.encode(&mut writer, config)?;
            }
            Message::Header(header) => header.encode(&mut writer),
            Message::Config1(config) => config.encode(&mut writer)?,
            Message::Config2(config) => config.encode(&mut writer)?,
            Message::Command(command) => command.encode(&mut writer),
        }

        let framesize = writer.len() + CHK_SIZE;
        let framesize = u16::try_from(framesize).map_err(|_| CodecError::SizeMismatch {
            field: "framesize",
            expected: u16::MAX as usize,
            actual: framesize,
        })?;
        writer.patch_u16(2, framesize);

        let crc = calculate_crc(writer.as_slice());
        writer.write_u16(crc);
        trace!(
            "encoded {} for idcode {}: {} bytes",
            message.frame_type(),
            frame.idcode,
            framesize
        );
        Ok(writer.into_inner())
    }
}
