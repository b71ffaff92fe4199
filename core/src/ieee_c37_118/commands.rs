//! # IEEE C37.118 Command Frames
//!
//! Command frames are sent from a data collector to a PMU to start or stop the data
//! stream and to request header or configuration frames.
//!
//! ## Key Components
//!
//! - `Command`: A command frame body, the CMD word followed by optional extended bytes.
//! - `CommandType`: Enumerates the standard command codes.
//! - `DATA_STOP` ... `GET_CONFIG2`: Raw command codes.
//!
//! ## Usage
//!
//! ```
//! use c37118_core::ieee_c37_118::commands::{Command, CommandType, DATA_START};
//!
//! let command = Command::from(CommandType::DataStart);
//! assert_eq!(command.cmd, DATA_START);
//! assert!(command.ext.is_empty());
//! ```

use super::common::Result;
use super::cursor::{Reader, Writer};
use serde::{Deserialize, Serialize};

// Codes as numbered by IEEE C37.118.2-2011, table 15.

/// Turn off transmission of data frames.
pub const DATA_STOP: u16 = 1;
/// Turn on transmission of data frames.
pub const DATA_START: u16 = 2;
/// Send the header frame.
pub const GET_HEADER: u16 = 3;
/// Send configuration frame 1.
pub const GET_CONFIG1: u16 = 4;
/// Send configuration frame 2.
pub const GET_CONFIG2: u16 = 5;

/// A command frame body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub cmd: u16,
    /// Extended frame data, everything between CMD and CHK.
    pub ext: Vec<u8>,
}

impl Command {
    pub fn new(cmd: u16) -> Self {
        Command {
            cmd,
            ext: Vec::new(),
        }
    }

    /// Reads CMD and keeps the rest of the body as `ext`.
    pub fn decode(reader: &mut Reader<'_>) -> Result<Command> {
        let cmd = reader.read_u16()?;
        let ext = reader.take_rest().to_vec();
        Ok(Command { cmd, ext })
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_u16(self.cmd);
        writer.write_bytes(&self.ext);
    }

    /// Retrieves the command type as an enum.
    ///
    /// # Returns
    ///
    /// * `Some(CommandType)`: The corresponding command type, if valid.
    /// * `None`: If the command code is unrecognized.
    pub fn command_type(&self) -> Option<CommandType> {
        CommandType::try_from(self.cmd).ok()
    }

    /// Provides a human-readable description of the command.
    pub fn description(&self) -> String {
        match self.command_type() {
            Some(command_type) => command_type.to_string(),
            None => format!("Unknown command ({})", self.cmd),
        }
    }
}

impl From<CommandType> for Command {
    fn from(command_type: CommandType) -> Self {
        Command::new(command_type as u16)
    }
}

/// Enumerates the standard command codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum CommandType {
    DataStop = 1,
    DataStart = 2,
    GetHeader = 3,
    GetConfig1 = 4,
    GetConfig2 = 5,
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandType::DataStop => write!(f, "Turn OFF real-time data transmission"),
            CommandType::DataStart => write!(f, "Turn ON real-time data transmission"),
            CommandType::GetHeader => write!(f, "Send Header frame"),
            CommandType::GetConfig1 => write!(f, "Send Configuration frame 1"),
            CommandType::GetConfig2 => write!(f, "Send Configuration frame 2"),
        }
    }
}

/// Converts a 16-bit command code to a `CommandType`.
///
/// # Errors
///
/// Returns an error string if the command code is not a standard one.
impl TryFrom<u16> for CommandType {
    type Error = String;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        match value {
            DATA_STOP => Ok(CommandType::DataStop),
            DATA_START => Ok(CommandType::DataStart),
            GET_HEADER => Ok(CommandType::GetHeader),
            GET_CONFIG1 => Ok(CommandType::GetConfig1),
            GET_CONFIG2 => Ok(CommandType::GetConfig2),
            _ => Err(format!("Invalid command type: {}", value)),
        }
    }
}
