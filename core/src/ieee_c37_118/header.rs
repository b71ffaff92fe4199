//! # IEEE C37.118 Header Frames
//!
//! A header frame carries human-readable information about the PMU, its data sources,
//! filtering and scaling. The body has no length field: it runs to the CHK word.
//!
//! The body is kept as raw bytes so that a decoded header re-encodes to the same frame
//! whatever its character encoding. Use `text` for display.

use super::cursor::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Free-text body of a header frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    pub data: Vec<u8>,
}

impl Header {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Header { data: data.into() }
    }

    /// Body as text, with invalid UTF-8 sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Consumes the remaining body.
    pub fn decode(reader: &mut Reader<'_>) -> Header {
        Header {
            data: reader.take_rest().to_vec(),
        }
    }

    pub fn encode(&self, writer: &mut Writer) {
        writer.write_bytes(&self.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_consumes_window() {
        let bytes = b"hello\xAB\xCD";
        let mut reader = Reader::new(bytes);
        reader.limit(5);
        let header = Header::decode(&mut reader);
        assert_eq!(header, Header::new("hello"));
        assert_eq!(header.text(), "hello");
        assert_eq!(reader.remaining(), 0);

        let mut writer = Writer::new();
        header.encode(&mut writer);
        assert_eq!(writer.as_slice(), b"hello");
    }

    #[test]
    fn test_header_keeps_non_utf8_bytes() {
        let bytes = b"caf\xE9!";
        let mut reader = Reader::new(bytes);
        let header = Header::decode(&mut reader);
        assert_eq!(header.data, bytes);
        assert_eq!(header.text(), "caf\u{FFFD}!");

        let mut writer = Writer::new();
        header.encode(&mut writer);
        assert_eq!(writer.as_slice(), bytes);
    }

    #[test]
    fn test_empty_header() {
        let mut reader = Reader::new(&[]);
        assert!(Header::decode(&mut reader).data.is_empty());
    }
}
