//! A capacity-bounded scratch buffer for one frame's escape sequences.
//!
//! `render()` assembles the entire frame into this buffer before writing
//! anything to stdout and before touching `cache`. Exceeding the configured
//! capacity fails the frame with `Error::WriteBufferOverflow` rather than
//! growing unbounded or writing a partial frame.

use crate::error::{Error, Result};

pub struct WriteBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl WriteBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        WriteBuffer { bytes: Vec::with_capacity(capacity.min(64 * 1024)), capacity }
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn push_bytes(&mut self, data: &[u8]) -> Result<()> {
        if self.bytes.len() + data.len() > self.capacity {
            return Err(Error::WriteBufferOverflow);
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    pub fn push_str(&mut self, s: &str) -> Result<()> {
        self.push_bytes(s.as_bytes())
    }

    pub fn push_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.push_bytes(ch.encode_utf8(&mut buf).as_bytes())
    }
}

/// A fixed, stack-sized buffer for a single escape sequence (a cursor move
/// or an SGR diff never needs more than a handful of bytes). Exceeding its
/// 32-byte cap fails with `Error::EscapeBufferOverflow` — a sequence this
/// library builds should never come close.
pub struct EscapeBuffer {
    bytes: [u8; 32],
    len: usize,
}

impl EscapeBuffer {
    pub fn new() -> Self {
        EscapeBuffer { bytes: [0; 32], len: 0 }
    }

    pub fn push_str(&mut self, s: &str) -> Result<()> {
        let data = s.as_bytes();
        if self.len + data.len() > self.bytes.len() {
            return Err(Error::EscapeBufferOverflow);
        }
        self.bytes[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Default for EscapeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_leaves_error_not_panic() {
        let mut buf = WriteBuffer::with_capacity(4);
        assert!(buf.push_str("hello").is_err());
    }

    #[test]
    fn fits_exactly() {
        let mut buf = WriteBuffer::with_capacity(5);
        buf.push_str("hello").unwrap();
        assert_eq!(buf.as_bytes(), b"hello");
    }

    #[test]
    fn escape_buffer_overflow() {
        let mut buf = EscapeBuffer::new();
        let err = buf.push_str(&"x".repeat(40)).unwrap_err();
        assert!(matches!(err, Error::EscapeBufferOverflow));
    }

    #[test]
    fn escape_buffer_accumulates() {
        let mut buf = EscapeBuffer::new();
        buf.push_str("\x1b[").unwrap();
        buf.push_str("5;10H").unwrap();
        assert_eq!(buf.as_bytes(), b"\x1b[5;10H");
    }
}
