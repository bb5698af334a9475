//! Bounded formatting buffer

use core::fmt::{self, Write};

use crate::config::LOG_BUFFER_SIZE;

/// Stack buffer a single message is formatted into.
///
/// Writes past the capacity are cut at the last whole UTF-8 character that
/// fits; the buffer never grows and never overruns.
pub struct MessageBuf<const M: usize = LOG_BUFFER_SIZE> {
    buffer: [u8; M],
    pos: usize,
    truncated: bool,
}

impl<const M: usize> MessageBuf<M> {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            buffer: [0; M],
            pos: 0,
            truncated: false,
        }
    }

    /// Formats `args` into a fresh buffer.
    pub fn from_args(args: fmt::Arguments<'_>) -> Self {
        let mut msg = Self::new();
        // write_str never fails, truncation is recorded instead
        let _ = msg.write_fmt(args);
        msg
    }

    /// The formatted bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.pos]
    }

    /// The formatted text.
    pub fn as_str(&self) -> &str {
        // only whole characters are ever copied in
        core::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }

    /// Byte length of the formatted text.
    pub fn len(&self) -> usize {
        self.pos
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    /// True if some output did not fit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Maximum number of bytes the buffer holds.
    pub const fn capacity(&self) -> usize {
        M
    }
}

impl<const M: usize> Default for MessageBuf<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const M: usize> Write for MessageBuf<M> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let remaining = M - self.pos;
        let mut to_copy = s.len();
        if to_copy > remaining {
            to_copy = remaining;
            while !s.is_char_boundary(to_copy) {
                to_copy -= 1;
            }
            self.truncated = true;
        }
        self.buffer[self.pos..self.pos + to_copy].copy_from_slice(&s.as_bytes()[..to_copy]);
        self.pos += to_copy;
        Ok(())
    }
}

impl<const M: usize> fmt::Debug for MessageBuf<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuf")
            .field("text", &self.as_str())
            .field("truncated", &self.truncated)
            .finish()
    }
}
