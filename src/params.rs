//! Encoding parameters.
//!
//! [`Quality`] is handed to the engine verbatim. Interpreting out-of-range
//! values is the engine's job, so nothing is clamped here.

/// Lossy encoding quality, nominally 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub i32);

impl Quality {
    /// Default for file writes.
    pub const FILE_DEFAULT: Quality = Quality(100);
    /// Default for base64 transport strings.
    pub const TRANSPORT_DEFAULT: Quality = Quality(67);

    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::FILE_DEFAULT
    }
}
