use crate::error::InternalError;

///
/// CONSTANTS
///

/// Default upper bound for one decoded string state (1 GiB).
pub const DEFAULT_MAX_STRING_BYTES: usize = 1 << 30;

/// Default upper bound for one decoded generic value payload.
pub const DEFAULT_MAX_VALUE_BYTES: usize = 1 << 30;

///
/// DecodeLimits
///
/// Decode-side configuration. Lengths above a limit are treated as corrupt
/// wire state rather than allocated.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeLimits {
    pub max_string_bytes: usize,
    pub max_value_bytes: usize,
}

impl DecodeLimits {
    #[must_use]
    pub const fn new(max_string_bytes: usize, max_value_bytes: usize) -> Self {
        Self {
            max_string_bytes,
            max_value_bytes,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STRING_BYTES, DEFAULT_MAX_VALUE_BYTES)
    }
}

///
/// WriteBuffer
///
/// Append-only little-endian output buffer for aggregate state payloads.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WriteBuffer {
    bytes: Vec<u8>,
}

impl WriteBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

///
/// ReadBuffer
///
/// Cursor over serialized aggregate state bytes. Every short read is reported
/// as corruption; the buffer never panics on malformed input.
///

#[derive(Clone, Debug)]
pub struct ReadBuffer<'b> {
    bytes: &'b [u8],
    pos: usize,
    limits: DecodeLimits,
}

impl<'b> ReadBuffer<'b> {
    #[must_use]
    pub fn new(bytes: &'b [u8]) -> Self {
        Self::with_limits(bytes, DecodeLimits::default())
    }

    #[must_use]
    pub const fn with_limits(bytes: &'b [u8], limits: DecodeLimits) -> Self {
        Self {
            bytes,
            pos: 0,
            limits,
        }
    }

    #[must_use]
    pub const fn limits(&self) -> DecodeLimits {
        self.limits
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the unread tail without consuming it.
    #[must_use]
    pub fn peek_rest(&self) -> &'b [u8] {
        &self.bytes[self.pos..]
    }

    /// Consume exactly `len` bytes.
    pub fn read_exact(&mut self, len: usize) -> Result<&'b [u8], InternalError> {
        if len > self.remaining() {
            return Err(InternalError::serialize_corruption(format!(
                "truncated aggregate state: need {len} bytes at offset {}, {} available",
                self.pos,
                self.remaining()
            )));
        }

        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;

        Ok(out)
    }

    /// Mark `len` bytes of the unread tail as consumed.
    pub fn advance(&mut self, len: usize) -> Result<(), InternalError> {
        self.read_exact(len).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, InternalError> {
        Ok(self.read_exact(1)?[0])
    }

    /// Read a boolean byte; anything other than 0 or 1 is corruption.
    pub fn read_bool(&mut self) -> Result<bool, InternalError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(InternalError::serialize_corruption(format!(
                "invalid boolean byte in aggregate state: {other:#04x}"
            ))),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32, InternalError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.read_exact(4)?);

        Ok(i32::from_le_bytes(raw))
    }

    pub fn read_u64(&mut self) -> Result<u64, InternalError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.read_exact(8)?);

        Ok(u64::from_le_bytes(raw))
    }
}

///
/// TESTS
///
