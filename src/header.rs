use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use thiserror::Error;

/// Size of the header that precedes the encrypted payload.
pub const HEADER_SIZE: usize = 12;
/// The payload is encrypted one little-endian word at a time.
pub const WORD_SIZE: usize = 4;
/// Buffer the firmware reserves for header plus configuration.
pub const MAX_HEADER_AND_CONFIG_SIZE: usize = 0x39000;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Invalid config length (0x{0:08x})")]
    InvalidLength(u32),
    #[error("Input is smaller than the header ({0} < {HEADER_SIZE} bytes)")]
    TooShort(usize),
}

/// The 12-byte frame in front of the ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigHeader {
    /// Seed handed to `srand()`, e.g. 0x20131224 or 0x23091293.
    pub magic: u32,
    /// Ciphertext bytes following the header.
    pub len: u32,
    /// Completion checksum, not a CRC despite the name.
    pub crc: u32,
}

impl ConfigHeader {
    /// Parse from the start of `buf` and check `len` against `capacity`.
    pub fn parse(buf: &[u8], capacity: usize) -> Result<Self, HeaderError> {
        if buf.len() < HEADER_SIZE {
            return Err(HeaderError::TooShort(buf.len()));
        }
        let header = Self {
            magic: LittleEndian::read_u32(&buf[0..4]),
            len:   LittleEndian::read_u32(&buf[4..8]),
            crc:   LittleEndian::read_u32(&buf[8..12]),
        };
        header.check_len(capacity)?;
        Ok(header)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        LittleEndian::write_u32(&mut out[0..4], self.magic);
        LittleEndian::write_u32(&mut out[4..8], self.len);
        LittleEndian::write_u32(&mut out[8..12], self.crc);
        out
    }

    /// Reject lengths that are zero, not word aligned, or overflow the buffer.
    /// Must run before any word of the payload is touched.
    pub fn check_len(&self, capacity: usize) -> Result<(), HeaderError> {
        let len = self.len as usize;
        if len == 0 || len % WORD_SIZE != 0 || len > capacity.saturating_sub(HEADER_SIZE) {
            return Err(HeaderError::InvalidLength(self.len));
        }
        Ok(())
    }

    /// Total bytes covered by header and payload.
    pub fn frame_len(&self) -> usize {
        HEADER_SIZE + self.len as usize
    }
}
