use std::io;
use thiserror::Error;

use crate::container::LocateError;
use crate::header::HeaderError;
use crate::rng::GeneratorError;

/// Everything that can abort a decode pass.  None of these are retried.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Config should start at offset 0x{offset:x}, but the file is only {size} bytes")]
    Seek { offset: u64, size: u64 },
    #[error("Invalid config length (0x{0:08x})")]
    InvalidLength(u32),
    #[error("Input is smaller than the header ({0} bytes)")]
    TooShort(usize),
    #[error("Config is truncated: header declares {declared} bytes, only {available} present")]
    Truncated { declared: u32, available: usize },
    #[error("Invalid checksum (0x{0:08x})")]
    ChecksumMismatch(u32),
    #[error("Unsupported generator configuration (degree {degree}, separation {separation})")]
    InvalidMode { degree: usize, separation: usize },
}

impl From<LocateError> for DecodeError {
    fn from(e: LocateError) -> Self {
        match e {
            LocateError::Seek { offset, size } => DecodeError::Seek { offset, size },
            LocateError::Io(e)                 => DecodeError::Io(e),
        }
    }
}

impl From<HeaderError> for DecodeError {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::InvalidLength(len) => DecodeError::InvalidLength(len),
            HeaderError::TooShort(n)        => DecodeError::TooShort(n),
        }
    }
}

impl From<GeneratorError> for DecodeError {
    fn from(e: GeneratorError) -> Self {
        match e {
            GeneratorError::InvalidMode { degree, separation } => {
                DecodeError::InvalidMode { degree, separation }
            }
        }
    }
}

impl DecodeError {
    /// Follow-up advice for the user, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DecodeError::ChecksumMismatch(_) => Some("try again with --ignore-checksum?"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
