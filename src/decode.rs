//! Decode driver: locate, read, parse, decrypt, verify.
//!
//! ```no_run
//! use orbicfg::decode::{decode_file, DecodeOptions};
//!
//! let decoded = decode_file("NETGEAR_Orbi.cfg", &DecodeOptions::default())?;
//! println!("{} bytes, rng {}", decoded.plaintext.len(), decoded.metadata.rng);
//! # Ok::<(), orbicfg::DecodeError>(())
//! ```
//!
//! A pass moves through [`DecodeStage`] in order.  Any IO or parse failure is
//! fatal and no plaintext is returned.  Checksum failure is fatal unless
//! [`DecodeOptions::verify_checksum`] is off.

use log::{debug, info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::checksum;
use crate::cipher::apply_keystream;
use crate::container::locate;
use crate::error::{DecodeError, Result};
use crate::header::{ConfigHeader, HEADER_SIZE, MAX_HEADER_AND_CONFIG_SIZE};
use crate::overrides;
use crate::rng::{get_rng, RngKind};

// ── DecodeOptions ─────────────────────────────────────────────────────────────

/// Which generator(s) to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RngChoice {
    /// Try each generator in [`RngKind::PROBE_ORDER`] until the checksum holds.
    #[default]
    Auto,
    Fixed(RngKind),
}

impl RngChoice {
    pub fn from_name(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("auto") {
            return Some(RngChoice::Auto);
        }
        RngKind::from_name(s).map(RngChoice::Fixed)
    }
}

/// Configuration for [`decode`].
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub rng:             RngChoice,
    /// Seed supplied from outside.  Skips the header magic and the override table.
    pub seed:            Option<u32>,
    pub verify_checksum: bool,
    /// Size of the fixed payload buffer, header included.
    pub capacity:        usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            rng:             RngChoice::Auto,
            seed:            None,
            verify_checksum: true,
            capacity:        MAX_HEADER_AND_CONFIG_SIZE,
        }
    }
}

// ── Stages and results ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Unparsed,
    Located,
    HeaderParsed,
    Decrypted,
    ChecksumValid,
    ChecksumInvalid,
}

/// How the payload was decrypted.  Enough to reproduce the keystream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodeMetadata {
    /// Offset of the header in the input file.
    pub header_offset: u64,
    /// Magic found in the header.
    pub stated_magic:  u32,
    /// Seed actually used for the keystream.
    pub real_magic:    u32,
    pub rng:           RngKind,
}

#[derive(Debug, Clone)]
pub struct Decoded {
    pub header:      ConfigHeader,
    pub metadata:    DecodeMetadata,
    pub checksum_ok: bool,
    /// Decrypted payload, header excluded.
    pub plaintext:   Vec<u8>,
}

// ── PayloadBuffer ─────────────────────────────────────────────────────────────

/// Fixed-capacity, zero-filled buffer holding header + payload.
/// Decryption overwrites the payload in place.
pub struct PayloadBuffer {
    bytes:  Vec<u8>,
    filled: usize,
}

impl PayloadBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { bytes: vec![0u8; capacity], filled: 0 }
    }

    /// Read until the buffer is full or the input ends.
    pub fn fill<R: Read>(&mut self, reader: &mut R) -> std::io::Result<usize> {
        while self.filled < self.bytes.len() {
            match reader.read(&mut self.bytes[self.filled..]) {
                Ok(0) => break,
                Ok(n) => self.filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(self.filled)
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes actually read from the input.
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The `len` bytes after the header.  `len` must have passed the header check.
    pub fn payload(&self, len: usize) -> &[u8] {
        &self.bytes[HEADER_SIZE..HEADER_SIZE + len]
    }

    pub fn payload_mut(&mut self, len: usize) -> &mut [u8] {
        &mut self.bytes[HEADER_SIZE..HEADER_SIZE + len]
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

struct Candidate {
    seed: u32,
    rng:  RngKind,
}

fn candidates(header: &ConfigHeader, opts: &DecodeOptions) -> Vec<Candidate> {
    let (seed, preferred) = match opts.seed {
        Some(seed) => (seed, None),
        None => match overrides::lookup(header.magic) {
            Some(o) => {
                info!("stated magic 0x{:08x} is overridden to 0x{:08x}", o.stated_magic, o.real_magic);
                (o.real_magic, Some(o.rng))
            }
            None => (header.magic, None),
        },
    };

    match (opts.rng, preferred) {
        (RngChoice::Fixed(rng), _) => vec![Candidate { seed, rng }],
        (RngChoice::Auto, Some(rng)) => vec![Candidate { seed, rng }],
        (RngChoice::Auto, None) => RngKind::PROBE_ORDER
            .into_iter()
            .map(|rng| Candidate { seed, rng })
            .collect(),
    }
}

/// Decode one backup image from `reader`.
pub fn decode<R: Read + Seek>(reader: &mut R, opts: &DecodeOptions) -> Result<Decoded> {
    let mut stage = DecodeStage::Unparsed;
    debug!("stage {stage:?}");

    let loc = locate(reader)?;
    stage = DecodeStage::Located;
    debug!("stage {stage:?}: {:?} layout, frame at 0x{:x}", loc.layout, loc.offset);

    let mut buf = PayloadBuffer::with_capacity(opts.capacity);
    buf.fill(reader)?;

    let header = ConfigHeader::parse(buf.as_bytes(), buf.capacity())?;
    if header.frame_len() > buf.filled() {
        return Err(DecodeError::Truncated {
            declared:  header.len,
            available: buf.filled().saturating_sub(HEADER_SIZE),
        });
    }
    stage = DecodeStage::HeaderParsed;
    debug!("stage {stage:?}: {header:?}");
    info!("using magic: 0x{:08x}", header.magic);

    let len = header.len as usize;
    let tried = candidates(&header, opts);
    let mut chosen = None;

    for (i, cand) in tried.iter().enumerate() {
        apply_keystream(buf.payload_mut(len), &mut get_rng(cand.rng, cand.seed));
        stage = DecodeStage::Decrypted;
        debug!("stage {stage:?} with {} seed 0x{:08x}", cand.rng, cand.seed);

        let ok = checksum::validate(buf.payload(len), header.crc);
        stage = if ok { DecodeStage::ChecksumValid } else { DecodeStage::ChecksumInvalid };
        debug!("stage {stage:?}");

        if ok || i + 1 == tried.len() {
            chosen = Some((cand, ok));
            break;
        }
        // Undo before trying the next generator.
        apply_keystream(buf.payload_mut(len), &mut get_rng(cand.rng, cand.seed));
    }

    let Some((cand, checksum_ok)) = chosen else {
        return Err(DecodeError::ChecksumMismatch(header.crc));
    };

    if !checksum_ok {
        if opts.verify_checksum {
            return Err(DecodeError::ChecksumMismatch(header.crc));
        }
        warn!("invalid checksum (0x{:08x}), continuing anyway", header.crc);
    }

    Ok(Decoded {
        header,
        metadata: DecodeMetadata {
            header_offset: loc.offset,
            stated_magic:  header.magic,
            real_magic:    cand.seed,
            rng:           cand.rng,
        },
        checksum_ok,
        plaintext: buf.payload(len).to_vec(),
    })
}

/// Open `path` and decode it.
pub fn decode_file<P: AsRef<Path>>(path: P, opts: &DecodeOptions) -> Result<Decoded> {
    let mut reader = BufReader::new(File::open(path)?);
    decode(&mut reader, opts)
}
