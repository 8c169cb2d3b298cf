pub mod checksum;
pub mod cipher;
pub mod container;
pub mod decode;
pub mod error;
pub mod header;
pub mod overrides;
pub mod render;
pub mod rng;

pub use decode::{decode, decode_file, DecodeMetadata, DecodeOptions, Decoded, RngChoice};
pub use error::DecodeError;
pub use header::ConfigHeader;
pub use rng::{get_rng, Keystream, RngKind};
