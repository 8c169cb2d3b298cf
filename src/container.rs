//! Locate the encrypted frame inside a backup file.
//!
//! Backups downloaded from the web interface pretend to be a tar archive: the
//! file starts with the entry name `photos.tar` and the real frame sits at a
//! fixed offset further in.  Backups produced any other way start with the
//! frame itself.

use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;

/// Leading bytes of a web-exported backup.
pub const TAR_MARKER: &[u8] = b"photos.tar";
/// Absolute offset of the frame when [`TAR_MARKER`] is present.
pub const CONFIG_OFFSET_AFTER_TAR: u64 = 0xa0000;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("Config should start at offset 0x{offset:x}, but the file is only {size} bytes")]
    Seek { offset: u64, size: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Header at byte 0.
    Bare,
    /// Tar-disguised export; header at [`CONFIG_OFFSET_AFTER_TAR`].
    Wrapped,
}

impl Layout {
    pub fn offset(self) -> u64 {
        match self {
            Layout::Bare    => 0,
            Layout::Wrapped => CONFIG_OFFSET_AFTER_TAR,
        }
    }

    pub fn detect(prefix: &[u8]) -> Self {
        if prefix.starts_with(TAR_MARKER) {
            Layout::Wrapped
        } else {
            Layout::Bare
        }
    }
}

/// Where the frame starts and how that was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub layout: Layout,
    pub offset: u64,
    /// Total stream length.
    pub size:   u64,
}

/// Detect the layout and leave `reader` positioned at the frame.
pub fn locate<R: Read + Seek>(reader: &mut R) -> Result<Located, LocateError> {
    let size = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    let mut tag = [0u8; TAR_MARKER.len()];
    let mut filled = 0;
    while filled < tag.len() {
        match reader.read(&mut tag[filled..])? {
            0 => break,
            n => filled += n,
        }
    }

    let layout = Layout::detect(&tag[..filled]);
    let offset = layout.offset();
    if offset > size {
        return Err(LocateError::Seek { offset, size });
    }
    reader.seek(SeekFrom::Start(offset))?;
    Ok(Located { layout, offset, size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wrapped(total: usize) -> Vec<u8> {
        let mut image = vec![0u8; total];
        image[..TAR_MARKER.len()].copy_from_slice(TAR_MARKER);
        image
    }

    #[test]
    fn bare_file_starts_at_zero() {
        let mut cur = Cursor::new(vec![0x24, 0x12, 0x13, 0x20, 8, 0, 0, 0, 0, 0, 0, 0]);
        let loc = locate(&mut cur).unwrap();
        assert_eq!(loc.layout, Layout::Bare);
        assert_eq!(loc.offset, 0);
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn marker_moves_to_fixed_offset() {
        let mut image = wrapped(CONFIG_OFFSET_AFTER_TAR as usize + 16);
        image[CONFIG_OFFSET_AFTER_TAR as usize] = 0xaa;
        let mut cur = Cursor::new(image);
        let loc = locate(&mut cur).unwrap();
        assert_eq!(loc.layout, Layout::Wrapped);
        assert_eq!(cur.position(), CONFIG_OFFSET_AFTER_TAR);

        let mut b = [0u8; 1];
        cur.read_exact(&mut b).unwrap();
        assert_eq!(b[0], 0xaa);
    }

    #[test]
    fn near_miss_marker_is_bare() {
        let mut image = wrapped(CONFIG_OFFSET_AFTER_TAR as usize + 16);
        image[0] = b'P';
        assert_eq!(locate(&mut Cursor::new(image)).unwrap().layout, Layout::Bare);
    }

    #[test]
    fn marker_in_short_file_fails() {
        let err = locate(&mut Cursor::new(wrapped(64))).unwrap_err();
        assert!(matches!(err, LocateError::Seek { offset: CONFIG_OFFSET_AFTER_TAR, size: 64 }));
    }

    #[test]
    fn file_shorter_than_marker_is_bare() {
        let loc = locate(&mut Cursor::new(b"photo".to_vec())).unwrap();
        assert_eq!(loc.layout, Layout::Bare);
        assert_eq!(locate(&mut Cursor::new(Vec::new())).unwrap().offset, 0);
    }
}
