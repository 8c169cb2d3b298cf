//! Plaintext output.  The configuration is a run of NUL-terminated
//! `key=value` lines.

use std::io::{self, Write};

/// Write `plaintext` with every NUL turned into a newline.
pub fn render_text<W: Write>(plaintext: &[u8], mut writer: W) -> io::Result<()> {
    for line in plaintext.split_inclusive(|&b| b == 0) {
        match line.split_last() {
            Some((&0, body)) => {
                writer.write_all(body)?;
                writer.write_all(b"\n")?;
            }
            _ => writer.write_all(line)?,
        }
    }
    writer.flush()
}

pub fn render_raw<W: Write>(plaintext: &[u8], mut writer: W) -> io::Result<()> {
    writer.write_all(plaintext)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(input: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        render_text(input, &mut out).unwrap();
        out
    }

    #[test]
    fn nul_becomes_newline() {
        assert_eq!(text(b"A=1\0B=2\0"), b"A=1\nB=2\n");
        assert_eq!(text(b"a\0\0\0"), b"a\n\n\n");
        assert_eq!(text(b"tail"), b"tail");
        assert_eq!(text(b""), b"");
    }

    #[test]
    fn raw_is_verbatim() {
        let mut out = Vec::new();
        render_raw(b"A=1\0", &mut out).unwrap();
        assert_eq!(out, b"A=1\0");
    }
}
