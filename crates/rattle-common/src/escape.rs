use std::fmt;

/// Prints a byte slice with control characters escaped, so a lexeme or file
/// path containing tabs/newlines/non-printables can be embedded safely in a
/// single-line diagnostic.
pub struct Escape<'a>(pub &'a [u8]);

impl<'a> Escape<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Escape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.0 {
            match byte {
                b'\n' => f.write_str("\\n")?,
                b'\r' => f.write_str("\\r")?,
                b'\t' => f.write_str("\\t")?,
                b'\\' => f.write_str("\\\\")?,
                0x20..=0x7e => f.write_char(byte as char)?,
                _ => write!(f, "\\x{byte:02x}")?,
            }
        }
        Ok(())
    }
}

use std::fmt::Write as _;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_bytes_pass_through() {
        assert_eq!(Escape::new(b"hello").to_string(), "hello");
    }

    #[test]
    fn control_bytes_are_escaped() {
        assert_eq!(Escape::new(b"a\nb\tc").to_string(), "a\\nb\\tc");
        assert_eq!(Escape::new(&[0x01]).to_string(), "\\x01");
    }
}
