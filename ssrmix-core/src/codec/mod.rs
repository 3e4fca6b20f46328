//! URL-safe base64 used at every layer of an SSR link.
//!
//! Tokens in the wild are frequently unpadded and occasionally use the
//! standard alphabet, so [`decode`] repairs both before decoding.

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD, URL_SAFE};

/// URL-safe decoder that tolerates non-zero trailing bits in the last symbol.
const LENIENT: GeneralPurpose =
    GeneralPurpose::new(&alphabet::URL_SAFE, PAD.with_decode_allow_trailing_bits(true));

use crate::error::{Result, SsrError};

pub fn encode(text: &str) -> String {
    URL_SAFE.encode(text.as_bytes())
}

/// Number of `=` needed to bring `len` up to a multiple of 4.
pub fn padding_len(len: usize) -> usize {
    (4 - len % 4) % 4
}

pub fn decode(token: &str) -> Result<String> {
    let mut padded = String::with_capacity(token.len() + 3);
    for c in token.chars() {
        padded.push(match c {
            '+' => '-',
            '/' => '_',
            c => c,
        });
    }
    padded.extend(std::iter::repeat_n('=', padding_len(token.len())));

    let bytes = LENIENT.decode(padded.as_bytes()).map_err(|e| SsrError::Decode {
        token: token.to_string(),
        reason: e.to_string(),
        line: None,
    })?;
    String::from_utf8(bytes).map_err(|e| SsrError::Decode {
        token: token.to_string(),
        reason: format!("invalid utf-8: {e}"),
        line: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_is_complement_to_four() {
        assert_eq!(padding_len(0), 0);
        assert_eq!(padding_len(2), 2);
        assert_eq!(padding_len(3), 1);
        assert_eq!(padding_len(4), 0);
        assert_eq!(padding_len(6), 2);
    }

    #[test]
    fn decodes_unpadded_and_padded_tokens() {
        assert_eq!(decode("dGVzdA").unwrap(), "test");
        assert_eq!(decode("dGVzdA==").unwrap(), "test");
        assert_eq!(decode("aGVsbG8gd29ybGQ").unwrap(), "hello world");
    }

    #[test]
    fn ignores_trailing_bits_in_last_symbol() {
        // "B" leaves non-zero bits after "test"; the canonical form is "dGVzdA"
        assert_eq!(decode("dGVzdB").unwrap(), "test");
        assert_eq!(decode("dGVzdB==").unwrap(), "test");
    }

    #[test]
    fn accepts_standard_alphabet() {
        // "??>" encodes to "Pz8+" (standard) / "Pz8-" (url-safe)
        assert_eq!(decode("Pz8+").unwrap(), "??>");
        assert_eq!(decode("Pz8-").unwrap(), "??>");
        assert_eq!(encode("??>"), "Pz8-");
    }

    #[test]
    fn round_trips_non_ascii_passwords() {
        for s in ["", "p@ss:w/rd", "负载：35%", "a b\tc", "🙂x"] {
            assert_eq!(decode(&encode(s)).unwrap(), s);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode("a"), Err(SsrError::Decode { .. })));
        assert!(matches!(decode("!!!!"), Err(SsrError::Decode { .. })));
        // 0xff 0xfe is valid base64 but not utf-8
        assert!(matches!(decode("__4"), Err(SsrError::Decode { .. })));
    }
}
