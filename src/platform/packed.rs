//! Packed string decoding
//!
//! The embed page hides its bypass form inside a string of delimiter-separated
//! segments. Each segment is one character, written as a positional numeral
//! over a custom alphabet: the character at index `base` of the alphabet is
//! the delimiter, the ones before it are digits, and the character code is
//! shifted by `offset`.

use crate::error::DecodeError;

/// Parameters of a packed blob as found in the page markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPayload {
    /// Delimiter-separated numerals
    pub encoded: String,
    /// Digit alphabet; a character's index is its digit value
    pub alphabet: String,
    /// Added to each character code when packing
    pub offset: i64,
    /// Radix, also the index of the delimiter in the alphabet
    pub base: u32,
}

impl PackedPayload {
    /// Decode the payload into the hidden markup
    pub fn decode(&self) -> Result<String, DecodeError> {
        decode(&self.encoded, &self.alphabet, self.offset, self.base)
    }
}

/// Decode a packed string
///
/// Empty segments (leading, trailing or repeated delimiters) are skipped.
/// Characters missing from the alphabet count as the digit zero.
pub fn decode(
    encoded: &str,
    alphabet: &str,
    offset: i64,
    base: u32,
) -> Result<String, DecodeError> {
    let digits: Vec<char> = alphabet.chars().collect();
    let delimiter = delimiter(&digits, base)?;

    let mut decoded = String::with_capacity(encoded.len() / 2);
    for (index, segment) in encoded
        .split(delimiter)
        .filter(|segment| !segment.is_empty())
        .enumerate()
    {
        let value = segment_value(segment, &digits, base).ok_or(DecodeError::Overflow { index })?;
        let code = i64::try_from(value)
            .ok()
            .and_then(|value| value.checked_sub(offset))
            .ok_or(DecodeError::Overflow { index })?;

        let ch = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(DecodeError::InvalidCharCode { index, code })?;
        decoded.push(ch);
    }

    Ok(decoded)
}

/// Pack a string so that [`decode`] with the same parameters restores it
///
/// Every segment is followed by the delimiter, the way the embed pages
/// lay it out. Requires `base >= 2`.
pub fn encode(plain: &str, alphabet: &str, offset: i64, base: u32) -> Result<String, DecodeError> {
    let digits: Vec<char> = alphabet.chars().collect();
    if base < 2 {
        return Err(DecodeError::InvalidBase {
            base,
            len: digits.len(),
        });
    }
    let delimiter = delimiter(&digits, base)?;
    let radix = u64::from(base);

    let mut encoded = String::new();
    let mut numeral = Vec::new();
    for (index, ch) in plain.chars().enumerate() {
        let code = i64::from(u32::from(ch))
            .checked_add(offset)
            .ok_or(DecodeError::Overflow { index })?;
        let mut value =
            u64::try_from(code).map_err(|_| DecodeError::InvalidCharCode { index, code })?;

        numeral.clear();
        loop {
            numeral.push(digits[(value % radix) as usize]);
            value /= radix;
            if value == 0 {
                break;
            }
        }

        encoded.extend(numeral.iter().rev());
        encoded.push(delimiter);
    }

    Ok(encoded)
}

fn delimiter(digits: &[char], base: u32) -> Result<char, DecodeError> {
    if base == 0 {
        return Err(DecodeError::InvalidBase {
            base,
            len: digits.len(),
        });
    }
    digits
        .get(base as usize)
        .copied()
        .ok_or(DecodeError::InvalidBase {
            base,
            len: digits.len(),
        })
}

/// Value of one numeral, first character most significant
fn segment_value(segment: &str, digits: &[char], base: u32) -> Option<u64> {
    let radix = u64::from(base);
    segment.chars().try_fold(0u64, |value, ch| {
        let digit = digits.iter().position(|&d| d == ch).unwrap_or(0) as u64;
        value.checked_mul(radix)?.checked_add(digit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "0123456789abcdef";
    const SITE_ALPHABET: &str = "uUkbXJqne";

    #[test]
    fn test_decode_decimal_segments() {
        assert_eq!(decode("72a105a", HEX, 0, 10).unwrap(), "Hi");
        assert_eq!(decode("77a110a", HEX, 5, 10).unwrap(), "Hi");
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(decode("", HEX, 0, 10).unwrap(), "");
        assert_eq!(decode("", SITE_ALPHABET, 32, 8).unwrap(), "");
        assert_eq!(decode("", HEX, -7, 1).unwrap(), "");
    }

    #[test]
    fn test_decode_skips_empty_segments() {
        assert_eq!(decode("aa72aaa105a", HEX, 0, 10).unwrap(), "Hi");
        assert_eq!(decode("aaaa", HEX, 0, 10).unwrap(), "");
        assert_eq!(decode("72a105", HEX, 0, 10).unwrap(), "Hi");
    }

    #[test]
    fn test_decode_first_character_is_most_significant() {
        // 1000001 in base 2 is 65
        assert_eq!(decode("1000001", HEX, 0, 2).unwrap(), "A");
    }

    #[test]
    fn test_decode_unknown_characters_are_zero() {
        assert_eq!(decode("1Z00Z01", HEX, 0, 2).unwrap(), "A");
        assert_eq!(decode("6Q5", HEX, 0, 10).unwrap(), "\u{25d}");
    }

    #[test]
    fn test_decode_negative_code() {
        // no delimiter '2' and only one known non-zero digit: 0b00100 - 5
        let err = decode("AB1BA", HEX, 5, 2).unwrap_err();
        assert_eq!(err, DecodeError::InvalidCharCode { index: 0, code: -1 });
    }

    #[test]
    fn test_decode_surrogate_code() {
        let err = decode("72a55296a", HEX, 0, 10).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidCharCode {
                index: 1,
                code: 55296
            }
        );
    }

    #[test]
    fn test_decode_overflow() {
        let segment = "9".repeat(40);
        let err = decode(&segment, HEX, 0, 10).unwrap_err();
        assert_eq!(err, DecodeError::Overflow { index: 0 });
    }

    #[test]
    fn test_decode_invalid_base() {
        assert_eq!(
            decode("01", "01", 0, 2).unwrap_err(),
            DecodeError::InvalidBase { base: 2, len: 2 }
        );
        assert_eq!(
            decode("01", HEX, 0, 0).unwrap_err(),
            DecodeError::InvalidBase { base: 0, len: 16 }
        );
    }

    #[test]
    fn test_round_trip_markup() {
        let plain = r#"<form action="https://kwik.cx/d/abc" method="POST"><input type="hidden" name="_token" value="tok123"></form>"#;
        let packed = encode(plain, SITE_ALPHABET, 32, 8).unwrap();
        assert!(!packed.contains('"'));
        assert!(!packed.contains(','));
        assert_eq!(decode(&packed, SITE_ALPHABET, 32, 8).unwrap(), plain);
    }

    #[test]
    fn test_round_trip_non_ascii() {
        let plain = "héllo ✓ 動画";
        for (alphabet, offset, base) in [(SITE_ALPHABET, 7, 8), (HEX, 0, 10), (HEX, 100, 2)] {
            let packed = encode(plain, alphabet, offset, base).unwrap();
            assert_eq!(decode(&packed, alphabet, offset, base).unwrap(), plain);
        }
    }

    #[test]
    fn test_round_trip_generated_strings() {
        let ranges = [
            0x00..0x80,
            0x80..0x800,
            0x3040..0x3100,
            0xfff0..0x10000,
            0x1f600..0x1f650,
            0x10fff0..0x110000,
        ];
        let chars: Vec<char> = ranges
            .into_iter()
            .flatten()
            .filter_map(char::from_u32)
            .collect();

        for (alphabet, offset, base) in [
            (SITE_ALPHABET, 0, 8),
            (SITE_ALPHABET, 32, 2),
            (HEX, 7, 15),
            (HEX, 100, 10),
        ] {
            for len in [1, 3, 17] {
                for window in chars.chunks(len) {
                    let plain: String = window.iter().collect();
                    let packed = encode(&plain, alphabet, offset, base).unwrap();
                    assert_eq!(
                        decode(&packed, alphabet, offset, base).unwrap(),
                        plain,
                        "alphabet {alphabet:?}, offset {offset}, base {base}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_encode_layout() {
        assert_eq!(encode("Hi", HEX, 0, 10).unwrap(), "72a105a");
        assert_eq!(encode("", HEX, 0, 10).unwrap(), "");
    }

    #[test]
    fn test_encode_rejects_unrepresentable() {
        assert_eq!(
            encode("A", HEX, -100, 10).unwrap_err(),
            DecodeError::InvalidCharCode { index: 0, code: -35 }
        );
        assert_eq!(
            encode("A", HEX, 0, 1).unwrap_err(),
            DecodeError::InvalidBase { base: 1, len: 16 }
        );
    }

    #[test]
    fn test_payload_decode() {
        let payload = PackedPayload {
            encoded: "77a110a".to_string(),
            alphabet: HEX.to_string(),
            offset: 5,
            base: 10,
        };
        assert_eq!(payload.decode().unwrap(), "Hi");
    }
}
