//! Base62 encoding of counter values.
//!
//! The alphabet is fixed: digits, then lowercase letters, then uppercase
//! letters. `encode(0)` is `"0"` and no padding is ever added, so the
//! encoding of a `u64` is at most [`MAX_ENCODED_LEN`] symbols long.

use crate::error::{CoreError, Result};

/// The ordered base62 alphabet.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of `encode(u64::MAX)`.
pub const MAX_ENCODED_LEN: usize = 11;

const BASE: u64 = 62;

/// Encodes a non-negative integer as a base62 string.
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut buf = [0u8; MAX_ENCODED_LEN];
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = ALPHABET[(n % BASE) as usize];
        n /= BASE;
    }

    buf[i..].iter().map(|&b| b as char).collect()
}

/// Decodes a base62 string produced by [`encode`].
///
/// Fails on empty input, on symbols outside [`ALPHABET`], and on values
/// that do not fit in a `u64`.
pub fn decode(code: &str) -> Result<u64> {
    if code.is_empty() {
        return Err(CoreError::InvalidEncoding("empty input".to_string()));
    }

    code.bytes().try_fold(0u64, |acc, b| {
        let digit = symbol_value(b).ok_or_else(|| {
            CoreError::InvalidEncoding(format!("'{}' is not a base62 symbol", b as char))
        })?;
        acc.checked_mul(BASE)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| CoreError::InvalidEncoding(format!("'{code}' overflows u64")))
    })
}

fn symbol_value(b: u8) -> Option<u64> {
    let value = match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'z' => b - b'a' + 10,
        b'A'..=b'Z' => b - b'A' + 36,
        _ => return None,
    };
    Some(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn encodes_known_vectors() {
        assert_eq!(encode(0), "0");
        assert_eq!(encode(1), "1");
        assert_eq!(encode(9), "9");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(35), "z");
        assert_eq!(encode(36), "A");
        assert_eq!(encode(61), "Z");
        assert_eq!(encode(62), "10");
        assert_eq!(encode(3843), "ZZ");
    }

    #[test]
    fn alphabet_matches_symbol_values() {
        for (i, &b) in ALPHABET.iter().enumerate() {
            assert_eq!(symbol_value(b), Some(i as u64));
        }
    }

    #[test]
    fn max_value_fits_in_eleven_symbols() {
        let encoded = encode(u64::MAX);
        assert_eq!(encoded.len(), MAX_ENCODED_LEN);
        assert_eq!(decode(&encoded).unwrap(), u64::MAX);
    }

    #[test]
    fn decode_inverts_encode() {
        let samples = (0..10_000u64)
            .chain((0..64).map(|shift| 1u64 << shift))
            .chain([u64::MAX - 1, u64::MAX, 62u64.pow(10) - 1, 62u64.pow(10)]);

        for n in samples {
            assert_eq!(decode(&encode(n)).unwrap(), n, "round trip failed for {n}");
        }
    }

    #[test]
    fn encode_is_injective() {
        let codes: HashSet<String> = (0..100_000u64).map(encode).collect();
        assert_eq!(codes.len(), 100_000);
    }

    #[test]
    fn decode_rejects_bad_input() {
        assert!(decode("").is_err());
        assert!(decode("abc-def").is_err());
        assert!(decode("héllo").is_err());
        // 62^11 > u64::MAX
        assert!(decode("ZZZZZZZZZZZ").is_err());
    }
}
