//! Base-83 digit encoding.
//!
//! Blur hashes pack every quantized value into digits of a fixed 83-symbol
//! alphabet. Values are written most-significant digit first with a fixed
//! digit count, so the position of each field in the hash is known up front.

use crate::error::CodecError;

/// The 83-character alphabet, in digit order.
pub const ALPHABET: &[u8; 83] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#$%*+,-.:;=?@[]^_{|}~";

/// Number of symbols in the alphabet.
pub const BASE: u32 = 83;

/// Reverse lookup table: byte value -> digit, 0xFF for bytes outside the alphabet.
const DIGITS: [u8; 256] = build_digit_table();

const fn build_digit_table() -> [u8; 256] {
    let mut table = [0xFFu8; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Append `value` to `out` as exactly `length` base-83 digits.
///
/// Digits above the requested length are dropped, matching the fixed-width
/// layout of the hash fields.
pub fn encode_into(value: u32, length: usize, out: &mut String) {
    let mut divisor = 1u32;
    for _ in 1..length {
        divisor *= BASE;
    }

    for _ in 0..length {
        let digit = (value / divisor) % BASE;
        out.push(ALPHABET[digit as usize] as char);
        divisor /= BASE;
    }
}

/// Encode `value` as exactly `length` base-83 digits.
pub fn encode(value: u32, length: usize) -> String {
    let mut out = String::with_capacity(length);
    encode_into(value, length, &mut out);
    out
}

/// Decode a run of base-83 digits into an integer.
///
/// # Errors
///
/// Returns [`CodecError::MalformedHash`] if any character is outside the alphabet.
pub fn decode(digits: &str) -> Result<u32, CodecError> {
    digits.bytes().try_fold(0u32, |acc, byte| {
        let digit = DIGITS[byte as usize];
        if digit == 0xFF {
            return Err(CodecError::malformed(format!(
                "character {:?} is not a base-83 digit",
                byte as char
            )));
        }
        Ok(acc.wrapping_mul(BASE).wrapping_add(digit as u32))
    })
}

/// Check whether every character of `s` belongs to the alphabet.
#[inline]
pub fn is_valid(s: &str) -> bool {
    s.bytes().all(|b| DIGITS[b as usize] != 0xFF)
}
