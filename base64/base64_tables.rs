//! Lookup tables for the pair-wise base64 codec.
//!
//! Every table is derived from [`ALPHABET`] by a `const fn` and lives in a
//! `static`, so nothing is computed at run time and nothing is ever mutated.
//!
//! Packing conventions shared by the encoder and decoder:
//!
//! * a *character key* packs two input bytes as `c0 | c1 << 8`
//!   (`u16::from_le_bytes([c0, c1])`);
//! * a *value key* packs two 6-bit values as `v0 | v1 << 6`.

/// Standard base64 alphabet (RFC 4648, section 4).
pub(crate) const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Padding character.
pub(crate) const PAD: u8 = b'=';

/// Marks a byte that is not part of the alphabet in [`REVERSE`].
pub(crate) const INVALID: u8 = 0xFF;

/// Number of character keys: every pair of arbitrary bytes.
pub(crate) const PAIR_DECODE_LEN: usize = 1 << 16;

/// Number of value keys: every pair of 6-bit values.
pub(crate) const PAIR_ENCODE_LEN: usize = 1 << 12;

/// Byte -> 6-bit value, or [`INVALID`].
pub(crate) static REVERSE: [u8; 256] = build_reverse(ALPHABET);

/// Character key -> value key.
///
/// Keys containing a byte outside the alphabet map to 0, which is also the
/// value of the valid pair `"AA"`. Callers must re-check both bytes through
/// [`REVERSE`] before trusting a 0.
pub(crate) static PAIR_DECODE: [u16; PAIR_DECODE_LEN] = build_pair_decode(ALPHABET);

/// Value key -> character key. Inverse of the valid entries of [`PAIR_DECODE`].
pub(crate) static PAIR_ENCODE: [u16; PAIR_ENCODE_LEN] = build_pair_encode(ALPHABET);

const fn build_reverse(alphabet: &[u8; 64]) -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[alphabet[i] as usize] = i as u8;
        i += 1;
    }
    table
}

// Only the 64 * 64 valid pairs are visited; every other key keeps the 0 sentinel.
const fn build_pair_decode(alphabet: &[u8; 64]) -> [u16; PAIR_DECODE_LEN] {
    let reverse = build_reverse(alphabet);
    let mut table = [0u16; PAIR_DECODE_LEN];
    let mut i = 0;
    while i < 64 {
        let c0 = alphabet[i];
        let mut j = 0;
        while j < 64 {
            let c1 = alphabet[j];
            table[char_key(c0, c1)] =
                value_key(reverse[c0 as usize], reverse[c1 as usize]) as u16;
            j += 1;
        }
        i += 1;
    }
    table
}

const fn build_pair_encode(alphabet: &[u8; 64]) -> [u16; PAIR_ENCODE_LEN] {
    let mut table = [0u16; PAIR_ENCODE_LEN];
    let mut v = 0;
    while v < PAIR_ENCODE_LEN {
        table[v] = char_key(alphabet[v & 0x3F], alphabet[v >> 6]) as u16;
        v += 1;
    }
    table
}

/// Packs two input bytes into a character key.
#[inline(always)]
pub(crate) const fn char_key(c0: u8, c1: u8) -> usize {
    c0 as usize | (c1 as usize) << 8
}

/// Packs two 6-bit values into a value key.
#[inline(always)]
pub(crate) const fn value_key(v0: u8, v1: u8) -> usize {
    v0 as usize | (v1 as usize) << 6
}
