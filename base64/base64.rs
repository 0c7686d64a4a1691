//! A table-driven library for base64 encoding and decoding.
//!
//! Symbols are translated two at a time: the encoder looks up a pair of 6-bit
//! values and gets back two output characters, the decoder looks up a pair of
//! input characters and gets back two 6-bit values. Only the standard
//! alphabet (RFC 4648) with `=` padding is supported.

use tracing::debug;

#[path = "base64_tables.rs"]
mod tables;

#[cfg(test)]
#[path = "base64_tests.rs"]
mod tests;

use tables::{char_key, value_key, ALPHABET, INVALID, PAD, PAIR_DECODE, PAIR_ENCODE, REVERSE};

/// Error type for base64 decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Unpadded input whose length is not a multiple of 4.
    #[error("invalid input length")]
    MalformedLength,

    /// Byte outside the alphabet, with its offset in the input.
    #[error("invalid character at position {0}")]
    InvalidCharacter(usize),

    /// `=` somewhere other than the last one or two positions of the input.
    #[error("invalid padding")]
    InvalidPadding,
}

/// Calculates the encoded length for a given input length.
///
/// # Example
///
/// ```
/// use pair_base64::encoded_len;
///
/// assert_eq!(encoded_len(0), 0);
/// assert_eq!(encoded_len(1), 4);
/// assert_eq!(encoded_len(3), 4);
/// assert_eq!(encoded_len(4), 8);
/// ```
#[inline]
pub fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Calculates the exact decoded length of a base64 input.
///
/// Only the length and padding are validated; symbols are not inspected, so
/// an `Ok` here does not mean [`decode`] will succeed.
///
/// # Example
///
/// ```
/// use pair_base64::{decoded_len, DecodeError};
///
/// assert_eq!(decoded_len("TWFu"), Ok(3));
/// assert_eq!(decoded_len("TQ=="), Ok(1));
/// assert_eq!(decoded_len("TWF"), Err(DecodeError::MalformedLength));
/// ```
pub fn decoded_len<T: AsRef<[u8]> + ?Sized>(input: &T) -> Result<usize, DecodeError> {
    Layout::of(input.as_ref()).map(|layout| layout.decoded_len())
}

/// Encodes binary data to a padded base64 string.
///
/// # Example
///
/// ```
/// use pair_base64::encode;
///
/// assert_eq!(encode(b"Man"), "TWFu");
/// assert_eq!(encode(b"Ma"), "TWE=");
/// assert_eq!(encode(b"M"), "TQ==");
/// ```
pub fn encode(data: &[u8]) -> String {
    let mut output = vec![0u8; encoded_len(data.len())];
    encode_to_slice(&mut output, data);

    // SAFETY: every byte written by encode_to_slice comes from ALPHABET or is
    // PAD, all of which are ASCII.
    unsafe { String::from_utf8_unchecked(output) }
}

/// Encodes data directly into a pre-allocated slice.
///
/// Returns the number of bytes written, always `encoded_len(data.len())`.
/// Bytes of `output` past that length are left untouched.
///
/// # Panics
///
/// Panics if `output` is shorter than `encoded_len(data.len())`.
pub fn encode_to_slice(output: &mut [u8], data: &[u8]) -> usize {
    let output_len = encoded_len(data.len());
    assert!(
        output.len() >= output_len,
        "output buffer too small: {} < {}",
        output.len(),
        output_len
    );

    let mut chunks = data.chunks_exact(3);
    let mut out_idx = 0;

    for chunk in &mut chunks {
        let (b0, b1, b2) = (chunk[0], chunk[1], chunk[2]);
        write_pair(&mut output[out_idx..], b0 >> 2, ((b0 & 0x03) << 4) | (b1 >> 4));
        write_pair(&mut output[out_idx + 2..], ((b1 & 0x0F) << 2) | (b2 >> 6), b2 & 0x3F);
        out_idx += 4;
    }

    match *chunks.remainder() {
        [b0] => {
            write_pair(&mut output[out_idx..], b0 >> 2, (b0 & 0x03) << 4);
            output[out_idx + 2] = PAD;
            output[out_idx + 3] = PAD;
        }
        [b0, b1] => {
            write_pair(&mut output[out_idx..], b0 >> 2, ((b0 & 0x03) << 4) | (b1 >> 4));
            output[out_idx + 2] = ALPHABET[((b1 & 0x0F) << 2) as usize];
            output[out_idx + 3] = PAD;
        }
        _ => {}
    }

    output_len
}

#[inline(always)]
fn write_pair(output: &mut [u8], v0: u8, v1: u8) {
    output[..2].copy_from_slice(&PAIR_ENCODE[value_key(v0, v1)].to_le_bytes());
}

/// Decodes a padded base64 input to binary data.
///
/// Accepts anything that views as bytes (`&str`, `&[u8]`, `String`, ...).
/// Decoding stops at the first invalid symbol; no partial output is returned.
///
/// # Example
///
/// ```
/// use pair_base64::{decode, DecodeError};
///
/// assert_eq!(decode("TWFu").unwrap(), b"Man");
/// assert_eq!(decode("TWE=").unwrap(), b"Ma");
/// assert_eq!(decode("TW!u"), Err(DecodeError::InvalidCharacter(2)));
/// assert_eq!(decode("TWFu="), Err(DecodeError::InvalidPadding));
/// ```
pub fn decode<T: AsRef<[u8]> + ?Sized>(input: &T) -> Result<Vec<u8>, DecodeError> {
    let input = input.as_ref();
    decode_to_vec(input)
        .inspect_err(|err| debug!(%err, len = input.len(), "rejected base64 input"))
}

/// Decodes a base64 buffer in place, returning the decoded prefix of `buf`.
///
/// Each group of 3 output bytes is written behind the 4 input bytes it was
/// decoded from, so no scratch space is needed. On error the contents of
/// `buf` are unspecified.
///
/// # Example
///
/// ```
/// use pair_base64::decode_in_place;
///
/// let mut buf = b"SGVsbG8=".to_vec();
/// assert_eq!(decode_in_place(&mut buf).unwrap(), b"Hello");
/// ```
pub fn decode_in_place(buf: &mut [u8]) -> Result<&[u8], DecodeError> {
    match decode_into_prefix(buf) {
        Ok(len) => Ok(&buf[..len]),
        Err(err) => {
            debug!(%err, len = buf.len(), "rejected base64 input");
            Err(err)
        }
    }
}

fn decode_to_vec(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let layout = Layout::of(input)?;
    let mut output = Vec::with_capacity(layout.decoded_len());

    for group in 0..layout.full_groups {
        output.extend_from_slice(&decode_group(input, group * 4)?);
    }

    if layout.padding > 0 {
        let (tail, len) = decode_tail(input, layout.full_groups * 4, layout.padding)?;
        output.extend_from_slice(&tail[..len]);
    }

    Ok(output)
}

fn decode_into_prefix(buf: &mut [u8]) -> Result<usize, DecodeError> {
    let layout = Layout::of(buf)?;

    for group in 0..layout.full_groups {
        let bytes = decode_group(buf, group * 4)?;
        buf[group * 3..group * 3 + 3].copy_from_slice(&bytes);
    }

    let out_idx = layout.full_groups * 3;
    if layout.padding > 0 {
        let (tail, len) = decode_tail(buf, layout.full_groups * 4, layout.padding)?;
        buf[out_idx..out_idx + len].copy_from_slice(&tail[..len]);
    }

    Ok(layout.decoded_len())
}

/// Length and padding structure of an input that passed the structural checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    /// Groups of four data symbols, excluding a padded final group.
    full_groups: usize,
    /// Number of trailing `=`, at most 2. Non-zero means the final group is padded.
    padding: usize,
}

impl Layout {
    fn of(input: &[u8]) -> Result<Self, DecodeError> {
        let padding = input.iter().rev().take_while(|&&b| b == PAD).count();
        if padding > 2 {
            return Err(DecodeError::InvalidPadding);
        }

        if input.len() % 4 != 0 {
            return Err(if padding > 0 {
                DecodeError::InvalidPadding
            } else {
                DecodeError::MalformedLength
            });
        }

        let groups = input.len() / 4;
        let full_groups = if padding > 0 { groups - 1 } else { groups };
        Ok(Self { full_groups, padding })
    }

    fn decoded_len(&self) -> usize {
        self.full_groups * 3
            + match self.padding {
                1 => 2,
                2 => 1,
                _ => 0,
            }
    }
}

/// Decodes the four symbols at `pos` into three bytes.
#[inline(always)]
fn decode_group(input: &[u8], pos: usize) -> Result<[u8; 3], DecodeError> {
    let lo = decode_pair(input, pos)? as u32;
    let hi = decode_pair(input, pos + 2)? as u32;

    let n = ((lo & 0x3F) << 18) | ((lo >> 6) << 12) | ((hi & 0x3F) << 6) | (hi >> 6);
    Ok([(n >> 16) as u8, (n >> 8) as u8, n as u8])
}

/// Decodes a padded final group (`xy==` or `xyz=`) at `pos`.
///
/// Returns the decoded bytes and how many of them are meaningful. Low bits
/// of the last data symbol that fall into the padding are discarded.
fn decode_tail(input: &[u8], pos: usize, padding: usize) -> Result<([u8; 2], usize), DecodeError> {
    let pair = decode_pair(input, pos)?;
    let (v0, v1) = (pair & 0x3F, pair >> 6);
    let b0 = ((v0 << 2) | (v1 >> 4)) as u8;
    if padding == 2 {
        return Ok(([b0, 0], 1));
    }

    let v2 = decode_symbol(input, pos + 2)? as u16;
    let b1 = (((v1 & 0x0F) << 4) | (v2 >> 2)) as u8;
    Ok(([b0, b1], 2))
}

/// Looks up the two symbols at `pos` as one packed value key.
#[inline(always)]
fn decode_pair(input: &[u8], pos: usize) -> Result<u16, DecodeError> {
    match PAIR_DECODE[char_key(input[pos], input[pos + 1])] {
        0 => decode_pair_slow(input, pos),
        packed => Ok(packed),
    }
}

// A 0 from the pair table is either "AA" or a pair with an invalid symbol.
#[cold]
fn decode_pair_slow(input: &[u8], pos: usize) -> Result<u16, DecodeError> {
    let v0 = decode_symbol(input, pos)?;
    let v1 = decode_symbol(input, pos + 1)?;
    Ok(value_key(v0, v1) as u16)
}

#[inline]
fn decode_symbol(input: &[u8], pos: usize) -> Result<u8, DecodeError> {
    match REVERSE[input[pos] as usize] {
        INVALID if input[pos] == PAD => Err(DecodeError::InvalidPadding),
        INVALID => Err(DecodeError::InvalidCharacter(pos)),
        value => Ok(value),
    }
}
