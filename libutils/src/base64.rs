//! Base64 codec with the standard alphabet and `=` padding.

use std::io::{self, Write};

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD64: u8 = b'=';

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("base64 input length {0} is not a multiple of 4")]
    InvalidLength(usize),

    #[error("invalid base64 symbol {symbol:?} at offset {offset}")]
    InvalidSymbol { symbol: char, offset: usize },

    #[error("misplaced base64 padding at offset {0}")]
    InvalidPadding(usize),
}

/// Length of the encoding of `n` input bytes.
pub const fn encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// Number of bytes `src` decodes to, assuming it is well formed.
pub fn decoded_len(src: &str) -> usize {
    let bytes = src.as_bytes();
    let pad = bytes.iter().rev().take(2).filter(|&&b| b == PAD64).count();
    (bytes.len() / 4 * 3).saturating_sub(pad)
}

fn encode_block(input: &[u8]) -> [u8; 4] {
    let b0 = input[0];
    let b1 = input.get(1).copied().unwrap_or(0);
    let b2 = input.get(2).copied().unwrap_or(0);

    let output = [
        b0 >> 2,
        ((b0 & 0x03) << 4) | (b1 >> 4),
        ((b1 & 0x0f) << 2) | (b2 >> 6),
        b2 & 0x3f,
    ];

    let mut block = [PAD64; 4];
    // a block of n input bytes produces n + 1 symbols, the rest is padding
    for (out, sextet) in block.iter_mut().zip(output).take(input.len() + 1) {
        *out = BASE64[sextet as usize];
    }
    block
}

/// Encode `src` as base64, writing the symbols to `w`.
pub fn encode_to(w: &mut dyn Write, src: &[u8]) -> io::Result<()> {
    for chunk in src.chunks(3) {
        w.write_all(&encode_block(chunk))?;
    }
    Ok(())
}

/// Encode `src` as a base64 string.
pub fn encode(src: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(src.len()));
    for chunk in src.chunks(3) {
        for symbol in encode_block(chunk) {
            out.push(symbol as char);
        }
    }
    out
}

fn symbol_value(ch: u8) -> Option<u8> {
    match ch {
        b'A'..=b'Z' => Some(ch - b'A'),
        b'a'..=b'z' => Some(ch - b'a' + 26),
        b'0'..=b'9' => Some(ch - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Decode a base64 string.
///
/// The input must be made of whole 4-symbol blocks. Padding may only appear as the last one or
/// two symbols of the final block.
pub fn decode(src: &str) -> Result<Vec<u8>, DecodeError> {
    let bytes = src.as_bytes();
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::InvalidLength(bytes.len()));
    }

    let mut target = Vec::with_capacity(decoded_len(src));
    let blocks = bytes.len() / 4;

    for (n, block) in bytes.chunks(4).enumerate() {
        let base = n * 4;
        let is_last = n + 1 == blocks;
        let mut sextets = [0u8; 4];
        let mut pad = 0;

        for (i, &ch) in block.iter().enumerate() {
            if ch == PAD64 {
                // only "xx==" or "xxx=" in the final block
                if !is_last || i < 2 || (i == 2 && block[3] != PAD64) {
                    return Err(DecodeError::InvalidPadding(base + i));
                }
                pad += 1;
                continue;
            }
            if pad > 0 {
                return Err(DecodeError::InvalidPadding(base + i));
            }
            sextets[i] = symbol_value(ch).ok_or(DecodeError::InvalidSymbol {
                symbol: ch as char,
                offset: base + i,
            })?;
        }

        let bits = (u32::from(sextets[0]) << 18)
            | (u32::from(sextets[1]) << 12)
            | (u32::from(sextets[2]) << 6)
            | u32::from(sextets[3]);

        target.push((bits >> 16) as u8);
        if pad < 2 {
            target.push((bits >> 8) as u8);
        }
        if pad < 1 {
            target.push(bits as u8);
        }
    }

    Ok(target)
}
