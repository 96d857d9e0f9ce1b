// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::errors::{invalid_argument_error, resource_exhausted_error, IamfResult};
use crate::io::MAX_IAMF_STRING_SIZE;

/// Reads fixed-width unsigned literals, signed 16-bit integers, ULEB128s, ISO/IEC 14496-1
/// expandable sizes, nul-terminated strings, and raw byte spans most-significant-bit first out
/// of an in-memory byte slice.
///
/// Every read that can fail midway through a multi-bit field restores the cursor to its position
/// on entry before returning `ResourceExhausted`, so a caller holding a growing buffer can simply
/// retry the identical call once more bytes have arrived.
pub struct BitReader<'a> {
    buf: &'a [u8],
    pos: u64,
}

impl<'a> BitReader<'a> {
    /// Wraps `buf` for bit-level reading, cursor at bit 0.
    pub fn new(buf: &'a [u8]) -> Self {
        BitReader { buf, pos: 0 }
    }

    #[inline]
    fn bit_len(&self) -> u64 {
        self.buf.len() as u64 * 8
    }

    /// Current cursor position, in bits, from the start of the wrapped buffer.
    pub fn tell(&self) -> u64 {
        self.pos
    }

    /// Number of unread bits remaining in the buffer.
    pub fn bits_left(&self) -> u64 {
        self.bit_len() - self.pos
    }

    /// `true` if at least one more bit can be read.
    pub fn is_data_available(&self) -> bool {
        self.bits_left() > 0
    }

    /// Moves the cursor to an absolute bit position. Fails if `pos` is past the end of the
    /// buffer.
    pub fn seek(&mut self, pos: u64) -> IamfResult<()> {
        if pos > self.bit_len() {
            return resource_exhausted_error("seek past end of buffer");
        }
        self.pos = pos;
        Ok(())
    }

    fn checkpoint<T>(&mut self, f: impl FnOnce(&mut Self) -> IamfResult<T>) -> IamfResult<T> {
        let start = self.pos;
        match f(self) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }

    /// Reads `n_bits` (`1..=64`) as an unsigned literal, most-significant-bit first.
    pub fn read_unsigned(&mut self, n_bits: u32) -> IamfResult<u64> {
        if n_bits == 0 || n_bits > 64 {
            return invalid_argument_error("read_unsigned: n_bits out of range");
        }
        if (n_bits as u64) > self.bits_left() {
            return resource_exhausted_error("not enough bits remaining");
        }

        let mut value: u64 = 0;
        for _ in 0..n_bits {
            let byte_idx = (self.pos / 8) as usize;
            let bit_idx = 7 - (self.pos % 8);
            let bit = (self.buf[byte_idx] >> bit_idx) & 1;
            value = (value << 1) | u64::from(bit);
            self.pos += 1;
        }
        Ok(value)
    }

    /// Reads a single boolean bit.
    pub fn read_bool(&mut self) -> IamfResult<bool> {
        Ok(self.read_unsigned(1)? != 0)
    }

    /// Reads a full-width signed 16-bit two's complement integer.
    pub fn read_signed16(&mut self) -> IamfResult<i16> {
        Ok(self.read_unsigned(16)? as u16 as i16)
    }

    /// Reads a DWARF-style ULEB128: low 7 bits per byte, MSB is the continuation flag, 1 to 5
    /// bytes. Returns the decoded value and the number of bytes consumed. Non-minimal encodings
    /// are accepted. A fifth byte with its continuation bit set, or a decoded value exceeding
    /// `u32::MAX`, is `InvalidArgument`.
    pub fn read_uleb128(&mut self) -> IamfResult<(u32, u8)> {
        self.checkpoint(|this| {
            let mut value: u64 = 0;
            let mut byte_count: u8 = 0;
            loop {
                if byte_count >= 5 {
                    return invalid_argument_error("uleb128 exceeds 5 bytes");
                }
                let byte = this.read_unsigned(8)? as u8;
                byte_count += 1;
                value |= u64::from(byte & 0x7f) << (7 * u32::from(byte_count - 1));
                if byte & 0x80 == 0 {
                    break;
                }
            }
            if value > u64::from(u32::MAX) {
                return invalid_argument_error("uleb128 does not fit in 32 bits");
            }
            Ok((value as u32, byte_count))
        })
    }

    /// Reads the ISO/IEC 14496-1 "expandable size" encoding: groups of a 1-bit continuation flag
    /// followed by 7 payload bits, most significant group first. Fails if the accumulated value
    /// would exceed `2^max_class_size_bits - 1`.
    pub fn read_iso14496_1_expanded(&mut self, max_class_size_bits: u32) -> IamfResult<u32> {
        self.checkpoint(|this| {
            let limit = if max_class_size_bits >= 64 { u64::MAX } else { (1u64 << max_class_size_bits) - 1 };
            let mut value: u64 = 0;
            loop {
                let cont = this.read_unsigned(1)?;
                let payload = this.read_unsigned(7)?;
                value = (value << 7) | payload;
                if value > limit {
                    return invalid_argument_error("iso14496-1 expandable size exceeds max class size");
                }
                if cont == 0 {
                    break;
                }
            }
            Ok(value as u32)
        })
    }

    /// Fills `dst` with exactly `dst.len()` bytes.
    pub fn read_uint8_span(&mut self, dst: &mut [u8]) -> IamfResult<()> {
        self.checkpoint(|this| {
            for slot in dst.iter_mut() {
                *slot = this.read_unsigned(8)? as u8;
            }
            Ok(())
        })
    }

    /// Reads bytes up to and including a nul terminator, returning the bytes before it. Fails if
    /// no nul is found within `MAX_IAMF_STRING_SIZE` bytes.
    pub fn read_string(&mut self) -> IamfResult<String> {
        self.checkpoint(|this| {
            let mut bytes = Vec::new();
            loop {
                if bytes.len() + 1 > MAX_IAMF_STRING_SIZE {
                    return invalid_argument_error("string exceeds max size without a terminator");
                }
                let byte = this.read_unsigned(8)? as u8;
                if byte == 0 {
                    break;
                }
                bytes.push(byte);
            }
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        })
    }
}
