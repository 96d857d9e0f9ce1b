// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::common::LebGenerator;
use crate::errors::{invalid_argument_error, IamfResult};
use crate::io::MAX_IAMF_STRING_SIZE;

/// Appends fixed-width unsigned literals, signed 16-bit integers, ULEB128s, ISO/IEC 14496-1
/// expandable sizes, nul-terminated strings, and raw byte spans most-significant-bit first to a
/// growing byte buffer.
pub struct BitWriter {
    bytes: Vec<u8>,
    cur_byte: u8,
    cur_bit: u32,
    leb_generator: LebGenerator,
}

impl BitWriter {
    /// Creates an empty writer. `leb_generator` controls the byte width of subsequent
    /// `write_uleb128` calls.
    pub fn new(leb_generator: LebGenerator) -> Self {
        BitWriter { bytes: Vec::new(), cur_byte: 0, cur_bit: 0, leb_generator }
    }

    /// Number of bits written so far, including any unflushed partial byte.
    pub fn bit_len(&self) -> u64 {
        self.bytes.len() as u64 * 8 + u64::from(self.cur_bit)
    }

    fn push_bit(&mut self, bit: u8) {
        self.cur_byte |= bit << (7 - self.cur_bit);
        self.cur_bit += 1;
        if self.cur_bit == 8 {
            self.bytes.push(self.cur_byte);
            self.cur_byte = 0;
            self.cur_bit = 0;
        }
    }

    /// Writes the low `n_bits` (`1..=64`) of `value`, most-significant-bit first. Fails if
    /// `value` does not fit in `n_bits`.
    pub fn write_unsigned(&mut self, value: u64, n_bits: u32) -> IamfResult<()> {
        if n_bits == 0 || n_bits > 64 {
            return invalid_argument_error("write_unsigned: n_bits out of range");
        }
        if n_bits < 64 && value >= (1u64 << n_bits) {
            return invalid_argument_error("write_unsigned: value exceeds n_bits");
        }
        for i in (0..n_bits).rev() {
            self.push_bit(((value >> i) & 1) as u8);
        }
        Ok(())
    }

    /// Writes a single boolean bit.
    pub fn write_bool(&mut self, value: bool) -> IamfResult<()> {
        self.write_unsigned(u64::from(value), 1)
    }

    /// Writes a full-width signed 16-bit two's complement integer.
    pub fn write_signed16(&mut self, value: i16) -> IamfResult<()> {
        self.write_unsigned(value as u16 as u64, 16)
    }

    /// Writes `value` as a ULEB128, shaped by the configured [`LebGenerator`] policy.
    pub fn write_uleb128(&mut self, value: u32) -> IamfResult<()> {
        match self.leb_generator {
            LebGenerator::Minimal => {
                let mut v = value;
                loop {
                    let mut byte = (v & 0x7f) as u8;
                    v >>= 7;
                    if v != 0 {
                        byte |= 0x80;
                    }
                    self.write_unsigned(u64::from(byte), 8)?;
                    if v == 0 {
                        break;
                    }
                }
                Ok(())
            }
            LebGenerator::FixedSize(width) => {
                if !(1..=5).contains(&width) {
                    return invalid_argument_error("fixed leb width out of range");
                }
                if width < 5 && value >= (1u32 << (7 * u32::from(width))) {
                    return invalid_argument_error("value does not fit in fixed leb width");
                }
                let mut v = value;
                for i in 0..width {
                    let mut byte = (v & 0x7f) as u8;
                    v >>= 7;
                    if i != width - 1 {
                        byte |= 0x80;
                    }
                    self.write_unsigned(u64::from(byte), 8)?;
                }
                Ok(())
            }
        }
    }

    /// Writes `value` using the ISO/IEC 14496-1 "expandable size" encoding: groups of a 1-bit
    /// continuation flag followed by 7 payload bits, most significant group first.
    pub fn write_iso14496_1_expanded(&mut self, value: u32, max_class_size_bits: u32) -> IamfResult<()> {
        let limit = if max_class_size_bits >= 32 { u64::MAX } else { (1u64 << max_class_size_bits) - 1 };
        if u64::from(value) > limit {
            return invalid_argument_error("value exceeds max class size");
        }

        let mut groups = Vec::new();
        let mut v = value;
        loop {
            groups.push((v & 0x7f) as u8);
            v >>= 7;
            if v == 0 {
                break;
            }
        }
        groups.reverse();

        let last = groups.len() - 1;
        for (i, group) in groups.into_iter().enumerate() {
            self.write_bool(i != last)?;
            self.write_unsigned(u64::from(group), 7)?;
        }
        Ok(())
    }

    /// Appends raw bytes, each written MSB-first as an 8-bit literal.
    pub fn write_uint8_span(&mut self, data: &[u8]) -> IamfResult<()> {
        for byte in data {
            self.write_unsigned(u64::from(*byte), 8)?;
        }
        Ok(())
    }

    /// Writes `s` followed by a nul terminator. Fails if `s` is not valid without embedded nul
    /// bytes, or if it would exceed `MAX_IAMF_STRING_SIZE - 1` bytes.
    pub fn write_string(&mut self, s: &str) -> IamfResult<()> {
        let bytes = s.as_bytes();
        if bytes.len() + 1 > MAX_IAMF_STRING_SIZE {
            return invalid_argument_error("string exceeds max size");
        }
        if bytes.contains(&0) {
            return invalid_argument_error("string contains an embedded nul byte");
        }
        self.write_uint8_span(bytes)?;
        self.write_unsigned(0, 8)
    }

    /// Flushes any partial trailing byte (zero-padded) and returns the accumulated buffer.
    pub fn finish(mut self) -> Vec<u8> {
        if self.cur_bit > 0 {
            self.bytes.push(self.cur_byte);
            self.cur_byte = 0;
            self.cur_bit = 0;
        }
        self.bytes
    }
}
