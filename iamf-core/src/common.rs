// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `common` module defines common enums, structs, and configuration knobs shared across the
//! bitstream codec.

/// Controls the byte width `BitWriter::write_uleb128` emits.
///
/// Two ULEB128 encodings of the same value are semantically identical but not byte-identical;
/// reproducing a reference file bit-for-bit requires choosing the same policy the reference
/// encoder used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LebGenerator {
    /// Emit the fewest bytes that represent the value (the common case).
    Minimal,
    /// Pad with continuation-bit-set zero groups up to exactly `width` bytes, `1..=5`.
    FixedSize(u8),
}

impl Default for LebGenerator {
    fn default() -> Self {
        LebGenerator::Minimal
    }
}

/// Caps applied while reading, to bound allocation driven by attacker-controlled length fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReaderCaps {
    /// Largest `obu_size` (in bytes) the reader will allocate a buffer for.
    pub max_obu_size: u32,
}

impl Default for ReaderCaps {
    fn default() -> Self {
        // 2^28 bytes, per the memory-discipline default.
        ReaderCaps { max_obu_size: 1 << 28 }
    }
}

/// Describes the relative preference of a registered codec collaborator if multiple
/// implementations claim to support the same `codec_id_fourcc`.
#[derive(Copy, Clone)]
pub enum Tier {
    /// Prefer over others.
    Preferred,
    /// Standard tier: neither preferred nor a fallback.
    Standard,
    /// Use as a fallback if nothing else is available.
    Fallback,
}
