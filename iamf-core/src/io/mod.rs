// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `io` module implements the two bit-level I/O primitives the bitstream codec is built on:
//! a [`BitReader`] that pulls fixed-width, ULEB128, signed-16, string, and boolean fields
//! most-significant-bit first from a byte slice, and a [`BitWriter`] that appends the same
//! primitives to a growing byte buffer.
//!
//! Both sides fail gracefully: out-of-range arguments are `InvalidArgument`, and a `BitReader`
//! running out of bytes mid-field is `ResourceExhausted` with the cursor left exactly where it
//! was before the failing call, so a caller can retry once more bytes are appended to the
//! source.

mod reader;
mod writer;

pub use reader::BitReader;
pub use writer::BitWriter;

/// Maximum length, in bytes, of a `read_string`/`write_string` field, *including* the nul
/// terminator.
pub const MAX_IAMF_STRING_SIZE: usize = 128;

/// Maximum number of bytes a ULEB128 value may occupy on the wire.
pub const MAX_ULEB128_SIZE: u8 = 5;
