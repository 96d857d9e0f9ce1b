// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `iamf` is the user-facing crate for reading and writing IAMF (Immersive Audio Model and
//! Formats) bitstreams. It re-exports [`iamf_core`]'s public API unchanged; application code
//! should depend on this crate rather than on `iamf-core` directly.

pub use iamf_core::*;
