// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `units` module provides definitions for common units used by the timing model.

/// An instantaneous position in time since the start of an IA sequence, measured in samples at
/// the rate implied by the relevant codec config. Signed so duration arithmetic in the timing
/// module never needs a checked/saturating variant.
pub type Timestamp = i64;

/// A positive span of time, in samples.
pub type SampleDuration = u64;
