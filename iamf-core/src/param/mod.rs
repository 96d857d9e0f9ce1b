// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `param` module implements parameter definitions and the parameter-block codec: the
//! four schemas (mix-gain, demixing, recon-gain, extended) that a `ParamDefinition` can take,
//! and the matching `ParameterBlock` subblock encodings each one governs.

pub mod block;
pub mod definition;
pub mod demixing;
pub mod mix_gain;
pub mod recon_gain;

pub use block::{ParameterBlock, ParameterSubblock, ParameterSubblockData};
pub use definition::{Mode0Durations, ParamDefinition, ParamDefinitionCommon, ParamDefinitionType};
pub use demixing::{DMixPMode, DefaultDemixingInfoParameterData, DemixingInfoParameterData, DownMixingParams, WIdxUpdateRule};
pub use mix_gain::MixGainAnimation;
pub use recon_gain::{ReconGainElement, ReconGainFlags, ReconGainSubblock};
