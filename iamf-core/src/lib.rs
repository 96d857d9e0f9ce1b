// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `iamf-core` implements the IAMF (Immersive Audio Model and Formats) bitstream codec: OBU
//! framing, descriptor and parameter-block parsing, temporal-unit assembly, a streaming decode
//! processor, and an encode-path sequencer.
//!
//! This crate does not decode or encode audio payload bytes; codec-specific samples are passed
//! through opaque, exactly as the bitstream carries them.

pub mod audio_frame;
pub mod common;
pub mod descriptors;
pub mod errors;
pub mod ids;
pub mod io;
pub mod obu;
pub mod param;
pub mod parameters_manager;
pub mod sequencer;
pub mod streaming;
pub mod tables;
pub mod temporal_unit;
pub mod timing;
pub mod units;
pub mod util;

pub use audio_frame::AudioFrame;
pub use errors::{IamfError, IamfResult};
pub use parameters_manager::ParametersManager;
pub use sequencer::{ArbitraryObu, InsertionPoint, Sequencer, TemporalUnitInput};
pub use streaming::{DescriptorReadOutcome, StreamingProcessor, TemporalUnitItem, TemporalUnitStep};
pub use tables::ProgramTables;
pub use temporal_unit::{AudioFrameWithData, ParameterBlockWithData, TemporalUnit};
pub use timing::GlobalTimingModule;
