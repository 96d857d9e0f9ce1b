// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Descriptor OBU bodies: the one-time-per-sequence configuration that every temporal unit is
//! interpreted against.

pub mod audio_element;
pub mod codec_config;
pub mod ia_sequence_header;
pub mod mix_presentation;

pub use audio_element::{
    AmbisonicsMonoConfig, AmbisonicsProjectionConfig, AudioElement, AudioElementConfig, AudioElementParam,
    AudioElementType, ChannelAudioLayerConfig, LoudspeakerLayout, ScalableChannelLayoutConfig,
};
pub use codec_config::{CodecConfig, CodecId};
pub use ia_sequence_header::{IaSequenceHeader, Profile, IAMF_MAGIC};
pub use mix_presentation::{
    AnchoredLoudnessElement, HeadphonesRenderingConfig, LoudnessInfo, MixPresentation, MixPresentationLayout,
    MixPresentationSubMix, RenderingConfig, SoundSystemLayout, SubMixAudioElement,
};
