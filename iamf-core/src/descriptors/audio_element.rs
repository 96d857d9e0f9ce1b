// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `AudioElement`: the descriptor that groups substreams into a channel-based or scene-based
//! (ambisonics) configuration and attaches the parameter definitions that animate it.

use std::collections::HashMap;

use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, CodecConfigId, SubstreamId};
use crate::io::{BitReader, BitWriter};
use crate::param::{ParamDefinition, ParamDefinitionType};

/// The 4-bit `loudspeaker_layout`. Named variants cover the layouts the reference encoder emits;
/// `Reserved` preserves any other 4-bit value so an unrecognised layout still round-trips.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoudspeakerLayout {
    Mono,
    Stereo,
    Layout5_1,
    Layout5_1_2,
    Layout5_1_4,
    Layout7_1,
    Layout7_1_4,
    Layout3_1_2,
    Binaural,
    Reserved(u8),
}

impl LoudspeakerLayout {
    pub fn from_u8(value: u8) -> LoudspeakerLayout {
        match value {
            0 => LoudspeakerLayout::Mono,
            1 => LoudspeakerLayout::Stereo,
            2 => LoudspeakerLayout::Layout5_1,
            3 => LoudspeakerLayout::Layout5_1_2,
            4 => LoudspeakerLayout::Layout5_1_4,
            5 => LoudspeakerLayout::Layout7_1,
            6 => LoudspeakerLayout::Layout7_1_4,
            7 => LoudspeakerLayout::Layout3_1_2,
            15 => LoudspeakerLayout::Binaural,
            other => LoudspeakerLayout::Reserved(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            LoudspeakerLayout::Mono => 0,
            LoudspeakerLayout::Stereo => 1,
            LoudspeakerLayout::Layout5_1 => 2,
            LoudspeakerLayout::Layout5_1_2 => 3,
            LoudspeakerLayout::Layout5_1_4 => 4,
            LoudspeakerLayout::Layout7_1 => 5,
            LoudspeakerLayout::Layout7_1_4 => 6,
            LoudspeakerLayout::Layout3_1_2 => 7,
            LoudspeakerLayout::Binaural => 15,
            LoudspeakerLayout::Reserved(v) => v,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelAudioLayerConfig {
    pub loudspeaker_layout: LoudspeakerLayout,
    pub recon_gain_is_present: bool,
    pub substream_count: u8,
    pub coupled_substream_count: u8,
    pub output_gain: Option<i16>,
}

impl ChannelAudioLayerConfig {
    fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let loudspeaker_layout = LoudspeakerLayout::from_u8(reader.read_unsigned(4)? as u8);
        let output_gain_is_present = reader.read_bool()?;
        let recon_gain_is_present = reader.read_bool()?;
        let _reserved = reader.read_unsigned(2)?;
        let substream_count = reader.read_unsigned(8)? as u8;
        let coupled_substream_count = reader.read_unsigned(8)? as u8;

        let output_gain = if output_gain_is_present {
            let _gain_flag = reader.read_unsigned(6)?;
            let _reserved = reader.read_unsigned(2)?;
            Some(reader.read_signed16()?)
        } else {
            None
        };

        Ok(ChannelAudioLayerConfig {
            loudspeaker_layout,
            recon_gain_is_present,
            substream_count,
            coupled_substream_count,
            output_gain,
        })
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_unsigned(u64::from(self.loudspeaker_layout.to_u8()), 4)?;
        writer.write_bool(self.output_gain.is_some())?;
        writer.write_bool(self.recon_gain_is_present)?;
        writer.write_unsigned(0, 2)?;
        writer.write_unsigned(u64::from(self.substream_count), 8)?;
        writer.write_unsigned(u64::from(self.coupled_substream_count), 8)?;
        if let Some(gain) = self.output_gain {
            writer.write_unsigned(0, 6)?;
            writer.write_unsigned(0, 2)?;
            writer.write_signed16(gain)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalableChannelLayoutConfig {
    pub layers: Vec<ChannelAudioLayerConfig>,
}

impl ScalableChannelLayoutConfig {
    fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let num_layers = reader.read_unsigned(3)?;
        let _reserved = reader.read_unsigned(5)?;
        if !(1..=6).contains(&num_layers) {
            return invalid_argument_error("num_layers must be in [1, 6]");
        }
        let mut layers = Vec::with_capacity(num_layers as usize);
        for _ in 0..num_layers {
            layers.push(ChannelAudioLayerConfig::read(reader)?);
        }
        let config = ScalableChannelLayoutConfig { layers };
        config.validate()?;
        Ok(config)
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        self.validate()?;
        writer.write_unsigned(self.layers.len() as u64, 3)?;
        writer.write_unsigned(0, 5)?;
        for layer in &self.layers {
            layer.write(writer)?;
        }
        Ok(())
    }

    fn validate(&self) -> IamfResult<()> {
        if !(1..=6).contains(&self.layers.len()) {
            return invalid_argument_error("num_layers must be in [1, 6]");
        }
        let has_binaural = self.layers.iter().any(|l| l.loudspeaker_layout == LoudspeakerLayout::Binaural);
        if has_binaural && self.layers.len() > 1 {
            return invalid_argument_error("a binaural layer must be the only layer");
        }
        Ok(())
    }
}

/// Smallest perfect square in `{1, 4, 9, ..., 225}` that is `>= n`, or `None` if `n > 225`.
pub fn smallest_allowed_ambisonics_count(n: u32) -> Option<u32> {
    (0..=14).map(|order| (order + 1) * (order + 1)).find(|&sq| sq >= n)
}

fn is_allowed_ambisonics_count(n: u32) -> bool {
    n >= 1 && n <= 225 && (1..=15).any(|order| order * order == n)
}

pub const AMBISONICS_DROPPED_CHANNEL: u8 = 255;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbisonicsMonoConfig {
    pub output_channel_count: u8,
    pub substream_count: u8,
    pub channel_mapping: Vec<u8>,
}

impl AmbisonicsMonoConfig {
    fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let output_channel_count = reader.read_unsigned(8)? as u8;
        let substream_count = reader.read_unsigned(8)? as u8;
        let mut channel_mapping = Vec::with_capacity(output_channel_count as usize);
        for _ in 0..output_channel_count {
            channel_mapping.push(reader.read_unsigned(8)? as u8);
        }
        let config = AmbisonicsMonoConfig { output_channel_count, substream_count, channel_mapping };
        config.validate()?;
        Ok(config)
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        self.validate()?;
        writer.write_unsigned(u64::from(self.output_channel_count), 8)?;
        writer.write_unsigned(u64::from(self.substream_count), 8)?;
        for &m in &self.channel_mapping {
            writer.write_unsigned(u64::from(m), 8)?;
        }
        Ok(())
    }

    fn validate(&self) -> IamfResult<()> {
        if !is_allowed_ambisonics_count(u32::from(self.output_channel_count)) {
            return invalid_argument_error("output_channel_count must be a perfect square <= 225");
        }
        if self.channel_mapping.len() != self.output_channel_count as usize {
            return invalid_argument_error("channel_mapping length must equal output_channel_count");
        }
        let mut seen = vec![false; self.substream_count as usize];
        for &m in &self.channel_mapping {
            if m == AMBISONICS_DROPPED_CHANNEL {
                continue;
            }
            if m >= self.substream_count {
                return invalid_argument_error("channel_mapping entry out of range");
            }
            seen[m as usize] = true;
        }
        if seen.iter().any(|&present| !present) {
            return invalid_argument_error("every substream must appear at least once in channel_mapping");
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbisonicsProjectionConfig {
    pub output_channel_count: u8,
    pub substream_count: u8,
    pub coupled_substream_count: u8,
    /// Length `(substream_count + coupled_substream_count) * output_channel_count`.
    pub demixing_matrix: Vec<i16>,
}

impl AmbisonicsProjectionConfig {
    fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let output_channel_count = reader.read_unsigned(8)? as u8;
        let substream_count = reader.read_unsigned(8)? as u8;
        let coupled_substream_count = reader.read_unsigned(8)? as u8;
        let len = (u32::from(substream_count) + u32::from(coupled_substream_count)) * u32::from(output_channel_count);
        let mut demixing_matrix = Vec::with_capacity(len as usize);
        for _ in 0..len {
            demixing_matrix.push(reader.read_signed16()?);
        }
        let config =
            AmbisonicsProjectionConfig { output_channel_count, substream_count, coupled_substream_count, demixing_matrix };
        config.validate()?;
        Ok(config)
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        self.validate()?;
        writer.write_unsigned(u64::from(self.output_channel_count), 8)?;
        writer.write_unsigned(u64::from(self.substream_count), 8)?;
        writer.write_unsigned(u64::from(self.coupled_substream_count), 8)?;
        for &coeff in &self.demixing_matrix {
            writer.write_signed16(coeff)?;
        }
        Ok(())
    }

    fn validate(&self) -> IamfResult<()> {
        if !is_allowed_ambisonics_count(u32::from(self.output_channel_count)) {
            return invalid_argument_error("output_channel_count must be a perfect square <= 225");
        }
        if u32::from(self.coupled_substream_count) + u32::from(self.substream_count) > u32::from(self.output_channel_count)
        {
            return invalid_argument_error("coupled_substream_count + substream_count must be <= output_channel_count");
        }
        let expected_len =
            (u32::from(self.substream_count) + u32::from(self.coupled_substream_count)) * u32::from(self.output_channel_count);
        if self.demixing_matrix.len() as u32 != expected_len {
            return invalid_argument_error("demixing_matrix has the wrong length");
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AmbisonicsMode {
    Mono,
    Projection,
    Reserved(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioElementConfig {
    ScalableChannelLayout(ScalableChannelLayoutConfig),
    AmbisonicsMono(AmbisonicsMonoConfig),
    AmbisonicsProjection(AmbisonicsProjectionConfig),
    Extension(Vec<u8>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AudioElementType {
    ChannelBased,
    SceneBased,
    Reserved(u8),
}

impl AudioElementType {
    fn from_u8(value: u8) -> AudioElementType {
        match value {
            0 => AudioElementType::ChannelBased,
            1 => AudioElementType::SceneBased,
            other => AudioElementType::Reserved(other),
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            AudioElementType::ChannelBased => 0,
            AudioElementType::SceneBased => 1,
            AudioElementType::Reserved(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioElementParam {
    pub param_type: ParamDefinitionType,
    pub definition: ParamDefinition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioElement {
    pub audio_element_id: AudioElementId,
    pub audio_element_type: AudioElementType,
    pub codec_config_id: CodecConfigId,
    pub substream_ids: Vec<SubstreamId>,
    pub params: Vec<AudioElementParam>,
    pub config: AudioElementConfig,
}

fn param_type_from_bits(value: u64) -> IamfResult<ParamDefinitionType> {
    match value {
        0 => Ok(ParamDefinitionType::MixGain),
        1 => Ok(ParamDefinitionType::Demixing),
        2 => Ok(ParamDefinitionType::ReconGain),
        3 => Ok(ParamDefinitionType::Extended),
        _ => invalid_argument_error("param_definition_type out of 2-bit range"),
    }
}

fn param_type_to_bits(param_type: ParamDefinitionType) -> u64 {
    match param_type {
        ParamDefinitionType::MixGain => 0,
        ParamDefinitionType::Demixing => 1,
        ParamDefinitionType::ReconGain => 2,
        ParamDefinitionType::Extended => 3,
    }
}

impl AudioElement {
    pub fn read(reader: &mut BitReader, codec_configs: &HashMap<CodecConfigId, ()>) -> IamfResult<Self> {
        let (raw_id, _) = reader.read_uleb128()?;
        let audio_element_id = AudioElementId(raw_id);

        let audio_element_type = AudioElementType::from_u8(reader.read_unsigned(5)? as u8);
        let _reserved = reader.read_unsigned(3)?;

        let (raw_codec_config_id, _) = reader.read_uleb128()?;
        let codec_config_id = CodecConfigId(raw_codec_config_id);
        if !codec_configs.contains_key(&codec_config_id) {
            return invalid_argument_error("audio element references an unknown codec_config_id");
        }

        let (num_substreams, _) = reader.read_uleb128()?;
        let mut substream_ids = Vec::with_capacity(num_substreams as usize);
        for _ in 0..num_substreams {
            let (id, _) = reader.read_uleb128()?;
            substream_ids.push(SubstreamId(id));
        }

        let (num_parameters, _) = reader.read_uleb128()?;
        let mut params = Vec::with_capacity(num_parameters as usize);
        let mut seen_types: Vec<ParamDefinitionType> = Vec::new();
        for _ in 0..num_parameters {
            let param_type = param_type_from_bits(reader.read_unsigned(2)?)?;
            if seen_types.contains(&param_type) {
                return invalid_argument_error("audio element carries duplicate parameter definition types");
            }
            seen_types.push(param_type);
            let definition = ParamDefinition::read(reader, param_type, audio_element_id)?;
            params.push(AudioElementParam { param_type, definition });
        }

        let config = match audio_element_type {
            AudioElementType::ChannelBased => {
                AudioElementConfig::ScalableChannelLayout(ScalableChannelLayoutConfig::read(reader)?)
            }
            AudioElementType::SceneBased => {
                let (ambisonics_mode, _) = reader.read_uleb128()?;
                match ambisonics_mode {
                    0 => AudioElementConfig::AmbisonicsMono(AmbisonicsMonoConfig::read(reader)?),
                    1 => AudioElementConfig::AmbisonicsProjection(AmbisonicsProjectionConfig::read(reader)?),
                    _ => return invalid_argument_error("reserved ambisonics_mode has no defined config layout"),
                }
            }
            AudioElementType::Reserved(_) => {
                let (size, _) = reader.read_uleb128()?;
                let mut bytes = vec![0u8; size as usize];
                reader.read_uint8_span(&mut bytes)?;
                AudioElementConfig::Extension(bytes)
            }
        };

        let total_substream_count: u32 = match &config {
            AudioElementConfig::ScalableChannelLayout(c) => c.layers.iter().map(|l| u32::from(l.substream_count)).sum(),
            _ => substream_ids.len() as u32,
        };
        if matches!(config, AudioElementConfig::ScalableChannelLayout(_))
            && total_substream_count as usize != substream_ids.len()
        {
            return invalid_argument_error("sum of layer substream counts must equal substream_ids length");
        }

        Ok(AudioElement { audio_element_id, audio_element_type, codec_config_id, substream_ids, params, config })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_uleb128(self.audio_element_id.0)?;
        writer.write_unsigned(u64::from(self.audio_element_type.to_u8()), 5)?;
        writer.write_unsigned(0, 3)?;
        writer.write_uleb128(self.codec_config_id.0)?;

        writer.write_uleb128(self.substream_ids.len() as u32)?;
        for id in &self.substream_ids {
            writer.write_uleb128(id.0)?;
        }

        writer.write_uleb128(self.params.len() as u32)?;
        for param in &self.params {
            writer.write_unsigned(param_type_to_bits(param.param_type), 2)?;
            param.definition.write(writer)?;
        }

        match &self.config {
            AudioElementConfig::ScalableChannelLayout(c) => c.write(writer),
            AudioElementConfig::AmbisonicsMono(c) => {
                writer.write_uleb128(0)?;
                c.write(writer)
            }
            AudioElementConfig::AmbisonicsProjection(c) => {
                writer.write_uleb128(1)?;
                c.write(writer)
            }
            AudioElementConfig::Extension(bytes) => {
                writer.write_uleb128(bytes.len() as u32)?;
                writer.write_uint8_span(bytes)
            }
        }
    }

    /// Builds a channel-based element without going through the wire format.
    pub fn new_channel_based(
        audio_element_id: AudioElementId,
        codec_config_id: CodecConfigId,
        substream_ids: Vec<SubstreamId>,
        params: Vec<AudioElementParam>,
        layers: Vec<ChannelAudioLayerConfig>,
    ) -> IamfResult<Self> {
        let config = ScalableChannelLayoutConfig { layers };
        config.validate()?;
        Ok(AudioElement {
            audio_element_id,
            audio_element_type: AudioElementType::ChannelBased,
            codec_config_id,
            substream_ids,
            params,
            config: AudioElementConfig::ScalableChannelLayout(config),
        })
    }

    /// Builds a scene-based, first-order-or-higher ambisonics (mono/SAMA) element.
    pub fn new_ambisonics_mono(
        audio_element_id: AudioElementId,
        codec_config_id: CodecConfigId,
        substream_ids: Vec<SubstreamId>,
        params: Vec<AudioElementParam>,
        output_channel_count: u8,
        substream_count: u8,
        channel_mapping: Vec<u8>,
    ) -> IamfResult<Self> {
        let config = AmbisonicsMonoConfig { output_channel_count, substream_count, channel_mapping };
        config.validate()?;
        Ok(AudioElement {
            audio_element_id,
            audio_element_type: AudioElementType::SceneBased,
            codec_config_id,
            substream_ids,
            params,
            config: AudioElementConfig::AmbisonicsMono(config),
        })
    }

    /// Builds a scene-based projection-mixed ambisonics element.
    pub fn new_ambisonics_projection(
        audio_element_id: AudioElementId,
        codec_config_id: CodecConfigId,
        substream_ids: Vec<SubstreamId>,
        params: Vec<AudioElementParam>,
        output_channel_count: u8,
        substream_count: u8,
        coupled_substream_count: u8,
        demixing_matrix: Vec<i16>,
    ) -> IamfResult<Self> {
        let config = AmbisonicsProjectionConfig {
            output_channel_count,
            substream_count,
            coupled_substream_count,
            demixing_matrix,
        };
        config.validate()?;
        Ok(AudioElement {
            audio_element_id,
            audio_element_type: AudioElementType::SceneBased,
            codec_config_id,
            substream_ids,
            params,
            config: AudioElementConfig::AmbisonicsProjection(config),
        })
    }

    /// Builds a reserved-extension element carrying an opaque config blob.
    pub fn new_extension(
        audio_element_id: AudioElementId,
        audio_element_type: u8,
        codec_config_id: CodecConfigId,
        substream_ids: Vec<SubstreamId>,
        params: Vec<AudioElementParam>,
        extension_bytes: Vec<u8>,
    ) -> Self {
        AudioElement {
            audio_element_id,
            audio_element_type: AudioElementType::Reserved(audio_element_type),
            codec_config_id,
            substream_ids,
            params,
            config: AudioElementConfig::Extension(extension_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LebGenerator;

    fn codec_configs_with(id: CodecConfigId) -> HashMap<CodecConfigId, ()> {
        let mut m = HashMap::new();
        m.insert(id, ());
        m
    }

    #[test]
    fn verify_scenario_s4_ambisonics_mono_round_trip() {
        let config = AmbisonicsMonoConfig { output_channel_count: 4, substream_count: 4, channel_mapping: vec![0, 1, 2, 3] };
        let mut w = BitWriter::new(LebGenerator::default());
        config.write(&mut w).unwrap();
        let bytes = w.finish();
        assert_eq!(bytes, vec![0x04, 0x04, 0x00, 0x01, 0x02, 0x03]);

        let mut r = BitReader::new(&bytes);
        assert_eq!(AmbisonicsMonoConfig::read(&mut r).unwrap(), config);
    }

    #[test]
    fn verify_ambisonics_mono_rejects_non_square_channel_count() {
        let config = AmbisonicsMonoConfig { output_channel_count: 5, substream_count: 4, channel_mapping: vec![0; 5] };
        assert!(config.validate().is_err());
    }

    #[test]
    fn verify_ambisonics_mono_allows_dropped_channel_sentinel() {
        let config =
            AmbisonicsMonoConfig { output_channel_count: 4, substream_count: 3, channel_mapping: vec![0, 1, 2, 255] };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn verify_binaural_must_be_only_layer() {
        let binaural = ChannelAudioLayerConfig {
            loudspeaker_layout: LoudspeakerLayout::Binaural,
            recon_gain_is_present: false,
            substream_count: 2,
            coupled_substream_count: 1,
            output_gain: None,
        };
        let stereo = ChannelAudioLayerConfig {
            loudspeaker_layout: LoudspeakerLayout::Stereo,
            recon_gain_is_present: false,
            substream_count: 1,
            coupled_substream_count: 1,
            output_gain: None,
        };
        let config = ScalableChannelLayoutConfig { layers: vec![binaural.clone(), stereo] };
        assert!(config.validate().is_err());
        let solo = ScalableChannelLayoutConfig { layers: vec![binaural] };
        assert!(solo.validate().is_ok());
    }

    #[test]
    fn verify_channel_based_audio_element_round_trip() {
        let codec_config_id = CodecConfigId(1);
        let layer = ChannelAudioLayerConfig {
            loudspeaker_layout: LoudspeakerLayout::Stereo,
            recon_gain_is_present: false,
            substream_count: 1,
            coupled_substream_count: 0,
            output_gain: Some(256),
        };
        let element = AudioElement {
            audio_element_id: AudioElementId(7),
            audio_element_type: AudioElementType::ChannelBased,
            codec_config_id,
            substream_ids: vec![SubstreamId(1)],
            params: vec![],
            config: AudioElementConfig::ScalableChannelLayout(ScalableChannelLayoutConfig { layers: vec![layer] }),
        };
        let mut w = BitWriter::new(LebGenerator::default());
        element.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        let decoded = AudioElement::read(&mut r, &codec_configs_with(codec_config_id)).unwrap();
        assert_eq!(decoded, element);
    }

    #[test]
    fn verify_unknown_codec_config_id_rejected() {
        let element = AudioElement {
            audio_element_id: AudioElementId(1),
            audio_element_type: AudioElementType::ChannelBased,
            codec_config_id: CodecConfigId(99),
            substream_ids: vec![SubstreamId(1)],
            params: vec![],
            config: AudioElementConfig::ScalableChannelLayout(ScalableChannelLayoutConfig {
                layers: vec![ChannelAudioLayerConfig {
                    loudspeaker_layout: LoudspeakerLayout::Mono,
                    recon_gain_is_present: false,
                    substream_count: 1,
                    coupled_substream_count: 0,
                    output_gain: None,
                }],
            }),
        };
        let mut w = BitWriter::new(LebGenerator::default());
        element.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        assert!(AudioElement::read(&mut r, &HashMap::new()).is_err());
    }

    #[test]
    fn verify_smallest_allowed_ambisonics_count() {
        assert_eq!(smallest_allowed_ambisonics_count(1), Some(1));
        assert_eq!(smallest_allowed_ambisonics_count(2), Some(4));
        assert_eq!(smallest_allowed_ambisonics_count(225), Some(225));
        assert_eq!(smallest_allowed_ambisonics_count(226), None);
    }
}
