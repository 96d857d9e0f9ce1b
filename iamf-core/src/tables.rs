// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ProgramTables`: the lookup tables built from descriptor OBUs. Immutable for the lifetime of
//! an IA sequence once `descriptors_ready` is set.

use std::collections::HashMap;

use crate::descriptors::{AudioElement, AudioElementConfig, CodecConfig, IaSequenceHeader, MixPresentation};
use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, CodecConfigId, MixPresentationId, ParameterId, SubstreamId};
use crate::param::ParamDefinition;

/// Every table a streaming processor or sequencer needs to resolve cross-OBU references.
#[derive(Clone, Debug, Default)]
pub struct ProgramTables {
    pub ia_header: Option<IaSequenceHeader>,
    pub codec_configs: HashMap<CodecConfigId, CodecConfig>,
    pub audio_elements: HashMap<AudioElementId, AudioElement>,
    pub mix_presentations: HashMap<MixPresentationId, MixPresentation>,
    pub param_defs: HashMap<ParameterId, ParamDefinition>,
    pub substream_to_audio_element: HashMap<SubstreamId, AudioElementId>,
}

impl ProgramTables {
    pub fn new() -> Self {
        ProgramTables::default()
    }

    /// Registers `element`'s substreams and the parameter definitions declared inline on it,
    /// enforcing I1 (unique parameter ids) and I2 (known codec_config_id).
    pub fn insert_audio_element(&mut self, element: AudioElement) -> IamfResult<()> {
        if !self.codec_configs.contains_key(&element.codec_config_id) {
            return invalid_argument_error("audio element references an unknown codec_config_id");
        }
        if matches!(element.config, AudioElementConfig::ScalableChannelLayout(_)) {
            let total: u32 = match &element.config {
                AudioElementConfig::ScalableChannelLayout(c) => {
                    c.layers.iter().map(|l| u32::from(l.substream_count)).sum()
                }
                _ => unreachable!(),
            };
            if total as usize != element.substream_ids.len() {
                return invalid_argument_error("sum of layer substream counts must equal substream_ids length");
            }
        }
        for param in &element.params {
            if let Some(id) = param.definition.parameter_id() {
                if self.param_defs.contains_key(&id) {
                    return invalid_argument_error("duplicate parameter_id across parameter definitions");
                }
                self.param_defs.insert(id, param.definition.clone());
            }
        }
        for &substream_id in &element.substream_ids {
            self.substream_to_audio_element.insert(substream_id, element.audio_element_id);
        }
        self.audio_elements.insert(element.audio_element_id, element);
        Ok(())
    }

    /// Registers a mix presentation, enforcing I3 (every referenced audio_element_id exists).
    pub fn insert_mix_presentation(&mut self, mix: MixPresentation) -> IamfResult<()> {
        for sub_mix in &mix.sub_mixes {
            for element in &sub_mix.audio_elements {
                if !self.audio_elements.contains_key(&element.audio_element_id) {
                    return invalid_argument_error("mix presentation references an unknown audio_element_id");
                }
            }
        }
        self.mix_presentations.insert(mix.mix_presentation_id, mix);
        Ok(())
    }

    pub fn insert_codec_config(&mut self, config: CodecConfig) -> IamfResult<()> {
        self.codec_configs.insert(config.codec_config_id, config);
        Ok(())
    }

    pub fn audio_element_for_substream(&self, substream_id: SubstreamId) -> IamfResult<&AudioElement> {
        let audio_element_id = match self.substream_to_audio_element.get(&substream_id) {
            Some(id) => *id,
            None => return invalid_argument_error("audio frame references an unknown substream_id"),
        };
        Ok(self.audio_elements.get(&audio_element_id).expect("substream map always points at a live entry"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::audio_element::{
        AudioElementType, ChannelAudioLayerConfig, LoudspeakerLayout, ScalableChannelLayoutConfig,
    };
    use crate::descriptors::codec_config::CodecId;

    fn codec_config(id: u32) -> CodecConfig {
        CodecConfig {
            codec_config_id: CodecConfigId(id),
            codec_id: CodecId::Opus,
            num_samples_per_frame: 960,
            audio_roll_distance: -4,
            decoder_config_bytes: vec![],
        }
    }

    fn channel_based_element(id: u32, codec_config_id: u32) -> AudioElement {
        AudioElement {
            audio_element_id: AudioElementId(id),
            audio_element_type: AudioElementType::ChannelBased,
            codec_config_id: CodecConfigId(codec_config_id),
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
        }
    }

    #[test]
    fn verify_audio_element_requires_known_codec_config() {
        let mut tables = ProgramTables::new();
        assert!(tables.insert_audio_element(channel_based_element(1, 99)).is_err());
    }

    #[test]
    fn verify_substream_map_populated_on_insert() {
        let mut tables = ProgramTables::new();
        tables.insert_codec_config(codec_config(1)).unwrap();
        tables.insert_audio_element(channel_based_element(1, 1)).unwrap();
        assert_eq!(tables.audio_element_for_substream(SubstreamId(1)).unwrap().audio_element_id, AudioElementId(1));
        assert!(tables.audio_element_for_substream(SubstreamId(2)).is_err());
    }
}
