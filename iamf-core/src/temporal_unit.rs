// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Frame assembly: pairs a parsed [`AudioFrame`] with the timing window and side data (demixing
//! parameters, recon-gain) active for it, and groups parameter blocks the same way.

use crate::audio_frame::AudioFrame;
use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, ParameterId};
use crate::param::{DownMixingParams, ParamDefinition, ParameterBlock, ReconGainSubblock};
use crate::parameters_manager::ParametersManager;
use crate::tables::ProgramTables;
use crate::timing::GlobalTimingModule;
use crate::units::Timestamp;

/// An audio frame OBU resolved against the program's descriptor tables: its timing window, the
/// audio element it belongs to, and whatever demixing/recon-gain side data is active for it.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioFrameWithData {
    pub obu: AudioFrame,
    pub start: Timestamp,
    pub end: Timestamp,
    pub audio_element_id: AudioElementId,
    /// `None` when the owning audio element declares no demixing parameter.
    pub down_mixing_params: Option<DownMixingParams>,
    /// `None` when the owning audio element declares no recon-gain parameter, or no subblock is
    /// currently active for it (treated as all-zero gain).
    pub recon_gain_info: Option<ReconGainSubblock>,
}

impl AudioFrameWithData {
    /// Locates the audio element by `obu.substream_id`, assigns `[start, end)` from the timing
    /// module, collects side data from `params`, then rotates `params`' `w_idx` cursor for the
    /// next frame on this audio element.
    pub fn assemble(
        obu: AudioFrame,
        tables: &ProgramTables,
        timing: &mut GlobalTimingModule,
        params: &mut ParametersManager,
    ) -> IamfResult<Self> {
        let audio_element = tables.audio_element_for_substream(obu.substream_id)?;
        let codec_config = match tables.codec_configs.get(&audio_element.codec_config_id) {
            Some(config) => config,
            None => return invalid_argument_error("audio element references an unknown codec_config_id"),
        };

        let (start, end) = timing.get_next_audio_frame_timestamps(obu.substream_id, codec_config.num_samples_per_frame);

        let mut down_mixing_params = None;
        let mut recon_gain_info = None;
        for param in &audio_element.params {
            match &param.definition {
                ParamDefinition::Demixing { common, .. } => {
                    down_mixing_params = Some(params.down_mixing_params(common.parameter_id, &tables.param_defs, start)?);
                }
                ParamDefinition::ReconGain { common, .. } => {
                    recon_gain_info = params.recon_gain_info(common.parameter_id, start).cloned();
                }
                _ => {}
            }
        }

        params.rotate_for_audio_element(audio_element);

        Ok(AudioFrameWithData {
            obu,
            start,
            end,
            audio_element_id: audio_element.audio_element_id,
            down_mixing_params,
            recon_gain_info,
        })
    }
}

/// A parameter block OBU resolved against the timing module: its `[start, end)` window.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterBlockWithData {
    pub obu: ParameterBlock,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl ParameterBlockWithData {
    /// Assigns `[start, end)` from the timing module, validating `declared_start` when the
    /// definition carries one, then registers the block as the active one for its parameter id.
    pub fn assemble(
        obu: ParameterBlock,
        declared_start: Timestamp,
        tables: &ProgramTables,
        timing: &mut GlobalTimingModule,
        params: &mut ParametersManager,
    ) -> IamfResult<Self> {
        let duration = block_duration(&obu, &tables.param_defs)?;
        let (start, end) = timing.get_next_parameter_block_timestamps(obu.parameter_id, declared_start, duration)?;

        for subblock in &obu.subblocks {
            params.update_state(obu.parameter_id, start, end, subblock.data.clone());
        }

        Ok(ParameterBlockWithData { obu, start, end })
    }
}

fn block_duration(block: &ParameterBlock, param_defs: &std::collections::HashMap<ParameterId, ParamDefinition>) -> IamfResult<u32> {
    if let Some(mode1) = &block.mode1 {
        return Ok(mode1.duration);
    }
    match param_defs.get(&block.parameter_id).and_then(ParamDefinition::common).and_then(|c| c.mode0.as_ref()) {
        Some(mode0) => Ok(mode0.duration),
        None => invalid_argument_error("parameter block's definition carries neither mode0 nor mode1 duration"),
    }
}

/// Every OBU carried by one temporal unit: zero or more parameter blocks followed by zero or
/// more audio frames, all sharing the same `start` timestamp.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemporalUnit {
    pub parameter_blocks: Vec<ParameterBlockWithData>,
    pub audio_frames: Vec<AudioFrameWithData>,
}

impl TemporalUnit {
    pub fn new() -> Self {
        TemporalUnit::default()
    }

    /// The timestamp this unit starts at, taken from whichever OBU was assembled first. `None`
    /// when the unit is still empty.
    pub fn start(&self) -> Option<Timestamp> {
        self.parameter_blocks
            .first()
            .map(|b| b.start)
            .or_else(|| self.audio_frames.first().map(|f| f.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::audio_element::{
        AudioElementConfig, AudioElementParam, AudioElementType, ChannelAudioLayerConfig, LoudspeakerLayout,
        ScalableChannelLayoutConfig,
    };
    use crate::descriptors::codec_config::{CodecConfig, CodecId};
    use crate::descriptors::AudioElement;
    use crate::ids::{CodecConfigId, SubstreamId};
    use crate::param::definition::{Mode0Durations, ParamDefinitionCommon, ParamDefinitionType};
    use crate::param::demixing::{DMixPMode, DefaultDemixingInfoParameterData, DemixingInfoParameterData};
    use crate::param::ParameterSubblockData;

    fn build_tables() -> (ProgramTables, AudioElementId) {
        let mut tables = ProgramTables::new();
        tables
            .insert_codec_config(CodecConfig {
                codec_config_id: CodecConfigId(1),
                codec_id: CodecId::Opus,
                num_samples_per_frame: 960,
                audio_roll_distance: -4,
                decoder_config_bytes: vec![],
            })
            .unwrap();

        let common = ParamDefinitionCommon {
            parameter_id: ParameterId(1),
            parameter_rate: 48000,
            param_definition_mode: false,
            mode0: Some(Mode0Durations { duration: 960, constant_subblock_duration: 960, subblock_durations: vec![] }),
        };
        let default = DefaultDemixingInfoParameterData { dmixp_mode: DMixPMode::Mode1, default_w: 0 };
        let definition = ParamDefinition::new_demixing(common, default).unwrap();

        let audio_element_id = AudioElementId(1);
        let element = AudioElement {
            audio_element_id,
            audio_element_type: AudioElementType::ChannelBased,
            codec_config_id: CodecConfigId(1),
            substream_ids: vec![SubstreamId(1)],
            params: vec![AudioElementParam { param_type: ParamDefinitionType::Demixing, definition }],
            config: AudioElementConfig::ScalableChannelLayout(ScalableChannelLayoutConfig {
                layers: vec![ChannelAudioLayerConfig {
                    loudspeaker_layout: LoudspeakerLayout::Stereo,
                    recon_gain_is_present: false,
                    substream_count: 1,
                    coupled_substream_count: 1,
                    output_gain: None,
                }],
            }),
        };
        tables.insert_audio_element(element).unwrap();
        (tables, audio_element_id)
    }

    #[test]
    fn verify_assembles_frame_with_active_demixing_params() {
        let (tables, audio_element_id) = build_tables();
        let mut timing = GlobalTimingModule::new();
        let mut params = ParametersManager::new();
        params.update_state(
            ParameterId(1),
            0,
            960,
            ParameterSubblockData::Demixing(DemixingInfoParameterData { dmixp_mode: DMixPMode::Mode2 }),
        );

        let frame = AudioFrame { substream_id: SubstreamId(1), payload_bytes: vec![0, 1, 2] };
        let assembled = AudioFrameWithData::assemble(frame, &tables, &mut timing, &mut params).unwrap();

        assert_eq!(assembled.start, 0);
        assert_eq!(assembled.end, 960);
        assert_eq!(assembled.audio_element_id, audio_element_id);
        assert_eq!(assembled.down_mixing_params, Some(DownMixingParams::for_mode(DMixPMode::Mode2).unwrap()));
        assert_eq!(assembled.recon_gain_info, None);
    }

    #[test]
    fn verify_frame_for_unknown_substream_errors() {
        let (tables, _) = build_tables();
        let mut timing = GlobalTimingModule::new();
        let mut params = ParametersManager::new();
        let frame = AudioFrame { substream_id: SubstreamId(99), payload_bytes: vec![] };
        assert!(AudioFrameWithData::assemble(frame, &tables, &mut timing, &mut params).is_err());
    }

    #[test]
    fn verify_parameter_block_registers_active_state() {
        let (tables, _) = build_tables();
        let mut timing = GlobalTimingModule::new();
        let mut params = ParametersManager::new();

        let block = ParameterBlock::new_mode0(
            ParameterId(1),
            vec![ParameterSubblockData::Demixing(DemixingInfoParameterData { dmixp_mode: DMixPMode::Mode3 })],
            vec![960],
        );
        let assembled = ParameterBlockWithData::assemble(block, 0, &tables, &mut timing, &mut params).unwrap();
        assert_eq!((assembled.start, assembled.end), (0, 960));

        let resolved = params.down_mixing_params(ParameterId(1), &tables.param_defs, 0).unwrap();
        assert_eq!(resolved, DownMixingParams::for_mode(DMixPMode::Mode3).unwrap());
    }
}
