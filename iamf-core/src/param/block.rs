// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ParameterBlock`: the timed animation/control envelope carried between descriptors, one
//! subblock layout per [`ParamDefinitionType`].

use std::collections::HashMap;

use crate::descriptors::audio_element::{AudioElement, AudioElementConfig};
use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, ParameterId};
use crate::io::{BitReader, BitWriter};
use crate::param::definition::{Mode0Durations, ParamDefinition, ParamDefinitionType};
use crate::param::demixing::DemixingInfoParameterData;
use crate::param::mix_gain::MixGainAnimation;
use crate::param::recon_gain::ReconGainSubblock;

/// The block-level `[duration, constant_subblock_duration, num_subblocks]` group, present iff
/// the referenced definition has `param_definition_mode == 1`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mode1Durations {
    pub duration: u32,
    pub constant_subblock_duration: u32,
    pub num_subblocks: u32,
}

/// One subblock's payload, shaped by the owning definition's [`ParamDefinitionType`].
#[derive(Clone, Debug, PartialEq)]
pub enum ParameterSubblockData {
    MixGain(MixGainAnimation),
    Demixing(DemixingInfoParameterData),
    ReconGain(ReconGainSubblock),
    Extension(Vec<u8>),
}

fn layer_recon_gain_flags(audio_element_id: AudioElementId, audio_elements: &HashMap<AudioElementId, AudioElement>) -> IamfResult<Vec<bool>> {
    let element = match audio_elements.get(&audio_element_id) {
        Some(element) => element,
        None => return invalid_argument_error("recon-gain definition references an unknown audio_element_id"),
    };
    match &element.config {
        AudioElementConfig::ScalableChannelLayout(config) => {
            Ok(config.layers.iter().map(|l| l.recon_gain_is_present).collect())
        }
        _ => invalid_argument_error("recon-gain is only defined for channel-based audio elements"),
    }
}

/// A single subblock, paired with its resolved duration (read explicitly or computed from the
/// governing constant/implicit rule, so downstream code never has to re-derive it).
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSubblock {
    pub duration: u32,
    pub data: ParameterSubblockData,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParameterBlock {
    pub parameter_id: ParameterId,
    /// `Some` iff the referenced definition has `param_definition_mode == true`.
    pub mode1: Option<Mode1Durations>,
    pub subblocks: Vec<ParameterSubblock>,
}

fn implicit_subblock_duration(duration: u32, constant_subblock_duration: u32, index: u32) -> IamfResult<u32> {
    let helper = Mode0Durations { duration, constant_subblock_duration, subblock_durations: Vec::new() };
    helper.subblock_duration(index)
}

impl ParameterBlock {
    /// Looks `parameter_id` up in `param_definitions`, parses the block-level duration group
    /// (if any), then each subblock per the definition's [`ParamDefinitionType`]. Demixing and
    /// recon-gain blocks with more than one subblock are rejected.
    pub fn read(
        reader: &mut BitReader,
        param_definitions: &HashMap<ParameterId, ParamDefinition>,
        audio_elements: &HashMap<AudioElementId, AudioElement>,
    ) -> IamfResult<Self> {
        let (raw_id, _) = reader.read_uleb128()?;
        let parameter_id = ParameterId(raw_id);

        let definition = match param_definitions.get(&parameter_id) {
            Some(def) => def,
            None => return invalid_argument_error("stray parameter block: parameter_id not in table"),
        };
        let common = match definition.common() {
            Some(common) => common,
            None => return invalid_argument_error("parameter block references a definition with no common header"),
        };

        let mode1 = if common.param_definition_mode {
            let (duration, _) = reader.read_uleb128()?;
            let (constant_subblock_duration, _) = reader.read_uleb128()?;
            let (num_subblocks, _) = reader.read_uleb128()?;
            Some(Mode1Durations { duration, constant_subblock_duration, num_subblocks })
        } else {
            None
        };

        let num_subblocks = match (&mode1, &common.mode0) {
            (Some(m1), _) => m1.num_subblocks,
            (None, Some(m0)) => m0.num_subblocks(),
            (None, None) => return invalid_argument_error("parameter definition has neither mode0 nor mode1 data"),
        };

        let param_type = definition.param_type();
        if matches!(param_type, ParamDefinitionType::Demixing | ParamDefinitionType::ReconGain) && num_subblocks != 1 {
            return invalid_argument_error("demixing/recon-gain parameter blocks must have exactly one subblock");
        }

        let mut subblocks = Vec::with_capacity(num_subblocks as usize);
        for index in 0..num_subblocks {
            let duration = match &mode1 {
                Some(m1) if m1.constant_subblock_duration == 0 => {
                    let (d, _) = reader.read_uleb128()?;
                    if d == 0 {
                        return invalid_argument_error("subblock_duration must be non-zero");
                    }
                    d
                }
                Some(m1) => implicit_subblock_duration(m1.duration, m1.constant_subblock_duration, index)?,
                None => {
                    let m0 = common.mode0.as_ref().expect("checked above");
                    m0.subblock_duration(index)?
                }
            };

            let data = match param_type {
                ParamDefinitionType::MixGain => ParameterSubblockData::MixGain(MixGainAnimation::read(reader)?),
                ParamDefinitionType::Demixing => {
                    ParameterSubblockData::Demixing(DemixingInfoParameterData::read(reader)?)
                }
                ParamDefinitionType::ReconGain => {
                    let audio_element_id = definition
                        .recon_gain_audio_element_id()
                        .expect("ReconGain param_type implies a ReconGain definition");
                    let layer_flags = layer_recon_gain_flags(audio_element_id, audio_elements)?;
                    ParameterSubblockData::ReconGain(ReconGainSubblock::read(reader, &layer_flags)?)
                }
                ParamDefinitionType::Extended => {
                    let (size, _) = reader.read_uleb128()?;
                    let mut payload = vec![0u8; size as usize];
                    reader.read_uint8_span(&mut payload)?;
                    ParameterSubblockData::Extension(payload)
                }
            };

            subblocks.push(ParameterSubblock { duration, data });
        }

        Ok(ParameterBlock { parameter_id, mode1, subblocks })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_uleb128(self.parameter_id.0)?;

        if let Some(mode1) = &self.mode1 {
            writer.write_uleb128(mode1.duration)?;
            writer.write_uleb128(mode1.constant_subblock_duration)?;
            writer.write_uleb128(mode1.num_subblocks)?;
        }

        for (index, subblock) in self.subblocks.iter().enumerate() {
            if let Some(mode1) = &self.mode1 {
                if mode1.constant_subblock_duration == 0 {
                    writer.write_uleb128(subblock.duration)?;
                } else {
                    let expected = implicit_subblock_duration(mode1.duration, mode1.constant_subblock_duration, index as u32)?;
                    if expected != subblock.duration {
                        return invalid_argument_error("subblock duration disagrees with constant_subblock_duration");
                    }
                }
            }

            match &subblock.data {
                ParameterSubblockData::MixGain(anim) => anim.write(writer)?,
                ParameterSubblockData::Demixing(data) => data.write(writer)?,
                ParameterSubblockData::ReconGain(element) => element.write(writer)?,
                ParameterSubblockData::Extension(payload) => {
                    writer.write_uleb128(payload.len() as u32)?;
                    writer.write_uint8_span(payload)?;
                }
            }
        }
        Ok(())
    }

    /// Builds a block for a `param_definition_mode == 0` definition: all durations are implicit
    /// from the definition, so this block carries no duration fields of its own.
    pub fn new_mode0(parameter_id: ParameterId, subblocks: Vec<ParameterSubblockData>, durations: Vec<u32>) -> Self {
        let subblocks = subblocks
            .into_iter()
            .zip(durations)
            .map(|(data, duration)| ParameterSubblock { duration, data })
            .collect();
        ParameterBlock { parameter_id, mode1: None, subblocks }
    }

    /// Builds a block for a `param_definition_mode == 1` definition.
    pub fn new_mode1(
        parameter_id: ParameterId,
        duration: u32,
        constant_subblock_duration: u32,
        subblocks: Vec<ParameterSubblockData>,
        durations: Vec<u32>,
    ) -> Self {
        let num_subblocks = subblocks.len() as u32;
        let subblocks = subblocks
            .into_iter()
            .zip(durations)
            .map(|(data, duration)| ParameterSubblock { duration, data })
            .collect();
        ParameterBlock {
            parameter_id,
            mode1: Some(Mode1Durations { duration, constant_subblock_duration, num_subblocks }),
            subblocks,
        }
    }
}
