// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parameter definitions: the four schemas (mix-gain, demixing, recon-gain, extended) that
//! control how the variable part of a [`crate::param::block::ParameterBlock`] is interpreted.

use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, ParameterId};
use crate::io::{BitReader, BitWriter};
use crate::param::demixing::DefaultDemixingInfoParameterData;

/// Discriminant carried alongside each entry of `audio_element_params`/mix presentation output
/// mix gain, chosen before the definition body is parsed since `Extended` skips the common
/// header entirely.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParamDefinitionType {
    MixGain,
    Demixing,
    ReconGain,
    Extended,
}

/// The `[duration, constant_subblock_duration, num_subblocks, subblock_durations[]]` group,
/// present only when `param_definition_mode == 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mode0Durations {
    pub duration: u32,
    pub constant_subblock_duration: u32,
    /// Empty when `constant_subblock_duration != 0` (the count is implicit).
    pub subblock_durations: Vec<u32>,
}

impl Mode0Durations {
    /// `ceil(duration / constant_subblock_duration)` when constant, else the explicit count.
    pub fn num_subblocks(&self) -> u32 {
        if self.constant_subblock_duration > 0 {
            (self.duration + self.constant_subblock_duration - 1) / self.constant_subblock_duration
        } else {
            self.subblock_durations.len() as u32
        }
    }

    /// Duration of subblock `index`, whether implicit (constant) or explicit.
    pub fn subblock_duration(&self, index: u32) -> IamfResult<u32> {
        if self.constant_subblock_duration > 0 {
            let num = self.num_subblocks();
            if index >= num {
                return invalid_argument_error("subblock index out of range");
            }
            if index + 1 == num {
                let consumed = u64::from(self.constant_subblock_duration) * u64::from(index);
                return Ok((u64::from(self.duration) - consumed) as u32);
            }
            Ok(self.constant_subblock_duration)
        } else {
            match self.subblock_durations.get(index as usize) {
                Some(d) => Ok(*d),
                None => invalid_argument_error("subblock index out of range"),
            }
        }
    }
}

/// The fields common to every non-extended parameter definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDefinitionCommon {
    pub parameter_id: ParameterId,
    pub parameter_rate: u32,
    pub param_definition_mode: bool,
    /// `Some` iff `param_definition_mode == false`.
    pub mode0: Option<Mode0Durations>,
}

fn read_common(reader: &mut BitReader) -> IamfResult<ParamDefinitionCommon> {
    let (parameter_id, _) = reader.read_uleb128()?;
    let (parameter_rate, _) = reader.read_uleb128()?;
    if parameter_rate == 0 {
        return invalid_argument_error("parameter_rate must be non-zero");
    }
    let param_definition_mode = reader.read_bool()?;
    let _reserved = reader.read_unsigned(7)?;

    let mode0 = if !param_definition_mode {
        let (duration, _) = reader.read_uleb128()?;
        if duration == 0 {
            return invalid_argument_error("duration must be non-zero");
        }
        let (constant_subblock_duration, _) = reader.read_uleb128()?;
        let subblock_durations = if constant_subblock_duration == 0 {
            let (num_subblocks, _) = reader.read_uleb128()?;
            let mut durations = Vec::with_capacity(num_subblocks as usize);
            let mut sum: u64 = 0;
            for _ in 0..num_subblocks {
                let (d, _) = reader.read_uleb128()?;
                if d == 0 {
                    return invalid_argument_error("subblock_duration must be non-zero");
                }
                sum += u64::from(d);
                durations.push(d);
            }
            if sum != u64::from(duration) {
                return invalid_argument_error("subblock_durations must sum to duration");
            }
            durations
        } else {
            Vec::new()
        };
        Some(Mode0Durations { duration, constant_subblock_duration, subblock_durations })
    } else {
        None
    };

    Ok(ParamDefinitionCommon {
        parameter_id: ParameterId(parameter_id),
        parameter_rate,
        param_definition_mode,
        mode0,
    })
}

fn write_common(writer: &mut BitWriter, common: &ParamDefinitionCommon) -> IamfResult<()> {
    writer.write_uleb128(common.parameter_id.0)?;
    writer.write_uleb128(common.parameter_rate)?;
    writer.write_bool(common.param_definition_mode)?;
    writer.write_unsigned(0, 7)?;

    if let Some(mode0) = &common.mode0 {
        writer.write_uleb128(mode0.duration)?;
        writer.write_uleb128(mode0.constant_subblock_duration)?;
        if mode0.constant_subblock_duration == 0 {
            writer.write_uleb128(mode0.subblock_durations.len() as u32)?;
            for d in &mode0.subblock_durations {
                writer.write_uleb128(*d)?;
            }
        }
    }
    Ok(())
}

/// Enforces the rule recovered from the reference encoder's `ValidateSpecificParamDefinition`:
/// demixing and recon-gain definitions require `param_definition_mode == 0` with
/// `constant_subblock_duration == duration` (exactly one implicit subblock spanning the whole
/// duration).
fn require_single_constant_subblock(common: &ParamDefinitionCommon) -> IamfResult<()> {
    let mode0 = match &common.mode0 {
        Some(mode0) => mode0,
        None => {
            return invalid_argument_error("demixing/recon-gain definitions require param_definition_mode == 0")
        }
    };
    if mode0.constant_subblock_duration != mode0.duration {
        return invalid_argument_error(
            "demixing/recon-gain definitions require constant_subblock_duration == duration",
        );
    }
    Ok(())
}

/// One of the four parameter definition schemas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamDefinition {
    MixGain { common: ParamDefinitionCommon, default_mix_gain: i16 },
    Demixing { common: ParamDefinitionCommon, default_demixing_info: DefaultDemixingInfoParameterData },
    ReconGain { common: ParamDefinitionCommon, audio_element_id: AudioElementId },
    /// Carries no parameter id and is never looked up by one; purely an opaque descriptive blob.
    Extended { payload: Vec<u8> },
}

impl ParamDefinition {
    pub fn parameter_id(&self) -> Option<ParameterId> {
        match self {
            ParamDefinition::MixGain { common, .. }
            | ParamDefinition::Demixing { common, .. }
            | ParamDefinition::ReconGain { common, .. } => Some(common.parameter_id),
            ParamDefinition::Extended { .. } => None,
        }
    }

    pub fn common(&self) -> Option<&ParamDefinitionCommon> {
        match self {
            ParamDefinition::MixGain { common, .. }
            | ParamDefinition::Demixing { common, .. }
            | ParamDefinition::ReconGain { common, .. } => Some(common),
            ParamDefinition::Extended { .. } => None,
        }
    }

    /// The audio element a recon-gain definition's layer flags are drawn from, if this is one.
    pub fn recon_gain_audio_element_id(&self) -> Option<AudioElementId> {
        match self {
            ParamDefinition::ReconGain { audio_element_id, .. } => Some(*audio_element_id),
            _ => None,
        }
    }

    pub fn param_type(&self) -> ParamDefinitionType {
        match self {
            ParamDefinition::MixGain { .. } => ParamDefinitionType::MixGain,
            ParamDefinition::Demixing { .. } => ParamDefinitionType::Demixing,
            ParamDefinition::ReconGain { .. } => ParamDefinitionType::ReconGain,
            ParamDefinition::Extended { .. } => ParamDefinitionType::Extended,
        }
    }

    pub fn new_mix_gain(common: ParamDefinitionCommon, default_mix_gain: i16) -> Self {
        ParamDefinition::MixGain { common, default_mix_gain }
    }

    pub fn new_demixing(
        common: ParamDefinitionCommon,
        default_demixing_info: DefaultDemixingInfoParameterData,
    ) -> IamfResult<Self> {
        require_single_constant_subblock(&common)?;
        Ok(ParamDefinition::Demixing { common, default_demixing_info })
    }

    pub fn new_recon_gain(common: ParamDefinitionCommon, audio_element_id: AudioElementId) -> IamfResult<Self> {
        require_single_constant_subblock(&common)?;
        Ok(ParamDefinition::ReconGain { common, audio_element_id })
    }

    pub fn read(
        reader: &mut BitReader,
        param_type: ParamDefinitionType,
        audio_element_id: AudioElementId,
    ) -> IamfResult<Self> {
        match param_type {
            ParamDefinitionType::Extended => {
                let (size, _) = reader.read_uleb128()?;
                let mut payload = vec![0u8; size as usize];
                reader.read_uint8_span(&mut payload)?;
                Ok(ParamDefinition::Extended { payload })
            }
            ParamDefinitionType::MixGain => {
                let common = read_common(reader)?;
                let default_mix_gain = reader.read_signed16()?;
                Ok(ParamDefinition::MixGain { common, default_mix_gain })
            }
            ParamDefinitionType::Demixing => {
                let common = read_common(reader)?;
                let default_demixing_info = DefaultDemixingInfoParameterData::read(reader)?;
                ParamDefinition::new_demixing(common, default_demixing_info)
            }
            ParamDefinitionType::ReconGain => {
                let common = read_common(reader)?;
                ParamDefinition::new_recon_gain(common, audio_element_id)
            }
        }
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        match self {
            ParamDefinition::Extended { payload } => {
                writer.write_uleb128(payload.len() as u32)?;
                writer.write_uint8_span(payload)
            }
            ParamDefinition::MixGain { common, default_mix_gain } => {
                write_common(writer, common)?;
                writer.write_signed16(*default_mix_gain)
            }
            ParamDefinition::Demixing { common, default_demixing_info } => {
                write_common(writer, common)?;
                default_demixing_info.write(writer)
            }
            ParamDefinition::ReconGain { common, .. } => write_common(writer, common),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LebGenerator;

    fn mode0(duration: u32, constant: u32) -> ParamDefinitionCommon {
        ParamDefinitionCommon {
            parameter_id: ParameterId(1),
            parameter_rate: 48000,
            param_definition_mode: false,
            mode0: Some(Mode0Durations { duration, constant_subblock_duration: constant, subblock_durations: vec![] }),
        }
    }

    #[test]
    fn verify_mix_gain_round_trip() {
        let def = ParamDefinition::new_mix_gain(mode0(8, 8), 256);
        let mut w = BitWriter::new(LebGenerator::default());
        def.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        let decoded = ParamDefinition::read(&mut r, ParamDefinitionType::MixGain, AudioElementId(0)).unwrap();
        assert_eq!(decoded, def);
    }

    #[test]
    fn verify_demixing_requires_constant_equal_duration() {
        let bad = mode0(8, 4);
        let default = DefaultDemixingInfoParameterData {
            dmixp_mode: crate::param::demixing::DMixPMode::Mode1,
            default_w: 0,
        };
        assert!(ParamDefinition::new_demixing(bad, default).is_err());
    }

    #[test]
    fn verify_recon_gain_requires_mode0() {
        let mut common = mode0(8, 8);
        common.param_definition_mode = true;
        common.mode0 = None;
        assert!(ParamDefinition::new_recon_gain(common, AudioElementId(1)).is_err());
    }

    #[test]
    fn verify_extended_has_no_common_header() {
        let def = ParamDefinition::Extended { payload: vec![1, 2, 3] };
        let mut w = BitWriter::new(LebGenerator::default());
        def.write(&mut w).unwrap();
        let bytes = w.finish();
        // size=3 (uleb128 one byte) + 3 payload bytes, nothing else.
        assert_eq!(bytes.len(), 4);
    }

    #[test]
    fn verify_subblock_durations_explicit() {
        let common = ParamDefinitionCommon {
            parameter_id: ParameterId(1),
            parameter_rate: 1,
            param_definition_mode: false,
            mode0: Some(Mode0Durations { duration: 10, constant_subblock_duration: 0, subblock_durations: vec![4, 6] }),
        };
        let mode0 = common.mode0.unwrap();
        assert_eq!(mode0.num_subblocks(), 2);
        assert_eq!(mode0.subblock_duration(0).unwrap(), 4);
        assert_eq!(mode0.subblock_duration(1).unwrap(), 6);
    }
}
