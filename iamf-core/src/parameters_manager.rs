// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ParametersManager`: tracks, per `parameter_id`, the most recently supplied parameter block
//! whose `[start, end)` window covers the current frame, and the running `w_idx` for demixing
//! parameters.

use std::collections::{HashMap, HashSet};

use crate::descriptors::AudioElement;
use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, ParameterId};
use crate::param::{DownMixingParams, ParamDefinition, ParameterSubblockData, ReconGainSubblock, WIdxUpdateRule};
use crate::units::Timestamp;

#[derive(Clone, Debug)]
struct ActiveBlock {
    start: Timestamp,
    end: Timestamp,
    data: ParameterSubblockData,
}

#[derive(Clone, Debug, Default)]
pub struct ParametersManager {
    active: HashMap<ParameterId, ActiveBlock>,
    w_idx: HashMap<ParameterId, u8>,
    seen_audio_elements: HashSet<AudioElementId>,
}

impl ParametersManager {
    pub fn new() -> Self {
        ParametersManager::default()
    }

    /// Records the subblock data most recently parsed for `parameter_id`, covering `[start,
    /// end)`. Overwrites whatever was active before: only the latest parameter block counts.
    pub fn update_state(&mut self, parameter_id: ParameterId, start: Timestamp, end: Timestamp, data: ParameterSubblockData) {
        self.active.insert(parameter_id, ActiveBlock { start, end, data });
    }

    fn active_at(&self, parameter_id: ParameterId, timestamp: Timestamp) -> Option<&ParameterSubblockData> {
        self.active.get(&parameter_id).filter(|b| timestamp >= b.start && timestamp < b.end).map(|b| &b.data)
    }

    /// Resolves the down-mixing coefficients in effect at `timestamp`: the active demixing
    /// subblock's mode if one covers it, else the definition's default.
    pub fn down_mixing_params(
        &self,
        parameter_id: ParameterId,
        param_defs: &HashMap<ParameterId, ParamDefinition>,
        timestamp: Timestamp,
    ) -> IamfResult<DownMixingParams> {
        if let Some(ParameterSubblockData::Demixing(data)) = self.active_at(parameter_id, timestamp) {
            return DownMixingParams::for_mode(data.dmixp_mode);
        }
        match param_defs.get(&parameter_id) {
            Some(ParamDefinition::Demixing { default_demixing_info, .. }) => {
                DownMixingParams::for_mode(default_demixing_info.dmixp_mode)
            }
            _ => invalid_argument_error("no demixing parameter definition found for this parameter_id"),
        }
    }

    /// The active recon-gain subblock covering `timestamp`, or `None` (treated as all-zero gain)
    /// when nothing is active.
    pub fn recon_gain_info(&self, parameter_id: ParameterId, timestamp: Timestamp) -> Option<&ReconGainSubblock> {
        match self.active_at(parameter_id, timestamp) {
            Some(ParameterSubblockData::ReconGain(subblock)) => Some(subblock),
            _ => None,
        }
    }

    /// Applies `rule` to the running `w_idx` for `parameter_id`, returning the updated value.
    /// `default_w` seeds the cursor the first time this parameter id is seen.
    pub fn update_w_idx(&mut self, parameter_id: ParameterId, rule: WIdxUpdateRule, default_w: u8) -> u8 {
        let updated = match rule {
            WIdxUpdateRule::FirstFrame => default_w,
            WIdxUpdateRule::Default => *self.w_idx.get(&parameter_id).unwrap_or(&default_w),
            WIdxUpdateRule::Normal { w_idx_offset } => {
                let current = i16::from(*self.w_idx.get(&parameter_id).unwrap_or(&default_w));
                (current + i16::from(w_idx_offset)).clamp(0, 10) as u8
            }
        };
        self.w_idx.insert(parameter_id, updated);
        updated
    }

    pub fn current_w_idx(&self, parameter_id: ParameterId, default_w: u8) -> u8 {
        *self.w_idx.get(&parameter_id).unwrap_or(&default_w)
    }

    /// Advances the `w_idx` cursor for every demixing parameter declared on `audio_element`,
    /// applying `FirstFrame` the first time this audio element is seen and `Normal { offset: 0 }`
    /// on every frame after.
    pub fn rotate_for_audio_element(&mut self, audio_element: &AudioElement) {
        let rule = if self.seen_audio_elements.insert(audio_element.audio_element_id) {
            WIdxUpdateRule::FirstFrame
        } else {
            WIdxUpdateRule::Normal { w_idx_offset: 0 }
        };
        for param in &audio_element.params {
            if let ParamDefinition::Demixing { common, default_demixing_info } = &param.definition {
                self.update_w_idx(common.parameter_id, rule, default_demixing_info.default_w);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{DemixingInfoParameterData, DMixPMode, Mode0Durations, ParamDefinitionCommon};

    fn demixing_defs(default_mode: DMixPMode) -> HashMap<ParameterId, ParamDefinition> {
        use crate::param::DefaultDemixingInfoParameterData;
        let common = ParamDefinitionCommon {
            parameter_id: ParameterId(1),
            parameter_rate: 48000,
            param_definition_mode: false,
            mode0: Some(Mode0Durations { duration: 8, constant_subblock_duration: 8, subblock_durations: vec![] }),
        };
        let default = DefaultDemixingInfoParameterData { dmixp_mode: default_mode, default_w: 0 };
        let def = ParamDefinition::new_demixing(common, default).unwrap();
        let mut map = HashMap::new();
        map.insert(ParameterId(1), def);
        map
    }

    #[test]
    fn verify_falls_back_to_definition_default_when_nothing_active() {
        let manager = ParametersManager::new();
        let defs = demixing_defs(DMixPMode::Mode3);
        let params = manager.down_mixing_params(ParameterId(1), &defs, 0).unwrap();
        assert_eq!(params, DownMixingParams::for_mode(DMixPMode::Mode3).unwrap());
    }

    #[test]
    fn verify_uses_active_block_within_window() {
        let mut manager = ParametersManager::new();
        manager.update_state(
            ParameterId(1),
            0,
            8,
            ParameterSubblockData::Demixing(DemixingInfoParameterData { dmixp_mode: DMixPMode::Mode2 }),
        );
        let defs = demixing_defs(DMixPMode::Mode3);
        let params = manager.down_mixing_params(ParameterId(1), &defs, 4).unwrap();
        assert_eq!(params, DownMixingParams::for_mode(DMixPMode::Mode2).unwrap());
        // Outside the window, falls back to the default again.
        let params = manager.down_mixing_params(ParameterId(1), &defs, 8).unwrap();
        assert_eq!(params, DownMixingParams::for_mode(DMixPMode::Mode3).unwrap());
    }

    #[test]
    fn verify_w_idx_rules() {
        let mut manager = ParametersManager::new();
        assert_eq!(manager.update_w_idx(ParameterId(1), WIdxUpdateRule::FirstFrame, 3), 3);
        assert_eq!(manager.update_w_idx(ParameterId(1), WIdxUpdateRule::Normal { w_idx_offset: 5 }, 3), 8);
        assert_eq!(manager.update_w_idx(ParameterId(1), WIdxUpdateRule::Normal { w_idx_offset: 5 }, 3), 10);
        assert_eq!(manager.update_w_idx(ParameterId(1), WIdxUpdateRule::Normal { w_idx_offset: -20 }, 3), 0);
        assert_eq!(manager.update_w_idx(ParameterId(1), WIdxUpdateRule::Default, 3), 0);
    }
}
