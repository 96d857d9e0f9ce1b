// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `GlobalTimingModule`: assigns `[start, end)` sample timestamps to parameter blocks and audio
//! frames as they stream past, one running cursor per `parameter_id`/`substream_id`.

use std::collections::HashMap;

use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{ParameterId, SubstreamId};
use crate::units::Timestamp;

#[derive(Clone, Debug, Default)]
pub struct GlobalTimingModule {
    next_parameter_timestamp: HashMap<ParameterId, Timestamp>,
    next_substream_timestamp: HashMap<SubstreamId, Timestamp>,
}

impl GlobalTimingModule {
    pub fn new() -> Self {
        GlobalTimingModule::default()
    }

    /// Assigns `[running, running + duration)` to a parameter block, checking that
    /// `declared_start` (the value the block itself claims, when one is carried) agrees with the
    /// cursor this module is tracking, then advances the cursor.
    pub fn get_next_parameter_block_timestamps(
        &mut self,
        parameter_id: ParameterId,
        declared_start: Timestamp,
        duration: u32,
    ) -> IamfResult<(Timestamp, Timestamp)> {
        let running = *self.next_parameter_timestamp.entry(parameter_id).or_insert(0);
        if declared_start != running {
            return invalid_argument_error("parameter block start timestamp disagrees with the running cursor");
        }
        let end = running + i64::from(duration);
        self.next_parameter_timestamp.insert(parameter_id, end);
        Ok((running, end))
    }

    /// Assigns `[running, running + num_samples_per_frame)` to an audio frame on `substream_id`.
    pub fn get_next_audio_frame_timestamps(
        &mut self,
        substream_id: SubstreamId,
        num_samples_per_frame: u32,
    ) -> (Timestamp, Timestamp) {
        let running = *self.next_substream_timestamp.entry(substream_id).or_insert(0);
        let end = running + i64::from(num_samples_per_frame);
        self.next_substream_timestamp.insert(substream_id, end);
        (running, end)
    }

    pub fn peek_next_parameter_timestamp(&self, parameter_id: ParameterId) -> Timestamp {
        *self.next_parameter_timestamp.get(&parameter_id).unwrap_or(&0)
    }

    pub fn peek_next_substream_timestamp(&self, substream_id: SubstreamId) -> Timestamp {
        *self.next_substream_timestamp.get(&substream_id).unwrap_or(&0)
    }
}
