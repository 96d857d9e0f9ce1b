// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demixing mode and the downmix coefficients it resolves to.

use crate::errors::{invalid_argument_error, IamfResult};
use crate::io::{BitReader, BitWriter};

/// The 3-bit `dmixp_mode` field. `Reserved1`/`Reserved2` are valid on the wire but resolve to no
/// downmix coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DMixPMode {
    Mode1,
    Mode2,
    Mode3,
    Reserved1,
    Mode1N,
    Mode2N,
    Mode3N,
    Reserved2,
}

impl DMixPMode {
    pub fn from_u8(value: u8) -> IamfResult<DMixPMode> {
        match value {
            0 => Ok(DMixPMode::Mode1),
            1 => Ok(DMixPMode::Mode2),
            2 => Ok(DMixPMode::Mode3),
            3 => Ok(DMixPMode::Reserved1),
            4 => Ok(DMixPMode::Mode1N),
            5 => Ok(DMixPMode::Mode2N),
            6 => Ok(DMixPMode::Mode3N),
            7 => Ok(DMixPMode::Reserved2),
            _ => invalid_argument_error("dmixp_mode out of 3-bit range"),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            DMixPMode::Mode1 => 0,
            DMixPMode::Mode2 => 1,
            DMixPMode::Mode3 => 2,
            DMixPMode::Reserved1 => 3,
            DMixPMode::Mode1N => 4,
            DMixPMode::Mode2N => 5,
            DMixPMode::Mode3N => 6,
            DMixPMode::Reserved2 => 7,
        }
    }
}

/// The four downmix coefficients a `dmixp_mode` resolves to, per the reference encoder's
/// demixing coefficient table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DownMixingParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub delta: f64,
}

impl DownMixingParams {
    pub fn for_mode(mode: DMixPMode) -> IamfResult<DownMixingParams> {
        match mode {
            DMixPMode::Mode1 | DMixPMode::Mode1N => {
                Ok(DownMixingParams { alpha: 1.0, beta: 1.0, gamma: 0.707, delta: 0.707 })
            }
            DMixPMode::Mode2 | DMixPMode::Mode2N => {
                Ok(DownMixingParams { alpha: 0.707, beta: 0.707, gamma: 0.707, delta: 0.707 })
            }
            DMixPMode::Mode3 | DMixPMode::Mode3N => {
                Ok(DownMixingParams { alpha: 1.0, beta: 0.866, gamma: 0.866, delta: 0.866 })
            }
            DMixPMode::Reserved1 | DMixPMode::Reserved2 => {
                invalid_argument_error("reserved dmixp_mode has no downmix coefficients")
            }
        }
    }
}

/// `w_idx_update_rule`: how the running demixing weight index advances frame to frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WIdxUpdateRule {
    FirstFrame,
    Normal { w_idx_offset: i8 },
    Default,
}

/// The `DefaultDemixingInfoParameterData` carried by a `DemixingParamDefinition`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DefaultDemixingInfoParameterData {
    pub dmixp_mode: DMixPMode,
    /// 4-bit default weight index, `0..=10` (`11..=15` reserved for future use).
    pub default_w: u8,
}

impl DefaultDemixingInfoParameterData {
    pub fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let dmixp_mode = DMixPMode::from_u8(reader.read_unsigned(3)? as u8)?;
        let _reserved = reader.read_unsigned(5)?;
        let default_w = reader.read_unsigned(4)? as u8;
        let _reserved_for_future_use = reader.read_unsigned(4)?;
        Ok(DefaultDemixingInfoParameterData { dmixp_mode, default_w })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_unsigned(u64::from(self.dmixp_mode.to_u8()), 3)?;
        writer.write_unsigned(0, 5)?;
        writer.write_unsigned(u64::from(self.default_w), 4)?;
        writer.write_unsigned(0, 4)
    }
}

/// The per-subblock `DemixingInfoParameterData` carried by a demixing parameter block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DemixingInfoParameterData {
    pub dmixp_mode: DMixPMode,
}

impl DemixingInfoParameterData {
    pub fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let dmixp_mode = DMixPMode::from_u8(reader.read_unsigned(3)? as u8)?;
        let _reserved = reader.read_unsigned(5)?;
        Ok(DemixingInfoParameterData { dmixp_mode })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_unsigned(u64::from(self.dmixp_mode.to_u8()), 3)?;
        writer.write_unsigned(0, 5)
    }
}
