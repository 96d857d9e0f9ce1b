// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `IaSequenceHeader`: the mandatory first descriptor of every IA sequence.

use crate::errors::{invalid_argument_error, IamfResult};
use crate::io::{BitReader, BitWriter};

/// ASCII `"iamf"` read big-endian.
pub const IAMF_MAGIC: u32 = 0x6961_6d66;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Profile {
    Simple,
    Base,
    BaseEnhanced,
    Reserved(u8),
}

impl Profile {
    pub fn from_u8(value: u8) -> Profile {
        match value {
            0 => Profile::Simple,
            1 => Profile::Base,
            2 => Profile::BaseEnhanced,
            other => Profile::Reserved(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Profile::Simple => 0,
            Profile::Base => 1,
            Profile::BaseEnhanced => 2,
            Profile::Reserved(v) => v,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IaSequenceHeader {
    pub primary_profile: Profile,
    pub additional_profile: Profile,
}

impl IaSequenceHeader {
    pub fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let magic = reader.read_unsigned(32)? as u32;
        if magic != IAMF_MAGIC {
            return invalid_argument_error("ia sequence header magic mismatch");
        }
        let primary_profile = Profile::from_u8(reader.read_unsigned(8)? as u8);
        let additional_profile = Profile::from_u8(reader.read_unsigned(8)? as u8);
        Ok(IaSequenceHeader { primary_profile, additional_profile })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_unsigned(u64::from(IAMF_MAGIC), 32)?;
        writer.write_unsigned(u64::from(self.primary_profile.to_u8()), 8)?;
        writer.write_unsigned(u64::from(self.additional_profile.to_u8()), 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LebGenerator;

    #[test]
    fn verify_scenario_s1_trivial_header_round_trip() {
        let header = IaSequenceHeader { primary_profile: Profile::Simple, additional_profile: Profile::Base };
        let mut w = BitWriter::new(LebGenerator::default());
        header.write(&mut w).unwrap();
        let bytes = w.finish();
        assert_eq!(bytes.len(), 6);
        let mut r = BitReader::new(&bytes);
        assert_eq!(IaSequenceHeader::read(&mut r).unwrap(), header);
    }

    #[test]
    fn verify_bad_magic_rejected() {
        let bytes = [0u8, 0, 0, 0, 0, 0];
        let mut r = BitReader::new(&bytes);
        assert!(IaSequenceHeader::read(&mut r).is_err());
    }
}
