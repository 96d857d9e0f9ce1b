// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `CodecConfig`: a codec identifier plus an opaque decoder-config byte slice. Interpreting the
//! decoder-config bytes (extracting `sample_rate`, `bit_depth_for_loudness`, ...) is the codec
//! collaborator's job; the core only frames the bytes.

use crate::errors::IamfResult;
use crate::ids::CodecConfigId;
use crate::io::{BitReader, BitWriter};

/// The four codecs the codec collaborator contract names. `Unknown` preserves any other
/// four-character code so the bitstream still round-trips through a core build with no codec
/// plugins registered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CodecId {
    Opus,
    Flac,
    AacLc,
    Lpcm,
    Unknown(u32),
}

impl CodecId {
    const OPUS: u32 = u32::from_be_bytes(*b"Opus");
    const FLAC: u32 = u32::from_be_bytes(*b"fLaC");
    const AAC_LC: u32 = u32::from_be_bytes(*b"mp4a");
    const LPCM: u32 = u32::from_be_bytes(*b"ipcm");

    pub fn from_fourcc(fourcc: u32) -> CodecId {
        match fourcc {
            Self::OPUS => CodecId::Opus,
            Self::FLAC => CodecId::Flac,
            Self::AAC_LC => CodecId::AacLc,
            Self::LPCM => CodecId::Lpcm,
            other => CodecId::Unknown(other),
        }
    }

    pub fn to_fourcc(self) -> u32 {
        match self {
            CodecId::Opus => Self::OPUS,
            CodecId::Flac => Self::FLAC,
            CodecId::AacLc => Self::AAC_LC,
            CodecId::Lpcm => Self::LPCM,
            CodecId::Unknown(v) => v,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecConfig {
    pub codec_config_id: CodecConfigId,
    pub codec_id: CodecId,
    pub num_samples_per_frame: u32,
    pub audio_roll_distance: i16,
    /// Codec-specific decoder configuration, opaque to the core.
    pub decoder_config_bytes: Vec<u8>,
}

impl CodecConfig {
    pub fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let (raw_id, _) = reader.read_uleb128()?;
        let codec_id = CodecId::from_fourcc(reader.read_unsigned(32)? as u32);
        let (num_samples_per_frame, _) = reader.read_uleb128()?;
        let audio_roll_distance = reader.read_signed16()?;
        let (decoder_config_size, _) = reader.read_uleb128()?;
        let mut decoder_config_bytes = vec![0u8; decoder_config_size as usize];
        reader.read_uint8_span(&mut decoder_config_bytes)?;
        Ok(CodecConfig {
            codec_config_id: CodecConfigId(raw_id),
            codec_id,
            num_samples_per_frame,
            audio_roll_distance,
            decoder_config_bytes,
        })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_uleb128(self.codec_config_id.0)?;
        writer.write_unsigned(u64::from(self.codec_id.to_fourcc()), 32)?;
        writer.write_uleb128(self.num_samples_per_frame)?;
        writer.write_signed16(self.audio_roll_distance)?;
        writer.write_uleb128(self.decoder_config_bytes.len() as u32)?;
        writer.write_uint8_span(&self.decoder_config_bytes)
    }
}
