// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `obu` module implements the common Object Unit header that frames every unit in the
//! bitstream: a 5-bit type, three flag bits, a `uleb128` size, and two optional trailers
//! (trimming, extension).

use crate::errors::{invalid_argument_error, IamfResult};
use crate::io::{BitReader, BitWriter};

/// The 5-bit `obu_type` discriminant. `AudioFrameId(n)` carries its substream id (`0..=17`)
/// directly in the type byte, sparing the body a redundant `substream_id` field. `Reserved`
/// covers the remaining type values in the 5-bit space; readers must skip them without error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObuType {
    IaSequenceHeader,
    CodecConfig,
    AudioElement,
    MixPresentation,
    ParameterBlock,
    TemporalDelimiter,
    AudioFrame,
    AudioFrameId(u8),
    Reserved(u8),
}

impl ObuType {
    /// Decodes a 5-bit value (`0..=31`). Total coverage: every value in range maps to a variant.
    pub fn from_u8(value: u8) -> ObuType {
        match value {
            0 => ObuType::IaSequenceHeader,
            1 => ObuType::CodecConfig,
            2 => ObuType::AudioElement,
            3 => ObuType::MixPresentation,
            4 => ObuType::ParameterBlock,
            5 => ObuType::TemporalDelimiter,
            6 => ObuType::AudioFrame,
            7..=24 => ObuType::AudioFrameId(value - 7),
            _ => ObuType::Reserved(value),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            ObuType::IaSequenceHeader => 0,
            ObuType::CodecConfig => 1,
            ObuType::AudioElement => 2,
            ObuType::MixPresentation => 3,
            ObuType::ParameterBlock => 4,
            ObuType::TemporalDelimiter => 5,
            ObuType::AudioFrame => 6,
            ObuType::AudioFrameId(n) => 7 + n,
            ObuType::Reserved(v) => v,
        }
    }

    /// `true` for the four descriptor OBU types (§3 "Descriptor OBU").
    pub fn is_descriptor(self) -> bool {
        matches!(
            self,
            ObuType::IaSequenceHeader | ObuType::CodecConfig | ObuType::AudioElement | ObuType::MixPresentation
        )
    }

    /// `true` for the types that only ever appear inside a temporal unit.
    pub fn is_temporal_unit(self) -> bool {
        matches!(
            self,
            ObuType::ParameterBlock | ObuType::TemporalDelimiter | ObuType::AudioFrame | ObuType::AudioFrameId(_)
        )
    }

    pub fn is_reserved(self) -> bool {
        matches!(self, ObuType::Reserved(_))
    }

    /// For `AudioFrameId(n)`, the substream id implied by the type itself.
    pub fn inferred_substream_id(self) -> Option<u32> {
        match self {
            ObuType::AudioFrameId(n) => Some(u32::from(n)),
            _ => None,
        }
    }
}

/// The common header every OBU carries ahead of its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObuHeader {
    pub obu_type: ObuType,
    pub obu_redundant_copy: bool,
    pub obu_trimming_status_flag: bool,
    pub obu_extension_flag: bool,
    /// Length, in bytes, of the payload that follows this header (excludes the trimming and
    /// extension trailers, which are counted separately).
    pub obu_size: u32,
    pub num_samples_to_trim_at_end: u32,
    pub num_samples_to_trim_at_start: u32,
    pub extension_header_bytes: Vec<u8>,
}

impl ObuHeader {
    pub fn new(obu_type: ObuType, obu_size: u32) -> Self {
        ObuHeader {
            obu_type,
            obu_redundant_copy: false,
            obu_trimming_status_flag: false,
            obu_extension_flag: false,
            obu_size,
            num_samples_to_trim_at_end: 0,
            num_samples_to_trim_at_start: 0,
            extension_header_bytes: Vec::new(),
        }
    }
}

/// Reads one OBU header. Leaves the reader positioned at the first byte of the payload.
pub fn read_obu_header(reader: &mut BitReader) -> IamfResult<ObuHeader> {
    let obu_type = ObuType::from_u8(reader.read_unsigned(5)? as u8);
    let obu_redundant_copy = reader.read_bool()?;
    let obu_trimming_status_flag = reader.read_bool()?;
    let obu_extension_flag = reader.read_bool()?;
    let (obu_size, _) = reader.read_uleb128()?;

    let (num_samples_to_trim_at_end, num_samples_to_trim_at_start) = if obu_trimming_status_flag {
        let (end, _) = reader.read_uleb128()?;
        let (start, _) = reader.read_uleb128()?;
        (end, start)
    } else {
        (0, 0)
    };

    let extension_header_bytes = if obu_extension_flag {
        let (ext_size, _) = reader.read_uleb128()?;
        let mut buf = vec![0u8; ext_size as usize];
        reader.read_uint8_span(&mut buf)?;
        buf
    } else {
        Vec::new()
    };

    Ok(ObuHeader {
        obu_type,
        obu_redundant_copy,
        obu_trimming_status_flag,
        obu_extension_flag,
        obu_size,
        num_samples_to_trim_at_end,
        num_samples_to_trim_at_start,
        extension_header_bytes,
    })
}

/// Writes an OBU header followed by `payload`. `header.obu_size` is overwritten with
/// `payload.len()` before being serialised, so callers never need to compute it by hand.
pub fn write_obu_header(writer: &mut BitWriter, header: &ObuHeader, payload: &[u8]) -> IamfResult<()> {
    if payload.len() > u32::MAX as usize {
        return invalid_argument_error("obu payload too large to address with a u32 size");
    }

    writer.write_unsigned(u64::from(header.obu_type.to_u8()), 5)?;
    writer.write_bool(header.obu_redundant_copy)?;
    writer.write_bool(header.obu_trimming_status_flag)?;
    writer.write_bool(header.obu_extension_flag)?;
    writer.write_uleb128(payload.len() as u32)?;

    if header.obu_trimming_status_flag {
        writer.write_uleb128(header.num_samples_to_trim_at_end)?;
        writer.write_uleb128(header.num_samples_to_trim_at_start)?;
    }

    if header.obu_extension_flag {
        writer.write_uleb128(header.extension_header_bytes.len() as u32)?;
        writer.write_uint8_span(&header.extension_header_bytes)?;
    }

    writer.write_uint8_span(payload)?;
    Ok(())
}

/// Confirms a body parse consumed exactly its declared frame: any bytes left in `reader` between
/// `start_bit` and `start_bit + obu_size * 8` are a framing violation, per §4.3 "the remaining
/// bytes in its frame (if any) must be zero; otherwise the OBU is rejected".
pub fn verify_frame_exhausted(reader: &mut BitReader, start_bit: u64, obu_size: u32) -> IamfResult<()> {
    let end_bit = start_bit + u64::from(obu_size) * 8;
    if reader.tell() != end_bit {
        return invalid_argument_error("obu body did not consume exactly obu_size bytes");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_obu_type_round_trips_full_range() {
        for v in 0u8..=31 {
            assert_eq!(ObuType::from_u8(v).to_u8(), v);
        }
    }

    #[test]
    fn verify_audio_frame_id_range() {
        assert_eq!(ObuType::from_u8(7), ObuType::AudioFrameId(0));
        assert_eq!(ObuType::from_u8(24), ObuType::AudioFrameId(17));
        assert_eq!(ObuType::AudioFrameId(5).inferred_substream_id(), Some(5));
    }

    #[test]
    fn verify_reserved_range() {
        assert!(ObuType::from_u8(25).is_reserved());
        assert!(ObuType::from_u8(31).is_reserved());
    }

    #[test]
    fn verify_header_round_trip_no_trailers() {
        let header = ObuHeader::new(ObuType::CodecConfig, 0);
        let payload = [1u8, 2, 3];
        let mut w = BitWriter::new(crate::common::LebGenerator::default());
        write_obu_header(&mut w, &header, &payload).unwrap();
        let bytes = w.finish();

        let mut r = BitReader::new(&bytes);
        let decoded = read_obu_header(&mut r).unwrap();
        assert_eq!(decoded.obu_type, ObuType::CodecConfig);
        assert_eq!(decoded.obu_size, 3);
        let start = r.tell();
        let mut body = [0u8; 3];
        r.read_uint8_span(&mut body).unwrap();
        assert_eq!(body, payload);
        verify_frame_exhausted(&mut r, start, decoded.obu_size).unwrap();
    }

    #[test]
    fn verify_header_round_trip_with_trimming_and_extension() {
        let mut header = ObuHeader::new(ObuType::AudioFrameId(2), 0);
        header.obu_trimming_status_flag = true;
        header.num_samples_to_trim_at_end = 5;
        header.num_samples_to_trim_at_start = 2;
        header.obu_extension_flag = true;
        header.extension_header_bytes = vec![0xaa, 0xbb];

        let payload = [9u8; 4];
        let mut w = BitWriter::new(crate::common::LebGenerator::default());
        write_obu_header(&mut w, &header, &payload).unwrap();
        let bytes = w.finish();

        let mut r = BitReader::new(&bytes);
        let decoded = read_obu_header(&mut r).unwrap();
        assert_eq!(decoded.obu_type, ObuType::AudioFrameId(2));
        assert_eq!(decoded.num_samples_to_trim_at_end, 5);
        assert_eq!(decoded.num_samples_to_trim_at_start, 2);
        assert_eq!(decoded.extension_header_bytes, vec![0xaa, 0xbb]);
        assert_eq!(decoded.obu_size, 4);
    }

    #[test]
    fn verify_frame_exhausted_rejects_short_body_read() {
        let header = ObuHeader::new(ObuType::CodecConfig, 0);
        let payload = [1u8, 2, 3];
        let mut w = BitWriter::new(crate::common::LebGenerator::default());
        write_obu_header(&mut w, &header, &payload).unwrap();
        let bytes = w.finish();

        let mut r = BitReader::new(&bytes);
        let decoded = read_obu_header(&mut r).unwrap();
        let start = r.tell();
        r.read_unsigned(8).unwrap();
        assert!(verify_frame_exhausted(&mut r, start, decoded.obu_size).is_err());
    }
}
