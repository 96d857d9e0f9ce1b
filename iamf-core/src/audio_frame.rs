// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `AudioFrame`: a compressed-frame payload tagged with its substream id. Dedicated OBU types
//! (`AudioFrameId0..17`) carry the id in the type byte itself and skip the explicit field;
//! the generic `AudioFrame` type carries it inline.

use crate::errors::{internal_error, invalid_argument_error, IamfResult};
use crate::ids::SubstreamId;
use crate::io::{BitReader, BitWriter};
use crate::obu::ObuType;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioFrame {
    pub substream_id: SubstreamId,
    /// The codec's compressed payload bytes, opaque to the core.
    pub payload_bytes: Vec<u8>,
}

impl AudioFrame {
    pub fn read(reader: &mut BitReader, obu_type: ObuType, obu_size: u32) -> IamfResult<Self> {
        let start_bit = reader.tell();

        let substream_id = match obu_type.inferred_substream_id() {
            Some(id) => SubstreamId(id),
            None => {
                let (raw_id, _) = reader.read_uleb128()?;
                SubstreamId(raw_id)
            }
        };

        let consumed_bytes = (reader.tell() - start_bit) / 8;
        if consumed_bytes > u64::from(obu_size) {
            return invalid_argument_error("audio frame substream_id field overran its obu_size");
        }
        let remaining = obu_size - consumed_bytes as u32;
        let mut payload_bytes = vec![0u8; remaining as usize];
        reader.read_uint8_span(&mut payload_bytes)?;

        Ok(AudioFrame { substream_id, payload_bytes })
    }

    pub fn write(&self, writer: &mut BitWriter, obu_type: ObuType) -> IamfResult<()> {
        match obu_type.inferred_substream_id() {
            Some(id) if id == self.substream_id.0 => {}
            Some(_) => return internal_error("obu_type's inferred substream_id disagrees with the frame"),
            None => writer.write_uleb128(self.substream_id.0)?,
        }
        writer.write_uint8_span(&self.payload_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LebGenerator;

    #[test]
    fn verify_generic_frame_round_trip_with_explicit_substream_id() {
        let frame = AudioFrame { substream_id: SubstreamId(3), payload_bytes: vec![1, 2, 3, 4] };
        let mut w = BitWriter::new(LebGenerator::default());
        frame.write(&mut w, ObuType::AudioFrame).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        let decoded = AudioFrame::read(&mut r, ObuType::AudioFrame, bytes.len() as u32).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn verify_id_inferring_frame_has_no_substream_field_on_wire() {
        let frame = AudioFrame { substream_id: SubstreamId(5), payload_bytes: vec![9, 9, 9] };
        let mut w = BitWriter::new(LebGenerator::default());
        frame.write(&mut w, ObuType::AudioFrameId(5)).unwrap();
        let bytes = w.finish();
        assert_eq!(bytes, vec![9, 9, 9]);
        let mut r = BitReader::new(&bytes);
        let decoded = AudioFrame::read(&mut r, ObuType::AudioFrameId(5), bytes.len() as u32).unwrap();
        assert_eq!(decoded, frame);
    }
}
