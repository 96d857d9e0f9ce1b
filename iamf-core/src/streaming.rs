// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `StreamingProcessor`: the top-level incremental decode API. Consumes the descriptor prefix of
//! an IA sequence once, then hands out temporal-unit items one OBU at a time.

use std::collections::HashMap;

use log::debug;

use crate::audio_frame::AudioFrame;
use crate::descriptors::{AudioElement, CodecConfig, IaSequenceHeader, MixPresentation};
use crate::errors::{invalid_argument_error, IamfError, IamfResult};
use crate::ids::{AudioElementId, CodecConfigId};
use crate::io::BitReader;
use crate::obu::{read_obu_header, ObuHeader, ObuType};
use crate::param::ParameterBlock;
use crate::parameters_manager::ParametersManager;
use crate::tables::ProgramTables;
use crate::temporal_unit::{AudioFrameWithData, ParameterBlockWithData};
use crate::timing::GlobalTimingModule;

/// One item handed back by [`StreamingProcessor::process_temporal_unit_obu`].
#[derive(Clone, Debug, PartialEq)]
pub enum TemporalUnitItem {
    ParameterBlock(ParameterBlockWithData),
    AudioFrame(AudioFrameWithData),
    TemporalDelimiter,
}

/// Outcome of [`StreamingProcessor::process_descriptor_obus`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DescriptorReadOutcome {
    pub insufficient_data: bool,
}

/// Outcome of one [`StreamingProcessor::process_temporal_unit_obu`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct TemporalUnitStep {
    /// `None` for a skipped reserved OBU, a validated redundant descriptor copy, or when nothing
    /// was emitted because the stream ran dry or a new sequence begins.
    pub item: Option<TemporalUnitItem>,
    /// `false` once a non-redundant `IaSequenceHeader` or clean EOF is reached.
    pub continue_processing: bool,
    pub insufficient_data: bool,
}

/// Drives one IA sequence: builds the descriptor tables, then yields temporal-unit items.
pub struct StreamingProcessor {
    tables: ProgramTables,
    timing: GlobalTimingModule,
    params: ParametersManager,
    descriptors_ready: bool,
}

impl StreamingProcessor {
    pub fn new() -> Self {
        StreamingProcessor {
            tables: ProgramTables::new(),
            timing: GlobalTimingModule::new(),
            params: ParametersManager::new(),
            descriptors_ready: false,
        }
    }

    pub fn tables(&self) -> &ProgramTables {
        &self.tables
    }

    fn codec_config_key_set(&self) -> HashMap<CodecConfigId, ()> {
        self.tables.codec_configs.keys().map(|id| (*id, ())).collect()
    }

    fn audio_element_key_set(&self) -> HashMap<AudioElementId, ()> {
        self.tables.audio_elements.keys().map(|id| (*id, ())).collect()
    }

    /// Reads the mandatory `IaSequenceHeader` then every descriptor OBU up to (but not
    /// including) the first temporal-unit OBU, populating the lookup tables.
    pub fn process_descriptor_obus(
        &mut self,
        is_exhaustive_and_exact: bool,
        reader: &mut BitReader,
    ) -> IamfResult<DescriptorReadOutcome> {
        let header_start = reader.tell();
        let header = match read_obu_header(reader) {
            Ok(h) => h,
            Err(IamfError::ResourceExhausted(_)) => {
                reader.seek(header_start)?;
                return Ok(DescriptorReadOutcome { insufficient_data: true });
            }
            Err(e) => return Err(e),
        };
        if header.obu_type != ObuType::IaSequenceHeader {
            return invalid_argument_error("an IA sequence must begin with an IaSequenceHeader OBU");
        }
        let ia_header = match IaSequenceHeader::read(reader) {
            Ok(h) => h,
            Err(IamfError::ResourceExhausted(_)) => {
                reader.seek(header_start)?;
                return Ok(DescriptorReadOutcome { insufficient_data: true });
            }
            Err(e) => return Err(e),
        };
        debug!("ia sequence header: primary={:?} additional={:?}", ia_header.primary_profile, ia_header.additional_profile);
        self.tables.ia_header = Some(ia_header);

        loop {
            if !reader.is_data_available() {
                self.descriptors_ready = is_exhaustive_and_exact;
                return Ok(DescriptorReadOutcome { insufficient_data: !is_exhaustive_and_exact });
            }

            let obu_start = reader.tell();
            let peeked = match read_obu_header(reader) {
                Ok(h) => h,
                Err(IamfError::ResourceExhausted(_)) => {
                    reader.seek(obu_start)?;
                    return Ok(DescriptorReadOutcome { insufficient_data: true });
                }
                Err(e) => return Err(e),
            };

            if peeked.obu_type.is_temporal_unit() {
                reader.seek(obu_start)?;
                if is_exhaustive_and_exact {
                    return invalid_argument_error("exhaustive descriptor read encountered a temporal-unit OBU");
                }
                self.descriptors_ready = true;
                return Ok(DescriptorReadOutcome { insufficient_data: false });
            }

            if peeked.obu_type.is_reserved() {
                debug!("skipping reserved descriptor-prefix obu_type={}", peeked.obu_type.to_u8());
                self.skip_body(reader, obu_start, &peeked)?;
                continue;
            }

            match self.read_descriptor_body(reader, &peeked) {
                Ok(()) => continue,
                Err(IamfError::ResourceExhausted(_)) => {
                    reader.seek(obu_start)?;
                    return Ok(DescriptorReadOutcome { insufficient_data: true });
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn skip_body(&self, reader: &mut BitReader, obu_start: u64, header: &ObuHeader) -> IamfResult<()> {
        let header_end = reader.tell();
        reader.seek(obu_start)?;
        reader.seek(header_end + u64::from(header.obu_size) * 8)
    }

    fn read_descriptor_body(&mut self, reader: &mut BitReader, header: &ObuHeader) -> IamfResult<()> {
        match header.obu_type {
            ObuType::IaSequenceHeader => {
                let parsed = IaSequenceHeader::read(reader)?;
                if header.obu_redundant_copy {
                    match &self.tables.ia_header {
                        Some(existing) if *existing == parsed => Ok(()),
                        Some(_) => invalid_argument_error("redundant IaSequenceHeader disagrees with the original"),
                        None => {
                            self.tables.ia_header = Some(parsed);
                            Ok(())
                        }
                    }
                } else {
                    invalid_argument_error("a second non-redundant IaSequenceHeader appeared before any temporal unit")
                }
            }
            ObuType::CodecConfig => {
                let parsed = CodecConfig::read(reader)?;
                if header.obu_redundant_copy {
                    match self.tables.codec_configs.get(&parsed.codec_config_id) {
                        Some(existing) if *existing == parsed => Ok(()),
                        Some(_) => invalid_argument_error("redundant CodecConfig disagrees with the original"),
                        None => self.tables.insert_codec_config(parsed),
                    }
                } else {
                    self.tables.insert_codec_config(parsed)
                }
            }
            ObuType::AudioElement => {
                let parsed = AudioElement::read(reader, &self.codec_config_key_set())?;
                if header.obu_redundant_copy {
                    match self.tables.audio_elements.get(&parsed.audio_element_id) {
                        Some(existing) if *existing == parsed => Ok(()),
                        Some(_) => invalid_argument_error("redundant AudioElement disagrees with the original"),
                        None => self.tables.insert_audio_element(parsed),
                    }
                } else {
                    self.tables.insert_audio_element(parsed)
                }
            }
            ObuType::MixPresentation => {
                let parsed = MixPresentation::read(reader, &self.audio_element_key_set())?;
                if header.obu_redundant_copy {
                    match self.tables.mix_presentations.get(&parsed.mix_presentation_id) {
                        Some(existing) if *existing == parsed => Ok(()),
                        Some(_) => invalid_argument_error("redundant MixPresentation disagrees with the original"),
                        None => self.tables.insert_mix_presentation(parsed),
                    }
                } else {
                    self.tables.insert_mix_presentation(parsed)
                }
            }
            _ => invalid_argument_error("unexpected OBU type in descriptor prefix"),
        }
    }

    /// Processes exactly one temporal-unit OBU (or none, if the stream is dry or a new sequence
    /// is beginning). `ResourceExhausted` rewinds to the start of the offending OBU.
    pub fn process_temporal_unit_obu(&mut self, reader: &mut BitReader) -> IamfResult<TemporalUnitStep> {
        if !reader.is_data_available() {
            return Ok(TemporalUnitStep { item: None, continue_processing: false, insufficient_data: false });
        }

        let obu_start = reader.tell();
        let header = match read_obu_header(reader) {
            Ok(h) => h,
            Err(IamfError::ResourceExhausted(_)) => {
                reader.seek(obu_start)?;
                return Ok(TemporalUnitStep { item: None, continue_processing: true, insufficient_data: true });
            }
            Err(e) => return Err(e),
        };

        if header.obu_type == ObuType::IaSequenceHeader && !header.obu_redundant_copy {
            reader.seek(obu_start)?;
            return Ok(TemporalUnitStep { item: None, continue_processing: false, insufficient_data: false });
        }

        match self.process_temporal_unit_body(reader, &header) {
            Ok(item) => Ok(TemporalUnitStep { item, continue_processing: true, insufficient_data: false }),
            Err(IamfError::ResourceExhausted(_)) => {
                reader.seek(obu_start)?;
                Ok(TemporalUnitStep { item: None, continue_processing: true, insufficient_data: true })
            }
            Err(e) => Err(e),
        }
    }

    fn process_temporal_unit_body(
        &mut self,
        reader: &mut BitReader,
        header: &ObuHeader,
    ) -> IamfResult<Option<TemporalUnitItem>> {
        if header.obu_type.is_reserved() {
            debug!("skipping reserved temporal-unit obu_type={}", header.obu_type.to_u8());
            let header_end = reader.tell();
            reader.seek(header_end + u64::from(header.obu_size) * 8)?;
            return Ok(None);
        }

        if header.obu_redundant_copy && header.obu_type.is_descriptor() {
            debug!("accepting redundant descriptor copy between temporal units");
            self.read_descriptor_body(reader, header)?;
            return Ok(None);
        }

        match header.obu_type {
            ObuType::ParameterBlock => {
                let block = ParameterBlock::read(reader, &self.tables.param_defs, &self.tables.audio_elements)?;
                let declared_start = self.timing.peek_next_parameter_timestamp(block.parameter_id);
                let with_data =
                    ParameterBlockWithData::assemble(block, declared_start, &self.tables, &mut self.timing, &mut self.params)?;
                Ok(Some(TemporalUnitItem::ParameterBlock(with_data)))
            }
            ObuType::AudioFrame | ObuType::AudioFrameId(_) => {
                let frame = AudioFrame::read(reader, header.obu_type, header.obu_size)?;
                let with_data = AudioFrameWithData::assemble(frame, &self.tables, &mut self.timing, &mut self.params)?;
                Ok(Some(TemporalUnitItem::AudioFrame(with_data)))
            }
            ObuType::TemporalDelimiter => {
                if header.obu_size != 0 {
                    return invalid_argument_error("temporal delimiter obu must carry an empty body");
                }
                Ok(Some(TemporalUnitItem::TemporalDelimiter))
            }
            _ => invalid_argument_error("unexpected OBU type inside a temporal unit"),
        }
    }
}

impl Default for StreamingProcessor {
    fn default() -> Self {
        StreamingProcessor::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LebGenerator;
    use crate::descriptors::ia_sequence_header::Profile;
    use crate::io::BitWriter;

    fn write_simple_header(w: &mut BitWriter) {
        let header = IaSequenceHeader { primary_profile: Profile::Simple, additional_profile: Profile::Base };
        let mut body_writer = BitWriter::new(LebGenerator::default());
        header.write(&mut body_writer).unwrap();
        let payload = body_writer.finish();
        crate::obu::write_obu_header(w, &ObuHeader::new(ObuType::IaSequenceHeader, payload.len() as u32), &payload).unwrap();
    }

    #[test]
    fn verify_trivial_sequence_descriptor_read() {
        let mut w = BitWriter::new(LebGenerator::default());
        write_simple_header(&mut w);
        let bytes = w.finish();

        let mut r = BitReader::new(&bytes);
        let mut processor = StreamingProcessor::new();
        let outcome = processor.process_descriptor_obus(true, &mut r).unwrap();
        assert!(!outcome.insufficient_data);
        assert!(processor.tables().ia_header.is_some());
        assert!(processor.tables().codec_configs.is_empty());
    }

    #[test]
    fn verify_descriptor_read_rejects_temporal_unit_when_exhaustive() {
        let mut w = BitWriter::new(LebGenerator::default());
        write_simple_header(&mut w);
        crate::obu::write_obu_header(&mut w, &ObuHeader::new(ObuType::TemporalDelimiter, 0), &[]).unwrap();
        let bytes = w.finish();

        let mut r = BitReader::new(&bytes);
        let mut processor = StreamingProcessor::new();
        assert!(processor.process_descriptor_obus(true, &mut r).is_err());
    }

    #[test]
    fn verify_descriptor_read_stops_before_temporal_unit_when_not_exhaustive() {
        let mut w = BitWriter::new(LebGenerator::default());
        write_simple_header(&mut w);
        let descriptors_end = w.finish();
        let mut w2 = BitWriter::new(LebGenerator::default());
        for byte in &descriptors_end {
            w2.write_unsigned(u64::from(*byte), 8).unwrap();
        }
        crate::obu::write_obu_header(&mut w2, &ObuHeader::new(ObuType::TemporalDelimiter, 0), &[]).unwrap();
        let bytes = w2.finish();

        let mut r = BitReader::new(&bytes);
        let mut processor = StreamingProcessor::new();
        let outcome = processor.process_descriptor_obus(false, &mut r).unwrap();
        assert!(!outcome.insufficient_data);

        let step = processor.process_temporal_unit_obu(&mut r).unwrap();
        assert_eq!(step.item, Some(TemporalUnitItem::TemporalDelimiter));
    }

    #[test]
    fn verify_resumable_short_read_rewinds_and_retries() {
        let mut w = BitWriter::new(LebGenerator::default());
        crate::obu::write_obu_header(&mut w, &ObuHeader::new(ObuType::TemporalDelimiter, 0), &[]).unwrap();
        let full = w.finish();
        let truncated = &full[..full.len() - 1];

        let mut r = BitReader::new(truncated);
        let mut processor = StreamingProcessor::new();
        let step = processor.process_temporal_unit_obu(&mut r).unwrap();
        assert!(step.insufficient_data);
        assert_eq!(r.tell(), 0);

        let mut r2 = BitReader::new(&full);
        let step2 = processor.process_temporal_unit_obu(&mut r2).unwrap();
        assert_eq!(step2.item, Some(TemporalUnitItem::TemporalDelimiter));
    }
}
