// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Sequencer`: the encode path. Validates the in-memory graph, then lays descriptors and
//! temporal units out on the wire in source order, to a scratch buffer that is only handed to
//! the caller once every step has succeeded.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::audio_frame::AudioFrame;
use crate::common::LebGenerator;
use crate::descriptors::{AudioElement, CodecConfig, IaSequenceHeader, MixPresentation};
use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, CodecConfigId, MixPresentationId, ParameterId};
use crate::io::BitWriter;
use crate::obu::{write_obu_header, ObuHeader, ObuType};
use crate::param::ParameterBlock;
use crate::tables::ProgramTables;
use crate::units::Timestamp;

/// Where an [`ArbitraryObu`] is spliced into the written stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertionPoint {
    AfterDescriptors,
    AfterParameterBlocksAtTick(Timestamp),
    AfterAudioFramesAtTick(Timestamp),
}

/// An out-of-band OBU the caller wants spliced into the output, usually for negative testing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArbitraryObu {
    pub point: InsertionPoint,
    pub obu_type: ObuType,
    pub payload: Vec<u8>,
    /// When set, the hook's temporal unit must not be materialized at all: `pick_and_place`
    /// refuses to produce output.
    pub invalidate_temporal_unit: bool,
}

/// One timestamped unit of parameter blocks and audio frames to interleave on the wire.
#[derive(Clone, Debug, Default)]
pub struct TemporalUnitInput {
    pub parameter_blocks: Vec<ParameterBlock>,
    pub audio_frames: Vec<AudioFrame>,
}

fn audio_frame_obu_type(substream_id: u32) -> ObuType {
    if substream_id <= 17 {
        ObuType::AudioFrameId(substream_id as u8)
    } else {
        ObuType::AudioFrame
    }
}

fn write_sized_obu(writer: &mut BitWriter, obu_type: ObuType, payload: &[u8]) -> IamfResult<()> {
    write_obu_header(writer, &ObuHeader::new(obu_type, payload.len() as u32), payload)
}

fn encode_body(f: impl FnOnce(&mut BitWriter) -> IamfResult<()>) -> IamfResult<Vec<u8>> {
    let mut writer = BitWriter::new(LebGenerator::default());
    f(&mut writer)?;
    Ok(writer.finish())
}

/// Validates invariants I1-I5 against the graph that `tables` would build from these maps, by
/// replaying every insertion through the same checks the streaming decoder uses.
fn validate_graph(
    header: &IaSequenceHeader,
    codec_configs: &BTreeMap<CodecConfigId, CodecConfig>,
    audio_elements: &BTreeMap<AudioElementId, AudioElement>,
    mix_presentations: &BTreeMap<MixPresentationId, MixPresentation>,
    parameter_blocks: &[TemporalUnitInput],
) -> IamfResult<ProgramTables> {
    let mut tables = ProgramTables::new();
    tables.ia_header = Some(*header);
    for config in codec_configs.values() {
        tables.insert_codec_config(config.clone())?;
    }
    for element in audio_elements.values() {
        tables.insert_audio_element(element.clone())?;
    }
    for mix in mix_presentations.values() {
        tables.insert_mix_presentation(mix.clone())?;
    }
    for unit in parameter_blocks {
        for block in &unit.parameter_blocks {
            if !tables.param_defs.contains_key(&block.parameter_id) {
                return invalid_argument_error("parameter block references a parameter_id with no definition (I1)");
            }
        }
    }
    Ok(tables)
}

fn parameter_id_at_tick(block: &ParameterBlock) -> ParameterId {
    block.parameter_id
}

/// Encodes a complete IA sequence: descriptors, then temporal units ordered by start timestamp,
/// with any arbitrary OBUs spliced in at their named hook.
pub struct Sequencer;

impl Sequencer {
    /// Returns the fully-encoded `.iamf` byte stream, or an error with nothing written.
    pub fn pick_and_place(
        header: IaSequenceHeader,
        codec_configs: &BTreeMap<CodecConfigId, CodecConfig>,
        audio_elements: &BTreeMap<AudioElementId, AudioElement>,
        mix_presentations: &BTreeMap<MixPresentationId, MixPresentation>,
        temporal_units: &BTreeMap<Timestamp, TemporalUnitInput>,
        arbitrary_obus: &[ArbitraryObu],
        write_temporal_delimiters: bool,
    ) -> IamfResult<Vec<u8>> {
        let units: Vec<_> = temporal_units.values().cloned().collect();
        validate_graph(&header, codec_configs, audio_elements, mix_presentations, &units)?;

        for hook in arbitrary_obus {
            if hook.invalidate_temporal_unit {
                warn!("refusing to materialize output: an arbitrary OBU hook carries the invalidate bit");
                return invalid_argument_error("an arbitrary OBU hook requested temporal-unit invalidation");
            }
        }

        let mut out = BitWriter::new(LebGenerator::default());

        let ia_body = encode_body(|w| header.write(w))?;
        write_sized_obu(&mut out, ObuType::IaSequenceHeader, &ia_body)?;
        debug!("wrote ia sequence header");

        for config in codec_configs.values() {
            let body = encode_body(|w| config.write(w))?;
            write_sized_obu(&mut out, ObuType::CodecConfig, &body)?;
            debug!("wrote codec_config_id={}", config.codec_config_id);
        }
        for element in audio_elements.values() {
            let body = encode_body(|w| element.write(w))?;
            write_sized_obu(&mut out, ObuType::AudioElement, &body)?;
            debug!("wrote audio_element_id={}", element.audio_element_id);
        }
        for mix in mix_presentations.values() {
            let body = encode_body(|w| mix.write(w))?;
            write_sized_obu(&mut out, ObuType::MixPresentation, &body)?;
            debug!("wrote mix_presentation_id={}", mix.mix_presentation_id);
        }

        for hook in arbitrary_obus.iter().filter(|h| h.point == InsertionPoint::AfterDescriptors) {
            write_sized_obu(&mut out, hook.obu_type, &hook.payload)?;
            debug!("spliced arbitrary obu after descriptors");
        }

        for (tick, unit) in temporal_units {
            if write_temporal_delimiters {
                write_sized_obu(&mut out, ObuType::TemporalDelimiter, &[])?;
            }

            for block in &unit.parameter_blocks {
                let body = encode_body(|w| block.write(w))?;
                write_sized_obu(&mut out, ObuType::ParameterBlock, &body)?;
                debug!("wrote parameter_block parameter_id={}", parameter_id_at_tick(block));
            }
            for hook in arbitrary_obus.iter().filter(|h| h.point == InsertionPoint::AfterParameterBlocksAtTick(*tick)) {
                write_sized_obu(&mut out, hook.obu_type, &hook.payload)?;
                debug!("spliced arbitrary obu after parameter blocks at tick={}", tick);
            }

            for frame in &unit.audio_frames {
                let obu_type = audio_frame_obu_type(frame.substream_id.0);
                let body = encode_body(|w| frame.write(w, obu_type))?;
                write_sized_obu(&mut out, obu_type, &body)?;
                debug!("wrote audio_frame substream_id={}", frame.substream_id);
            }
            for hook in arbitrary_obus.iter().filter(|h| h.point == InsertionPoint::AfterAudioFramesAtTick(*tick)) {
                write_sized_obu(&mut out, hook.obu_type, &hook.payload)?;
                debug!("spliced arbitrary obu after audio frames at tick={}", tick);
            }
        }

        Ok(out.finish())
    }
}
