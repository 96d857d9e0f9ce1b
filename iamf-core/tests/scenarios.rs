// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios exercising the streaming decoder and encode-path sequencer together.

use std::collections::BTreeMap;

use iamf_core::audio_frame::AudioFrame;
use iamf_core::common::LebGenerator;
use iamf_core::descriptors::audio_element::{
    AudioElementConfig, AudioElementParam, AudioElementType, ChannelAudioLayerConfig, LoudspeakerLayout,
    ScalableChannelLayoutConfig,
};
use iamf_core::descriptors::codec_config::CodecId;
use iamf_core::descriptors::ia_sequence_header::Profile;
use iamf_core::descriptors::{AudioElement, CodecConfig, IaSequenceHeader};
use iamf_core::ids::{AudioElementId, CodecConfigId, MixPresentationId, ParameterId, SubstreamId};
use iamf_core::io::{BitReader, BitWriter};
use iamf_core::param::definition::{Mode0Durations, ParamDefinitionCommon, ParamDefinitionType};
use iamf_core::param::demixing::{DMixPMode, DefaultDemixingInfoParameterData, DemixingInfoParameterData};
use iamf_core::param::{DownMixingParams, ParamDefinition, ParameterBlock, ParameterSubblockData};
use iamf_core::sequencer::{Sequencer, TemporalUnitInput};
use iamf_core::streaming::{StreamingProcessor, TemporalUnitItem};

fn encode_ia_header(header: &IaSequenceHeader) -> Vec<u8> {
    let mut body = BitWriter::new(LebGenerator::default());
    header.write(&mut body).unwrap();
    let payload = body.finish();
    let mut out = BitWriter::new(LebGenerator::default());
    iamf_core::obu::write_obu_header(
        &mut out,
        &iamf_core::obu::ObuHeader::new(iamf_core::obu::ObuType::IaSequenceHeader, payload.len() as u32),
        &payload,
    )
    .unwrap();
    out.finish()
}

/// (S1) A bitstream consisting only of an `IaSequenceHeader` decodes with all tables empty.
#[test]
fn scenario_s1_trivial_sequence() {
    let header = IaSequenceHeader { primary_profile: Profile::Simple, additional_profile: Profile::Base };
    let bytes = encode_ia_header(&header);

    let mut reader = BitReader::new(&bytes);
    let mut processor = StreamingProcessor::new();
    let outcome = processor.process_descriptor_obus(true, &mut reader).unwrap();

    assert!(!outcome.insufficient_data);
    assert_eq!(processor.tables().ia_header, Some(header));
    assert!(processor.tables().codec_configs.is_empty());
    assert!(processor.tables().audio_elements.is_empty());
    assert!(processor.tables().mix_presentations.is_empty());
}

fn two_substream_element() -> (IaSequenceHeader, BTreeMap<CodecConfigId, CodecConfig>, BTreeMap<AudioElementId, AudioElement>) {
    let header = IaSequenceHeader { primary_profile: Profile::Simple, additional_profile: Profile::Base };

    let mut codec_configs = BTreeMap::new();
    codec_configs.insert(
        CodecConfigId(1),
        CodecConfig {
            codec_config_id: CodecConfigId(1),
            codec_id: CodecId::Opus,
            num_samples_per_frame: 8,
            audio_roll_distance: -4,
            decoder_config_bytes: vec![],
        },
    );

    let demixing_common = ParamDefinitionCommon {
        parameter_id: ParameterId(100),
        parameter_rate: 48000,
        param_definition_mode: false,
        mode0: Some(Mode0Durations { duration: 8, constant_subblock_duration: 8, subblock_durations: vec![] }),
    };
    let default_demixing = DefaultDemixingInfoParameterData { dmixp_mode: DMixPMode::Mode1, default_w: 0 };
    let demixing_def = ParamDefinition::new_demixing(demixing_common, default_demixing).unwrap();

    let mut audio_elements = BTreeMap::new();
    audio_elements.insert(
        AudioElementId(1),
        AudioElement {
            audio_element_id: AudioElementId(1),
            audio_element_type: AudioElementType::ChannelBased,
            codec_config_id: CodecConfigId(1),
            substream_ids: vec![SubstreamId(1), SubstreamId(2)],
            params: vec![AudioElementParam { param_type: ParamDefinitionType::Demixing, definition: demixing_def }],
            config: AudioElementConfig::ScalableChannelLayout(ScalableChannelLayoutConfig {
                layers: vec![ChannelAudioLayerConfig {
                    loudspeaker_layout: LoudspeakerLayout::Stereo,
                    recon_gain_is_present: false,
                    substream_count: 2,
                    coupled_substream_count: 1,
                    output_gain: None,
                }],
            }),
        },
    );

    (header, codec_configs, audio_elements)
}

/// (S5) A descriptor prefix with one two-substream audio element and a demixing parameter
/// definition, followed by a parameter block and two audio frames, assembles into three items
/// sharing `[start=0, end=8)` with `DMixPMode3`'s coefficients.
#[test]
fn scenario_s5_two_substream_temporal_unit_with_demixing() {
    let (header, codec_configs, audio_elements) = two_substream_element();

    let mut temporal_units = BTreeMap::new();
    temporal_units.insert(
        0,
        TemporalUnitInput {
            parameter_blocks: vec![ParameterBlock::new_mode0(
                ParameterId(100),
                vec![ParameterSubblockData::Demixing(DemixingInfoParameterData { dmixp_mode: DMixPMode::Mode3 })],
                vec![8],
            )],
            audio_frames: vec![
                AudioFrame { substream_id: SubstreamId(1), payload_bytes: vec![1; 4] },
                AudioFrame { substream_id: SubstreamId(2), payload_bytes: vec![2; 4] },
            ],
        },
    );

    let bytes = Sequencer::pick_and_place(
        header,
        &codec_configs,
        &audio_elements,
        &BTreeMap::new(),
        &temporal_units,
        &[],
        false,
    )
    .unwrap();

    let mut reader = BitReader::new(&bytes);
    let mut processor = StreamingProcessor::new();
    processor.process_descriptor_obus(false, &mut reader).unwrap();

    let mut items = Vec::new();
    loop {
        let step = processor.process_temporal_unit_obu(&mut reader).unwrap();
        assert!(!step.insufficient_data);
        match step.item {
            Some(item) => items.push(item),
            None if !step.continue_processing => break,
            None => continue,
        }
    }

    assert_eq!(items.len(), 3);
    let expected = DownMixingParams::for_mode(DMixPMode::Mode3).unwrap();
    for item in &items {
        match item {
            TemporalUnitItem::ParameterBlock(block) => assert_eq!((block.start, block.end), (0, 8)),
            TemporalUnitItem::AudioFrame(frame) => {
                assert_eq!((frame.start, frame.end), (0, 8));
                assert_eq!(frame.down_mixing_params, Some(expected));
            }
            TemporalUnitItem::TemporalDelimiter => panic!("no delimiters were written in this scenario"),
        }
    }
}

/// (S6) Truncating the encoded S5 stream by one byte mid-second-frame yields the first frame
/// successfully, then a resource-exhausted/rewind on the second; appending the missing byte and
/// retrying reproduces the untruncated result.
#[test]
fn scenario_s6_resumable_short_read() {
    let (header, codec_configs, audio_elements) = two_substream_element();

    let mut temporal_units = BTreeMap::new();
    temporal_units.insert(
        0,
        TemporalUnitInput {
            parameter_blocks: vec![ParameterBlock::new_mode0(
                ParameterId(100),
                vec![ParameterSubblockData::Demixing(DemixingInfoParameterData { dmixp_mode: DMixPMode::Mode3 })],
                vec![8],
            )],
            audio_frames: vec![
                AudioFrame { substream_id: SubstreamId(1), payload_bytes: vec![1; 4] },
                AudioFrame { substream_id: SubstreamId(2), payload_bytes: vec![2; 4] },
            ],
        },
    );

    let full = Sequencer::pick_and_place(
        header,
        &codec_configs,
        &audio_elements,
        &BTreeMap::<MixPresentationId, iamf_core::descriptors::MixPresentation>::new(),
        &temporal_units,
        &[],
        false,
    )
    .unwrap();
    let truncated = &full[..full.len() - 1];

    let mut processor = StreamingProcessor::new();
    let mut reader = BitReader::new(truncated);
    processor.process_descriptor_obus(false, &mut reader).unwrap();

    let first = processor.process_temporal_unit_obu(&mut reader).unwrap();
    assert!(matches!(first.item, Some(TemporalUnitItem::ParameterBlock(_))));

    let second = processor.process_temporal_unit_obu(&mut reader).unwrap();
    assert!(matches!(second.item, Some(TemporalUnitItem::AudioFrame(_))));

    let rewind_point = reader.tell();
    let third = processor.process_temporal_unit_obu(&mut reader).unwrap();
    assert!(third.insufficient_data);
    assert_eq!(reader.tell(), rewind_point);

    let mut full_reader = BitReader::new(&full);
    full_reader.seek(rewind_point).unwrap();
    let resumed = processor.process_temporal_unit_obu(&mut full_reader).unwrap();
    match resumed.item {
        Some(TemporalUnitItem::AudioFrame(frame)) => {
            assert_eq!(frame.obu.payload_bytes, vec![2; 4]);
            assert_eq!((frame.start, frame.end), (0, 8));
        }
        other => panic!("expected the second audio frame, got {:?}", other),
    }
}
