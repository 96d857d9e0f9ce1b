// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `MixPresentation`: a language/annotation header plus one or more sub-mixes, each listing
//! audio-element contributions and the output layouts' loudness metadata. Mostly structured
//! field-by-field serialisation; the only piece that interacts with the rest of the core is the
//! embedded mix-gain parameter definitions.

use std::collections::HashMap;

use crate::descriptors::audio_element::LoudspeakerLayout;
use crate::errors::{invalid_argument_error, IamfResult};
use crate::ids::{AudioElementId, MixPresentationId};
use crate::io::{BitReader, BitWriter};
use crate::param::{ParamDefinition, ParamDefinitionCommon};

fn read_labels(reader: &mut BitReader) -> IamfResult<Vec<String>> {
    let (count, _) = reader.read_uleb128()?;
    let mut labels = Vec::with_capacity(count as usize);
    for _ in 0..count {
        labels.push(reader.read_string()?);
    }
    Ok(labels)
}

fn write_labels(writer: &mut BitWriter, labels: &[String]) -> IamfResult<()> {
    writer.write_uleb128(labels.len() as u32)?;
    for label in labels {
        writer.write_string(label)?;
    }
    Ok(())
}

/// An inline mix-gain parameter definition, declared in-place rather than looked up by id: every
/// element/output mix gain in a mix presentation owns its definition directly.
fn read_mix_gain(reader: &mut BitReader) -> IamfResult<ParamDefinition> {
    ParamDefinition::read(reader, crate::param::ParamDefinitionType::MixGain, AudioElementId(0))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HeadphonesRenderingConfig {
    pub headphones_rendering_mode: u8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderingConfig {
    pub headphones_rendering_mode: u8,
    pub extension_bytes: Vec<u8>,
}

impl RenderingConfig {
    fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let headphones_rendering_mode = reader.read_unsigned(2)? as u8;
        let _reserved = reader.read_unsigned(6)?;
        let (size, _) = reader.read_uleb128()?;
        let mut extension_bytes = vec![0u8; size as usize];
        reader.read_uint8_span(&mut extension_bytes)?;
        Ok(RenderingConfig { headphones_rendering_mode, extension_bytes })
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_unsigned(u64::from(self.headphones_rendering_mode), 2)?;
        writer.write_unsigned(0, 6)?;
        writer.write_uleb128(self.extension_bytes.len() as u32)?;
        writer.write_uint8_span(&self.extension_bytes)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubMixAudioElement {
    pub audio_element_id: AudioElementId,
    pub element_annotations: Vec<String>,
    pub rendering_config: RenderingConfig,
    pub element_mix_gain: ParamDefinition,
}

impl SubMixAudioElement {
    fn read(reader: &mut BitReader, num_labels: u32, audio_elements: &HashMap<AudioElementId, ()>) -> IamfResult<Self> {
        let (raw_id, _) = reader.read_uleb128()?;
        let audio_element_id = AudioElementId(raw_id);
        if !audio_elements.contains_key(&audio_element_id) {
            return invalid_argument_error("sub-mix references an unknown audio_element_id");
        }
        let mut element_annotations = Vec::with_capacity(num_labels as usize);
        for _ in 0..num_labels {
            element_annotations.push(reader.read_string()?);
        }
        let rendering_config = RenderingConfig::read(reader)?;
        let element_mix_gain = read_mix_gain(reader)?;
        Ok(SubMixAudioElement { audio_element_id, element_annotations, rendering_config, element_mix_gain })
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_uleb128(self.audio_element_id.0)?;
        for annotation in &self.element_annotations {
            writer.write_string(annotation)?;
        }
        self.rendering_config.write(writer)?;
        self.element_mix_gain.write(writer)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AnchoredLoudnessElement {
    pub anchor_element: u8,
    pub anchored_loudness: i16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoudnessInfo {
    pub integrated_loudness: i16,
    pub digital_peak: i16,
    pub true_peak: Option<i16>,
    pub anchored_loudness: Option<Vec<AnchoredLoudnessElement>>,
}

const INFO_TYPE_TRUE_PEAK: u8 = 1 << 0;
const INFO_TYPE_ANCHORED_LOUDNESS: u8 = 1 << 1;

impl LoudnessInfo {
    fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let info_type = reader.read_unsigned(8)? as u8;
        let integrated_loudness = reader.read_signed16()?;
        let digital_peak = reader.read_signed16()?;

        let true_peak =
            if info_type & INFO_TYPE_TRUE_PEAK != 0 { Some(reader.read_signed16()?) } else { None };

        let anchored_loudness = if info_type & INFO_TYPE_ANCHORED_LOUDNESS != 0 {
            let (count, _) = reader.read_uleb128()?;
            let mut elements = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let anchor_element = reader.read_unsigned(8)? as u8;
                let anchored_loudness = reader.read_signed16()?;
                elements.push(AnchoredLoudnessElement { anchor_element, anchored_loudness });
            }
            Some(elements)
        } else {
            None
        };

        Ok(LoudnessInfo { integrated_loudness, digital_peak, true_peak, anchored_loudness })
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        let mut info_type = 0u8;
        if self.true_peak.is_some() {
            info_type |= INFO_TYPE_TRUE_PEAK;
        }
        if self.anchored_loudness.is_some() {
            info_type |= INFO_TYPE_ANCHORED_LOUDNESS;
        }
        writer.write_unsigned(u64::from(info_type), 8)?;
        writer.write_signed16(self.integrated_loudness)?;
        writer.write_signed16(self.digital_peak)?;
        if let Some(true_peak) = self.true_peak {
            writer.write_signed16(true_peak)?;
        }
        if let Some(elements) = &self.anchored_loudness {
            writer.write_uleb128(elements.len() as u32)?;
            for element in elements {
                writer.write_unsigned(u64::from(element.anchor_element), 8)?;
                writer.write_signed16(element.anchored_loudness)?;
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SoundSystemLayout {
    LoudspeakerSoundSystem(LoudspeakerLayout),
    Binaural,
    Reserved(u8),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MixPresentationLayout {
    pub layout: SoundSystemLayout,
    pub loudness_info: LoudnessInfo,
}

impl MixPresentationLayout {
    fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let layout_type = reader.read_unsigned(2)? as u8;
        let _reserved = reader.read_unsigned(6)?;
        let layout = match layout_type {
            1 => SoundSystemLayout::LoudspeakerSoundSystem(LoudspeakerLayout::from_u8(reader.read_unsigned(4)? as u8)),
            2 => {
                let _reserved = reader.read_unsigned(4)?;
                SoundSystemLayout::Binaural
            }
            other => {
                let _reserved = reader.read_unsigned(4)?;
                SoundSystemLayout::Reserved(other)
            }
        };
        let loudness_info = LoudnessInfo::read(reader)?;
        Ok(MixPresentationLayout { layout, loudness_info })
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        let (layout_type, inner) = match self.layout {
            SoundSystemLayout::LoudspeakerSoundSystem(l) => (1u8, l.to_u8()),
            SoundSystemLayout::Binaural => (2u8, 0u8),
            SoundSystemLayout::Reserved(other) => (other, 0u8),
        };
        writer.write_unsigned(u64::from(layout_type), 2)?;
        writer.write_unsigned(0, 6)?;
        writer.write_unsigned(u64::from(inner), 4)?;
        self.loudness_info.write(writer)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MixPresentationSubMix {
    pub audio_elements: Vec<SubMixAudioElement>,
    pub output_mix_gain: ParamDefinition,
    pub layouts: Vec<MixPresentationLayout>,
}

impl MixPresentationSubMix {
    fn read(reader: &mut BitReader, num_labels: u32, audio_elements: &HashMap<AudioElementId, ()>) -> IamfResult<Self> {
        let (num_audio_elements, _) = reader.read_uleb128()?;
        if num_audio_elements == 0 {
            return invalid_argument_error("sub-mix must list at least one audio element");
        }
        let mut elements = Vec::with_capacity(num_audio_elements as usize);
        for _ in 0..num_audio_elements {
            elements.push(SubMixAudioElement::read(reader, num_labels, audio_elements)?);
        }

        let output_mix_gain = read_mix_gain(reader)?;

        let (num_layouts, _) = reader.read_uleb128()?;
        let mut layouts = Vec::with_capacity(num_layouts as usize);
        for _ in 0..num_layouts {
            layouts.push(MixPresentationLayout::read(reader)?);
        }

        Ok(MixPresentationSubMix { audio_elements: elements, output_mix_gain, layouts })
    }

    fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        if self.audio_elements.is_empty() {
            return invalid_argument_error("sub-mix must list at least one audio element");
        }
        writer.write_uleb128(self.audio_elements.len() as u32)?;
        for element in &self.audio_elements {
            element.write(writer)?;
        }
        self.output_mix_gain.write(writer)?;
        writer.write_uleb128(self.layouts.len() as u32)?;
        for layout in &self.layouts {
            layout.write(writer)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MixPresentation {
    pub mix_presentation_id: MixPresentationId,
    pub language_labels: Vec<String>,
    pub mix_presentation_annotations: Vec<String>,
    pub sub_mixes: Vec<MixPresentationSubMix>,
}

impl MixPresentation {
    pub fn read(reader: &mut BitReader, audio_elements: &HashMap<AudioElementId, ()>) -> IamfResult<Self> {
        let (raw_id, _) = reader.read_uleb128()?;
        let mix_presentation_id = MixPresentationId(raw_id);

        let language_labels = read_labels(reader)?;
        let num_labels = language_labels.len() as u32;
        let mut mix_presentation_annotations = Vec::with_capacity(num_labels as usize);
        for _ in 0..num_labels {
            mix_presentation_annotations.push(reader.read_string()?);
        }

        let (num_sub_mixes, _) = reader.read_uleb128()?;
        if num_sub_mixes == 0 {
            return invalid_argument_error("mix presentation must declare at least one sub-mix");
        }
        let mut sub_mixes = Vec::with_capacity(num_sub_mixes as usize);
        for _ in 0..num_sub_mixes {
            sub_mixes.push(MixPresentationSubMix::read(reader, num_labels, audio_elements)?);
        }

        Ok(MixPresentation { mix_presentation_id, language_labels, mix_presentation_annotations, sub_mixes })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        if self.sub_mixes.is_empty() {
            return invalid_argument_error("mix presentation must declare at least one sub-mix");
        }
        if self.mix_presentation_annotations.len() != self.language_labels.len() {
            return invalid_argument_error("mix_presentation_annotations must have one entry per language label");
        }
        writer.write_uleb128(self.mix_presentation_id.0)?;
        write_labels(writer, &self.language_labels)?;
        for annotation in &self.mix_presentation_annotations {
            writer.write_string(annotation)?;
        }
        writer.write_uleb128(self.sub_mixes.len() as u32)?;
        for sub_mix in &self.sub_mixes {
            sub_mix.write(writer)?;
        }
        Ok(())
    }
}

/// Convenience constructor for a single-element, single-layout mix presentation; common enough
/// in tests and simple programs that building the nested structure by hand is needless friction.
pub fn new_simple_mix_presentation(
    mix_presentation_id: MixPresentationId,
    language_label: &str,
    annotation: &str,
    audio_element_id: AudioElementId,
    output_mix_gain_common: ParamDefinitionCommon,
    default_output_mix_gain: i16,
    layout: MixPresentationLayout,
) -> MixPresentation {
    let element_mix_gain = ParamDefinition::new_mix_gain(output_mix_gain_common.clone(), 0);
    let output_mix_gain = ParamDefinition::new_mix_gain(output_mix_gain_common, default_output_mix_gain);
    MixPresentation {
        mix_presentation_id,
        language_labels: vec![language_label.to_string()],
        mix_presentation_annotations: vec![annotation.to_string()],
        sub_mixes: vec![MixPresentationSubMix {
            audio_elements: vec![SubMixAudioElement {
                audio_element_id,
                element_annotations: vec![annotation.to_string()],
                rendering_config: RenderingConfig { headphones_rendering_mode: 0, extension_bytes: vec![] },
                element_mix_gain,
            }],
            output_mix_gain,
            layouts: vec![layout],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LebGenerator;
    use crate::ids::ParameterId;

    fn common(id: u32) -> ParamDefinitionCommon {
        use crate::param::Mode0Durations;
        ParamDefinitionCommon {
            parameter_id: ParameterId(id),
            parameter_rate: 48000,
            param_definition_mode: false,
            mode0: Some(Mode0Durations { duration: 8, constant_subblock_duration: 8, subblock_durations: vec![] }),
        }
    }

    fn audio_elements_with(id: AudioElementId) -> HashMap<AudioElementId, ()> {
        let mut m = HashMap::new();
        m.insert(id, ());
        m
    }

    #[test]
    fn verify_simple_mix_presentation_round_trip() {
        let audio_element_id = AudioElementId(1);
        let layout = MixPresentationLayout {
            layout: SoundSystemLayout::LoudspeakerSoundSystem(LoudspeakerLayout::Stereo),
            loudness_info: LoudnessInfo {
                integrated_loudness: -2304,
                digital_peak: -256,
                true_peak: Some(-200),
                anchored_loudness: None,
            },
        };
        let mix = new_simple_mix_presentation(
            MixPresentationId(1),
            "en-us",
            "Default mix",
            audio_element_id,
            common(10),
            0,
            layout,
        );
        let mut w = BitWriter::new(LebGenerator::default());
        mix.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        let decoded = MixPresentation::read(&mut r, &audio_elements_with(audio_element_id)).unwrap();
        assert_eq!(decoded, mix);
    }

    #[test]
    fn verify_unknown_audio_element_id_rejected() {
        let layout = MixPresentationLayout {
            layout: SoundSystemLayout::Binaural,
            loudness_info: LoudnessInfo {
                integrated_loudness: 0,
                digital_peak: 0,
                true_peak: None,
                anchored_loudness: None,
            },
        };
        let mix = new_simple_mix_presentation(
            MixPresentationId(2),
            "en-us",
            "Default mix",
            AudioElementId(99),
            common(11),
            0,
            layout,
        );
        let mut w = BitWriter::new(LebGenerator::default());
        mix.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        assert!(MixPresentation::read(&mut r, &HashMap::new()).is_err());
    }

    #[test]
    fn verify_anchored_loudness_round_trip() {
        let mut loudness = LoudnessInfo {
            integrated_loudness: -1024,
            digital_peak: -10,
            true_peak: None,
            anchored_loudness: Some(vec![
                AnchoredLoudnessElement { anchor_element: 0, anchored_loudness: -500 },
                AnchoredLoudnessElement { anchor_element: 1, anchored_loudness: -300 },
            ]),
        };
        let mut w = BitWriter::new(LebGenerator::default());
        loudness.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        let decoded = LoudnessInfo::read(&mut r).unwrap();
        assert_eq!(decoded, loudness);
        loudness.true_peak = Some(5);
        assert_ne!(decoded, loudness);
    }
}
