// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `ids` module defines newtypes over the `uleb128`-encoded identifiers that cross-reference
//! descriptor OBUs and parameter/audio data. Keeping each id kind distinct at the type level
//! rules out an entire class of bug where, say, a `substream_id` is accidentally used to look up
//! a `mix_presentation_id` table.

use std::fmt;

macro_rules! iamf_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $name(value)
            }
        }
    };
}

iamf_id!(CodecConfigId, "Identifies a `codec_config_obu` within an IA sequence.");
iamf_id!(AudioElementId, "Identifies an `audio_element_obu` within an IA sequence.");
iamf_id!(MixPresentationId, "Identifies a `mix_presentation_obu` within an IA sequence.");
iamf_id!(ParameterId, "Identifies a `param_definition` and the `parameter_block_obu`s that carry its data.");
iamf_id!(SubstreamId, "Identifies one substream's data within an audio substream OBU.");
