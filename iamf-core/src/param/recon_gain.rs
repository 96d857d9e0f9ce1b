// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recon-gain subblock data: the fixed channel-to-bit mapping and the per-layer gain vector it
//! gates.

use bitflags::bitflags;

use crate::errors::IamfResult;
use crate::io::{BitReader, BitWriter};

bitflags! {
    /// The fixed IAMF channel→bit mapping. Bit 1 (center) and the demixed-L2 bit are never set
    /// by a conforming encoder; a 7.1.4 layer sets every other bit.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ReconGainFlags: u16 {
        const L   = 1 << 0;
        const R   = 1 << 2;
        const LS  = 1 << 3;
        const RS  = 1 << 4;
        const LTF = 1 << 5;
        const RTF = 1 << 6;
        const LRS = 1 << 7;
        const RRS = 1 << 8;
        const LTB = 1 << 9;
        const RTB = 1 << 10;
        const LFE = 1 << 11;
    }
}

/// One layer's recon-gain contribution: which channels carry a gain, and the 12-slot gain
/// array indexed by the same bit positions as [`ReconGainFlags`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReconGainElement {
    pub flags: ReconGainFlags,
    pub recon_gain: [u8; 12],
}

impl ReconGainElement {
    pub fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let (flag_bits, _) = reader.read_uleb128()?;
        let flags = ReconGainFlags::from_bits_truncate(flag_bits as u16);
        let mut recon_gain = [0u8; 12];
        for bit in 0..12u8 {
            if flags.bits() & (1 << bit) != 0 {
                recon_gain[bit as usize] = reader.read_unsigned(8)? as u8;
            }
        }
        Ok(ReconGainElement { flags, recon_gain })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        writer.write_uleb128(u32::from(self.flags.bits()))?;
        for bit in 0..12u8 {
            if self.flags.bits() & (1 << bit) != 0 {
                writer.write_unsigned(u64::from(self.recon_gain[bit as usize]), 8)?;
            }
        }
        Ok(())
    }
}

/// A recon-gain subblock: one [`ReconGainElement`] per audio-element layer that has
/// `recon_gain_is_present`, in layer order; layers without it contribute no element and no bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconGainSubblock {
    pub layer_elements: Vec<Option<ReconGainElement>>,
}

impl ReconGainSubblock {
    pub fn read(reader: &mut BitReader, layer_recon_gain_present: &[bool]) -> IamfResult<Self> {
        let mut layer_elements = Vec::with_capacity(layer_recon_gain_present.len());
        for &present in layer_recon_gain_present {
            if present {
                layer_elements.push(Some(ReconGainElement::read(reader)?));
            } else {
                layer_elements.push(None);
            }
        }
        Ok(ReconGainSubblock { layer_elements })
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        for element in &self.layer_elements {
            if let Some(element) = element {
                element.write(writer)?;
            }
        }
        Ok(())
    }
}
