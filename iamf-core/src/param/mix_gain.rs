// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mix-gain animation curves and their deterministic interpolation.

use crate::errors::{invalid_argument_error, IamfResult};
use crate::io::{BitReader, BitWriter};

/// A mix-gain subblock's animation curve. Values are Q7.8 dB fixed point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MixGainAnimation {
    Step { start_point_value: i16 },
    Linear { start_point_value: i16, end_point_value: i16 },
    Bezier { start_point_value: i16, end_point_value: i16, control_point_value: i16, control_point_relative_time: u8 },
}

impl MixGainAnimation {
    pub fn read(reader: &mut BitReader) -> IamfResult<Self> {
        let (animation_type, _) = reader.read_uleb128()?;
        match animation_type {
            0 => Ok(MixGainAnimation::Step { start_point_value: reader.read_signed16()? }),
            1 => {
                let start_point_value = reader.read_signed16()?;
                let end_point_value = reader.read_signed16()?;
                Ok(MixGainAnimation::Linear { start_point_value, end_point_value })
            }
            2 => {
                let start_point_value = reader.read_signed16()?;
                let end_point_value = reader.read_signed16()?;
                let control_point_value = reader.read_signed16()?;
                let control_point_relative_time = reader.read_unsigned(8)? as u8;
                Ok(MixGainAnimation::Bezier {
                    start_point_value,
                    end_point_value,
                    control_point_value,
                    control_point_relative_time,
                })
            }
            _ => invalid_argument_error("animation_type must be 0, 1, or 2"),
        }
    }

    pub fn write(&self, writer: &mut BitWriter) -> IamfResult<()> {
        match self {
            MixGainAnimation::Step { start_point_value } => {
                writer.write_uleb128(0)?;
                writer.write_signed16(*start_point_value)
            }
            MixGainAnimation::Linear { start_point_value, end_point_value } => {
                writer.write_uleb128(1)?;
                writer.write_signed16(*start_point_value)?;
                writer.write_signed16(*end_point_value)
            }
            MixGainAnimation::Bezier {
                start_point_value,
                end_point_value,
                control_point_value,
                control_point_relative_time,
            } => {
                writer.write_uleb128(2)?;
                writer.write_signed16(*start_point_value)?;
                writer.write_signed16(*end_point_value)?;
                writer.write_signed16(*control_point_value)?;
                writer.write_unsigned(u64::from(*control_point_relative_time), 8)
            }
        }
    }

    /// Evaluates the curve at `target`, which must lie within `[start, end]`.
    pub fn interpolate(&self, start: i64, end: i64, target: i64) -> IamfResult<i16> {
        if target < start || target > end {
            return invalid_argument_error("interpolation target outside [start, end]");
        }
        match *self {
            MixGainAnimation::Step { start_point_value } => Ok(start_point_value),
            MixGainAnimation::Linear { start_point_value, end_point_value } => {
                if end == start {
                    return Ok(start_point_value);
                }
                let t = (target - start) as f64 / (end - start) as f64;
                let value = start_point_value as f64 + (end_point_value - start_point_value) as f64 * t;
                Ok(value.round() as i16)
            }
            MixGainAnimation::Bezier {
                start_point_value,
                end_point_value,
                control_point_value,
                control_point_relative_time,
            } => {
                if end == start {
                    return Ok(start_point_value);
                }
                let t = (target - start) as f64 / (end - start) as f64;
                let alpha = f64::from(control_point_relative_time) / 256.0;
                let s = solve_bezier_parameter(alpha, t);
                let one_minus_s = 1.0 - s;
                let value = one_minus_s * one_minus_s * start_point_value as f64
                    + 2.0 * s * one_minus_s * control_point_value as f64
                    + s * s * end_point_value as f64;
                Ok(value.round() as i16)
            }
        }
    }
}

/// Solves `(1-s)^2*0 + 2s(1-s)*alpha + s^2*1 == t` for `s ∈ [0, 1]` via bisection; the cubic in
/// `s` is monotonic over `[0, 1]` for `alpha ∈ [0, 1]`, so bisection is exact to float precision
/// without needing the closed-form quadratic roots.
fn solve_bezier_parameter(alpha: f64, t: f64) -> f64 {
    let f = |s: f64| {
        let one_minus_s = 1.0 - s;
        2.0 * s * one_minus_s * alpha + s * s
    };

    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    for _ in 0..60 {
        let mid = (lo + hi) / 2.0;
        if f(mid) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    ((lo + hi) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LebGenerator;

    #[test]
    fn verify_linear_interpolation_scenario_s2() {
        let anim = MixGainAnimation::Linear { start_point_value: 0, end_point_value: 1000 };
        assert_eq!(anim.interpolate(0, 100, 50).unwrap(), 500);
    }

    #[test]
    fn verify_bezier_interpolation_scenario_s2() {
        let anim = MixGainAnimation::Bezier {
            start_point_value: 0,
            end_point_value: 768,
            control_point_value: 384,
            control_point_relative_time: 192,
        };
        assert_eq!(anim.interpolate(0, 100, 50).unwrap(), 293);
    }

    #[test]
    fn verify_interpolation_out_of_range_errors() {
        let anim = MixGainAnimation::Step { start_point_value: 5 };
        assert!(anim.interpolate(0, 100, 101).is_err());
        assert!(anim.interpolate(0, 100, -1).is_err());
    }

    #[test]
    fn verify_step_animation_round_trip() {
        let anim = MixGainAnimation::Step { start_point_value: -42 };
        let mut w = BitWriter::new(LebGenerator::default());
        anim.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        assert_eq!(MixGainAnimation::read(&mut r).unwrap(), anim);
    }

    #[test]
    fn verify_bezier_animation_round_trip() {
        let anim = MixGainAnimation::Bezier {
            start_point_value: 0,
            end_point_value: 768,
            control_point_value: 384,
            control_point_relative_time: 192,
        };
        let mut w = BitWriter::new(LebGenerator::default());
        anim.write(&mut w).unwrap();
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        assert_eq!(MixGainAnimation::read(&mut r).unwrap(), anim);
    }
}
