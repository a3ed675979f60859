use crate::drivers::error::ConversionError;
use crate::drivers::frame::RawFrame;

/// Linear ADC scaling: `voltage = raw / resolution * vref`, per channel.
///
/// Readings above `resolution` map above `vref`; nothing is clamped.
pub fn convert(
    raw1: i64,
    raw2: i64,
    vref: f64,
    resolution: f64,
) -> Result<(f64, f64), ConversionError> {
    check_resolution(resolution)?;
    Ok((
        raw1 as f64 / resolution * vref,
        raw2 as f64 / resolution * vref,
    ))
}

fn check_resolution(resolution: f64) -> Result<(), ConversionError> {
    if resolution.is_finite() && resolution > 0.0 {
        Ok(())
    } else {
        Err(ConversionError::InvalidResolution(resolution))
    }
}

/// Conversion parameters validated once up front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitConverter {
    vref: f64,
    resolution: f64,
}

impl UnitConverter {
    pub fn new(vref: f64, resolution: f64) -> Result<Self, ConversionError> {
        check_resolution(resolution)?;
        Ok(Self { vref, resolution })
    }

    pub fn to_volts(&self, frame: RawFrame) -> Result<(f64, f64), ConversionError> {
        convert(frame.d1, frame.d2, self.vref, self.resolution)
    }
}
