use std::time::{SystemTime, UNIX_EPOCH};

use crate::drivers::buffer::Sample;
use crate::drivers::convert::UnitConverter;
use crate::drivers::error::{ConversionError, DecodeError};
use crate::drivers::frame::{decode_frame, RawFrame};
use crate::drivers::source::Transport;

/// Source of receipt timestamps, in seconds.
pub trait Clock {
    fn now_secs(&mut self) -> f64;
}

/// Wall-clock seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&mut self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Deterministic clock for tests: `start`, `start + step`, `start + 2 * step`, ...
#[derive(Clone, Copy, Debug)]
pub struct ManualClock {
    next: f64,
    step: f64,
}

impl ManualClock {
    pub fn new(start: f64, step: f64) -> Self {
        Self { next: start, step }
    }
}

impl Clock for ManualClock {
    fn now_secs(&mut self) -> f64 {
        let now = self.next;
        self.next += self.step;
        now
    }
}

/// Counters that make zero-substitution visible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AcquisitionStats {
    pub frames_ok: u64,
    pub decode_failures: u64,
    pub last_error: Option<String>,
}

impl AcquisitionStats {
    pub fn total(&self) -> u64 {
        self.frames_ok + self.decode_failures
    }
}

/// Turns one transport line into one timestamped sample.
pub struct AcquisitionLoop<T, C> {
    transport: T,
    converter: UnitConverter,
    clock: C,
    stats: AcquisitionStats,
}

impl<T: Transport, C: Clock> AcquisitionLoop<T, C> {
    pub fn new(transport: T, converter: UnitConverter, clock: C) -> Self {
        Self {
            transport,
            converter,
            clock,
            stats: AcquisitionStats::default(),
        }
    }

    pub fn stats(&self) -> &AcquisitionStats {
        &self.stats
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Blocks on the transport for one line.
    ///
    /// An unreadable or malformed line yields a 0 V sample instead of an error;
    /// only a conversion failure is returned.
    pub fn acquire_one(&mut self) -> Result<Sample, ConversionError> {
        let raw = match self.read_frame() {
            Ok(frame) => {
                self.stats.frames_ok += 1;
                frame
            }
            Err(err) => {
                self.stats.decode_failures += 1;
                log::warn!(
                    "dropping frame ({} so far): {err}",
                    self.stats.decode_failures
                );
                self.stats.last_error = Some(err.to_string());
                RawFrame::SENTINEL
            }
        };
        let timestamp = self.clock.now_secs();
        let (channel1, channel2) = self.converter.to_volts(raw)?;
        Ok(Sample {
            timestamp,
            channel1,
            channel2,
        })
    }

    fn read_frame(&mut self) -> Result<RawFrame, DecodeError> {
        let line = self.transport.read_line()?;
        decode_frame(&line)
    }
}
