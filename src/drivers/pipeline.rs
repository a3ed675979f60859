use crate::drivers::acquisition::{AcquisitionLoop, AcquisitionStats, Clock};
use crate::drivers::buffer::{SlidingWindowBuffer, TimeSeriesFrame};
use crate::drivers::error::{ConversionError, ScopeError};
use crate::drivers::source::Transport;
use crate::drivers::viewport::{ViewportBounds, ViewportController};

/// Owns everything one render tick touches: acquisition, the sample window
/// and the viewport.
pub struct ScopePipeline<T, C> {
    acquisition: AcquisitionLoop<T, C>,
    window: SlidingWindowBuffer,
    viewport: ViewportController,
    ticks: u64,
    max_ticks: Option<u64>,
}

impl<T: Transport, C: Clock> ScopePipeline<T, C> {
    pub fn new(
        acquisition: AcquisitionLoop<T, C>,
        capacity: usize,
        viewport: ViewportBounds,
    ) -> Result<Self, ScopeError> {
        Ok(Self {
            acquisition,
            window: SlidingWindowBuffer::new(capacity)?,
            viewport: ViewportController::new(viewport),
            ticks: 0,
            max_ticks: None,
        })
    }

    /// Stop after a fixed number of ticks.
    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Acquire one sample, append it, and return both channels relative to the
    /// oldest retained sample.
    pub fn tick(&mut self) -> Result<TimeSeriesFrame, ConversionError> {
        let sample = self.acquisition.acquire_one()?;
        self.window.append(sample);
        self.ticks += 1;
        let frame = self.window.to_relative_time_series();
        log::debug!(
            "tick {}: {:.3} V / {:.3} V, {} points over {:.3} s",
            self.ticks,
            sample.channel1,
            sample.channel2,
            frame.len(),
            frame.duration_seconds()
        );
        Ok(frame)
    }

    /// Current window without acquiring.
    pub fn latest_frame(&self) -> TimeSeriesFrame {
        self.window.to_relative_time_series()
    }

    pub fn is_finished(&self) -> bool {
        self.max_ticks.is_some_and(|max| self.ticks >= max)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn window(&self) -> &SlidingWindowBuffer {
        &self.window
    }

    pub fn stats(&self) -> &AcquisitionStats {
        self.acquisition.stats()
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }
}
