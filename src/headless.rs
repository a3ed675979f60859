// src/headless.rs
use crate::drivers::{Clock, ScopeError, ScopePipeline, TickSchedule, TimeSeriesFrame, Transport};

/// Runs the tick loop on the schedule without a window until the pipeline
/// reaches its tick limit. Without a limit this only returns on error.
pub fn run_headless<T: Transport, C: Clock>(
    pipeline: &mut ScopePipeline<T, C>,
    schedule: &mut TickSchedule,
) -> Result<TimeSeriesFrame, ScopeError> {
    let mut frame = pipeline.latest_frame();
    while !pipeline.is_finished() {
        schedule.wait();
        frame = pipeline.tick()?;
    }
    let stats = pipeline.stats();
    log::info!(
        "headless run done: {} ticks, {} frames, {} dropped",
        pipeline.ticks(),
        stats.frames_ok,
        stats.decode_failures
    );
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{
        AcquisitionLoop, ManualClock, ScriptedTransport, UnitConverter, ViewportBounds,
    };
    use std::time::Duration;

    #[test]
    fn stops_at_tick_limit() {
        let acquisition = AcquisitionLoop::new(
            ScriptedTransport::new(["100;200", "300;400", "500;600", "700;800"]),
            UnitConverter::new(3.3, 65535.0).unwrap(),
            ManualClock::new(0.0, 0.001),
        );
        let mut pipeline = ScopePipeline::new(acquisition, 2, ViewportBounds::for_device(3.3, 0.002))
            .unwrap()
            .with_max_ticks(Some(3));
        let mut schedule = TickSchedule::new(Duration::from_millis(1));
        let frame = run_headless(&mut pipeline, &mut schedule).unwrap();
        assert_eq!(pipeline.ticks(), 3);
        assert_eq!(frame.len(), 2);
        assert_eq!(pipeline.stats().frames_ok, 3);
        assert_eq!(pipeline.window().newest().map(|s| s.timestamp), Some(0.002));
    }
}
