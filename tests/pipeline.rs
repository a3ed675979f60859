use voltscope::drivers::{
    AcquisitionLoop, ManualClock, ScopePipeline, ScriptedTransport, UnitConverter,
};
use voltscope::{Channel, ScopeConfig};

fn scope(
    config: &ScopeConfig,
    lines: &[&str],
) -> ScopePipeline<ScriptedTransport, ManualClock> {
    let acquisition = AcquisitionLoop::new(
        ScriptedTransport::new(lines.iter().copied()),
        config.converter().unwrap(),
        ManualClock::new(0.0, 1.0),
    );
    ScopePipeline::new(acquisition, config.frames_amount, config.default_viewport()).unwrap()
}

#[test]
fn window_of_three_with_one_corrupt_frame() {
    let config = ScopeConfig {
        frames_amount: 3,
        ..ScopeConfig::default()
    };
    let mut scope = scope(&config, &["0;0", "32767;65535", "65535;0", "garbage"]);
    let mut lengths = Vec::new();
    for _ in 0..4 {
        lengths.push(scope.tick().unwrap().len());
    }
    assert_eq!(lengths, vec![1, 2, 3, 3]);

    let samples: Vec<_> = scope.window().iter().copied().collect();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].timestamp, 1.0);
    assert!((samples[0].channel1 - 1.65).abs() < 1e-3);
    assert!((samples[0].channel2 - 3.3).abs() < 1e-9);
    assert_eq!(samples[1].timestamp, 2.0);
    assert!((samples[1].channel1 - 3.3).abs() < 1e-9);
    assert_eq!(samples[1].channel2, 0.0);
    assert_eq!(samples[2].timestamp, 3.0);
    assert_eq!((samples[2].channel1, samples[2].channel2), (0.0, 0.0));

    let frame = scope.latest_frame();
    for channel in Channel::ALL {
        let xs: Vec<f64> = frame.series(channel).iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }
    assert_eq!(scope.stats().decode_failures, 1);
}

#[test]
fn bad_resolution_is_fatal_before_acquisition() {
    let config = ScopeConfig {
        resolution: -1.0,
        ..ScopeConfig::default()
    };
    assert!(config.validate().is_err());
    assert!(UnitConverter::new(config.ref_voltage, config.resolution).is_err());
}

#[test]
fn viewport_starts_at_device_defaults_and_self_corrects() {
    let config = ScopeConfig::default();
    let mut scope = scope(&config, &[]);
    scope.viewport_mut().set_y_min(5.0);
    scope.viewport_mut().set_y_max(2.0);
    let bounds = scope.viewport().bounds();
    assert_eq!(bounds.y_min, 5.0);
    assert!((bounds.y_max - 5.01).abs() < 1e-12);
    assert_eq!(bounds.x_max, config.time_scale);
}
