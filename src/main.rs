// src/main.rs
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use voltscope::drivers::{
    write_scope_png, AcquisitionLoop, PlotStyle, ScopePipeline, SerialTransport,
    SimulatedTransport, SystemClock, TickSchedule, Transport,
};
use voltscope::gui::ScopeApp;
use voltscope::headless::run_headless;
use voltscope::{Cli, ConnectionMode, ScopeConfig};

fn open_transport(config: &ScopeConfig) -> Result<Box<dyn Transport>> {
    match config.mode {
        ConnectionMode::Simulation => {
            log::info!("simulation mode, no serial port opened");
            let simulated = SimulatedTransport::new(config.tick_interval()?)
                .with_glitch_rate(config.glitch_rate);
            Ok(Box::new(simulated))
        }
        ConnectionMode::Hardware => {
            let port = SerialTransport::open(&config.port, config.baud_rate, config.read_timeout())
                .with_context(|| format!("cannot start acquisition on {}", config.port))?;
            Ok(Box::new(port))
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = cli.resolve().context("invalid configuration")?;
    log::info!(
        "window {} s / {} samples, {} V over {} counts",
        config.time_scale,
        config.frames_amount,
        config.ref_voltage,
        config.resolution
    );

    // Fatal setup errors surface here, before any plot exists.
    let transport = open_transport(&config)?;
    let acquisition = AcquisitionLoop::new(transport, config.converter()?, SystemClock);
    let mut pipeline =
        ScopePipeline::new(acquisition, config.frames_amount, config.default_viewport())?
            .with_max_ticks(config.max_ticks);
    let mut schedule = TickSchedule::for_window(config.time_scale, config.frames_amount)?;

    if cli.headless {
        if config.max_ticks.is_none() {
            log::warn!("headless run without --ticks never ends on its own");
        }
        let frame = run_headless(&mut pipeline, &mut schedule)?;
        if let Some(path) = &cli.snapshot {
            write_scope_png(path, &frame, pipeline.viewport().bounds(), &PlotStyle::default())?;
            log::info!("snapshot written to {}", path.display());
        }
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 600.0])
            .with_title("voltscope"),
        ..Default::default()
    };
    let (ref_voltage, time_scale) = (config.ref_voltage, config.time_scale);
    eframe::run_native(
        "voltscope",
        options,
        Box::new(move |cc| {
            Box::new(ScopeApp::new(cc, pipeline, schedule, ref_voltage, time_scale))
        }),
    )
    .map_err(|e| anyhow!("window closed with an error: {e}"))
}
