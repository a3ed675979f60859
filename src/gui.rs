// src/gui.rs
use std::time::Instant;

use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints};

use crate::drivers::{Clock, ScopePipeline, TickSchedule, TimeSeriesFrame, Transport};
use crate::types::Channel;

const CHANNEL_COLORS: [Color32; 2] = [Color32::from_rgb(0, 255, 255), Color32::YELLOW];

/// Live view: fires render ticks on the schedule and draws the window with
/// user-adjustable bounds.
pub struct ScopeApp<T, C> {
    pipeline: ScopePipeline<T, C>,
    schedule: TickSchedule,
    frame: TimeSeriesFrame,
    ref_voltage: f64,
    time_scale: f64,
    fatal: Option<String>,
    closing: bool,
}

impl<T: Transport, C: Clock> ScopeApp<T, C> {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        mut pipeline: ScopePipeline<T, C>,
        schedule: TickSchedule,
        ref_voltage: f64,
        time_scale: f64,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        pipeline
            .viewport_mut()
            .set_refresh_hook(move |_| ctx.request_repaint());
        Self {
            frame: pipeline.latest_frame(),
            pipeline,
            schedule,
            ref_voltage,
            time_scale,
            fatal: None,
            closing: false,
        }
    }

    fn run_due_tick(&mut self, ctx: &egui::Context) {
        if self.fatal.is_some() || self.pipeline.is_finished() {
            return;
        }
        if !self.schedule.poll(Instant::now()) {
            return;
        }
        match self.pipeline.tick() {
            Ok(frame) => self.frame = frame,
            Err(err) => {
                log::error!("acquisition stopped: {err}");
                self.fatal = Some(err.to_string());
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn bounds_controls(&mut self, ui: &mut egui::Ui) {
        let bounds = self.pipeline.viewport().bounds();
        let v = self.ref_voltage.abs().max(0.1);
        let (mut y_min, mut y_max, mut x_max) = (bounds.y_min, bounds.y_max, bounds.x_max);

        ui.label("VIEWPORT");
        if ui
            .add(egui::Slider::new(&mut y_min, -v..=2.0 * v).text("Y min (V)"))
            .changed()
        {
            self.pipeline.viewport_mut().set_y_min(y_min);
        }
        if ui
            .add(egui::Slider::new(&mut y_max, -v..=2.0 * v).text("Y max (V)"))
            .changed()
        {
            self.pipeline.viewport_mut().set_y_max(y_max);
        }
        if ui
            .add(
                egui::Slider::new(&mut x_max, 0.1..=5.0 * self.time_scale.max(0.1))
                    .text("X max (s)"),
            )
            .changed()
        {
            self.pipeline.viewport_mut().set_x_max(x_max);
        }
    }

    fn status(&self, ui: &mut egui::Ui) {
        let stats = self.pipeline.stats();
        ui.label(format!("Ticks: {}", self.pipeline.ticks()));
        ui.label(format!("Frames: {}", stats.frames_ok));
        let dropped = egui::RichText::new(format!("Dropped: {}", stats.decode_failures));
        ui.label(if stats.decode_failures > 0 {
            dropped.color(Color32::YELLOW)
        } else {
            dropped
        });
        if let Some(err) = &stats.last_error {
            ui.label(egui::RichText::new(err).small().color(Color32::GRAY));
        }
        if let Some(fatal) = &self.fatal {
            ui.label(egui::RichText::new(fatal).color(Color32::RED));
        }
    }
}

impl<T: Transport, C: Clock> eframe::App for ScopeApp<T, C> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_due_tick(ctx);
        if self.pipeline.is_finished() && !self.closing {
            log::info!("reached {} ticks, closing", self.pipeline.ticks());
            self.closing = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::SidePanel::left("controls").min_width(220.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("voltscope");
            ui.separator();
            self.bounds_controls(ui);
            ui.add_space(20.0);
            ui.separator();
            self.status(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Real-time Data from Serial Port");
            let bounds = self.pipeline.viewport().bounds();
            Plot::new("scope_plot")
                .legend(Legend::default())
                .x_axis_label("Time (s)")
                .y_axis_label("Voltage (V)")
                .show_grid(true)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [0.0, bounds.y_min],
                        [bounds.x_max, bounds.y_max],
                    ));
                    for (channel, color) in Channel::ALL.into_iter().zip(CHANNEL_COLORS) {
                        let points = PlotPoints::new(self.frame.series(channel).to_vec());
                        plot_ui.line(Line::new(points).name(channel.label()).color(color));
                    }
                });
        });

        if !self.closing && self.fatal.is_none() {
            ctx.request_repaint_after(self.schedule.time_until_due(Instant::now()));
        }
    }
}
