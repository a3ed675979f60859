// src/drivers/mod.rs
pub mod acquisition;
pub mod buffer;
pub mod convert;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod plot;
pub mod schedule;
pub mod source;
pub mod viewport;

pub use acquisition::{AcquisitionLoop, AcquisitionStats, Clock, ManualClock, SystemClock};
pub use buffer::{Sample, SlidingWindowBuffer, TimeSeriesFrame};
pub use convert::{convert, UnitConverter};
pub use error::{ConversionError, DecodeError, ScopeError, TransportError};
pub use frame::{decode_frame, RawFrame};
pub use pipeline::ScopePipeline;
pub use plot::{render_scope_png, write_scope_png, PlotStyle};
pub use schedule::{tick_interval, TickSchedule};
pub use source::{
    LineTransport, ScriptedTransport, SerialTransport, SimulatedTransport, Transport,
};
pub use viewport::{ViewportBounds, ViewportController, MIN_Y_SPAN};
