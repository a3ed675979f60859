use thiserror::Error;

/// Failure to read a line from the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out waiting for a complete line")]
    TimedOut,
    #[error("received bytes are not valid UTF-8")]
    Encoding,
    #[error("transport closed by the remote end")]
    Closed,
    #[error("no more scripted lines")]
    Exhausted,
}

/// A frame line could not be turned into a raw pair. Always recoverable.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty line")]
    Empty,
    #[error("missing ';' delimiter in {0:?}")]
    MissingDelimiter(String),
    #[error("unexpected extra field in {0:?}")]
    UnexpectedField(String),
    #[error("field {index} is not an integer: {text:?}")]
    InvalidField { index: usize, text: String },
    #[error("unreadable frame: {0}")]
    Transport(#[from] TransportError),
}

/// Raw-to-voltage scaling with no defined result. Always fatal.
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("ADC resolution must be a positive number, got {0}")]
    InvalidResolution(f64),
}

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("window capacity must be greater than zero")]
    InvalidCapacity,
    #[error("time scale must be a positive number of seconds, got {0}")]
    InvalidTimeScale(f64),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Plot(format!("{value:?}"))
    }
}

impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Plot(value.to_string())
    }
}
