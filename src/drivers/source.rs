use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serialport::SerialPort;

use crate::drivers::error::TransportError;

/// Anything that hands out one newline-terminated frame per call.
///
/// Implementations block until a full line (or an error) is available.
pub trait Transport {
    fn read_line(&mut self) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read_line(&mut self) -> Result<String, TransportError> {
        (**self).read_line()
    }
}

/// Line framing over any buffered byte stream.
///
/// Bytes received before a timeout are kept, so a frame split across two reads
/// is still returned whole on the next call.
pub struct LineTransport<R> {
    reader: R,
    pending: Vec<u8>,
}

pub type SerialTransport = LineTransport<BufReader<Box<dyn SerialPort>>>;

impl<R: BufRead> LineTransport<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
        }
    }

    fn take_pending(&mut self) -> Result<String, TransportError> {
        let bytes = std::mem::take(&mut self.pending);
        String::from_utf8(bytes).map_err(|_| TransportError::Encoding)
    }
}

impl SerialTransport {
    pub fn open(port: &str, baud_rate: u32, timeout: Duration) -> Result<Self, TransportError> {
        let handle = serialport::new(port, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_owned(),
                source,
            })?;
        log::info!("opened {port} at {baud_rate} baud");
        Ok(Self::new(BufReader::new(handle)))
    }
}

impl<R: BufRead> Transport for LineTransport<R> {
    fn read_line(&mut self) -> Result<String, TransportError> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => Err(TransportError::Closed),
            // Either a full line or the tail of the stream.
            Ok(_) => self.take_pending(),
            Err(e) if e.kind() == ErrorKind::TimedOut => Err(TransportError::TimedOut),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}

/// Stand-in for the microcontroller firmware: two 16-bit ADC readings per line.
pub struct SimulatedTransport {
    rng: StdRng,
    t: f64,
    step_secs: f64,
    glitch_rate: f64,
}

impl SimulatedTransport {
    const FULL_SCALE: f64 = u16::MAX as f64;

    pub fn new(step: Duration) -> Self {
        Self::with_rng(StdRng::from_entropy(), step)
    }

    pub fn seeded(seed: u64, step: Duration) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), step)
    }

    fn with_rng(rng: StdRng, step: Duration) -> Self {
        Self {
            rng,
            t: 0.0,
            step_secs: step.as_secs_f64(),
            glitch_rate: 0.0,
        }
    }

    /// Fraction of lines emitted corrupted, to exercise the decode-failure path.
    pub fn with_glitch_rate(mut self, rate: f64) -> Self {
        self.glitch_rate = rate.clamp(0.0, 1.0);
        self
    }

    fn channel(&mut self, freq_hz: f64, phase: f64) -> u16 {
        let wave = 0.5 + 0.4 * (TAU * freq_hz * self.t + phase).sin();
        let noise = self.rng.gen_range(-0.02..0.02);
        ((wave + noise).clamp(0.0, 1.0) * Self::FULL_SCALE).round() as u16
    }
}

impl Transport for SimulatedTransport {
    fn read_line(&mut self) -> Result<String, TransportError> {
        let v1 = self.channel(1.0, 0.0);
        let v2 = self.channel(2.5, 1.3);
        self.t += self.step_secs;
        if self.glitch_rate > 0.0 && self.rng.gen_bool(self.glitch_rate) {
            return Ok(format!("{v1}?{v2}\n"));
        }
        Ok(format!("{v1};{v2}\n"))
    }
}

/// In-memory transport useful for tests and deterministic playback.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: VecDeque<Result<String, TransportError>>,
}

impl ScriptedTransport {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            queue: lines.into_iter().map(|l| Ok(l.into())).collect(),
        }
    }

    pub fn push_error(&mut self, error: TransportError) {
        self.queue.push_back(Err(error));
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Transport for ScriptedTransport {
    fn read_line(&mut self) -> Result<String, TransportError> {
        self.queue.pop_front().unwrap_or(Err(TransportError::Exhausted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::frame::decode_frame;
    use std::io::{self, Cursor, Read};

    /// Yields its chunks in order, with a timeout between each.
    struct Stuttering {
        chunks: VecDeque<Vec<u8>>,
        stall_next: bool,
    }

    impl Read for Stuttering {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.stall_next {
                self.stall_next = false;
                return Err(io::Error::new(ErrorKind::TimedOut, "stall"));
            }
            let Some(chunk) = self.chunks.pop_front() else {
                return Ok(0);
            };
            self.stall_next = true;
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn splits_stream_into_lines() {
        let mut transport = LineTransport::new(Cursor::new(b"1;2\n3;4\r\n5;6".to_vec()));
        assert_eq!(transport.read_line().unwrap(), "1;2\n");
        assert_eq!(transport.read_line().unwrap(), "3;4\r\n");
        assert_eq!(transport.read_line().unwrap(), "5;6");
        assert!(matches!(transport.read_line(), Err(TransportError::Closed)));
    }

    #[test]
    fn keeps_partial_line_across_timeouts() {
        let reader = Stuttering {
            chunks: VecDeque::from(vec![b"123".to_vec(), b"45;6".to_vec(), b"7\n".to_vec()]),
            stall_next: false,
        };
        let mut transport = LineTransport::new(BufReader::new(reader));
        assert!(matches!(transport.read_line(), Err(TransportError::TimedOut)));
        assert!(matches!(transport.read_line(), Err(TransportError::TimedOut)));
        assert_eq!(transport.read_line().unwrap(), "12345;67\n");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let bytes = vec![0xff, 0xfe, b'\n', b'1', b';', b'2', b'\n'];
        let mut transport = LineTransport::new(Cursor::new(bytes));
        assert!(matches!(transport.read_line(), Err(TransportError::Encoding)));
        assert_eq!(transport.read_line().unwrap(), "1;2\n");
    }

    #[test]
    fn simulated_lines_decode_within_range() {
        let mut transport = SimulatedTransport::seeded(7, Duration::from_millis(10));
        for _ in 0..100 {
            let frame = decode_frame(&transport.read_line().unwrap()).unwrap();
            assert!((0..=65535).contains(&frame.d1));
            assert!((0..=65535).contains(&frame.d2));
        }
    }

    #[test]
    fn simulated_glitches_fail_to_decode() {
        let mut transport =
            SimulatedTransport::seeded(7, Duration::from_millis(10)).with_glitch_rate(1.0);
        assert!(decode_frame(&transport.read_line().unwrap()).is_err());
    }

    #[test]
    fn scripted_transport_drains_then_reports_exhaustion() {
        let mut transport = ScriptedTransport::new(["1;1"]);
        transport.push_error(TransportError::TimedOut);
        assert_eq!(transport.remaining(), 2);
        assert_eq!(transport.read_line().unwrap(), "1;1");
        assert!(matches!(transport.read_line(), Err(TransportError::TimedOut)));
        assert!(matches!(transport.read_line(), Err(TransportError::Exhausted)));
    }
}
