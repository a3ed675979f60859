use crate::drivers::error::DecodeError;

const DELIMITER: char = ';';

/// One decoded wire frame: the two raw ADC readings, in channel order.
///
/// Values are not range-checked against the ADC resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame {
    pub d1: i64,
    pub d2: i64,
}

impl RawFrame {
    /// Substituted for any frame that fails to decode.
    pub const SENTINEL: RawFrame = RawFrame { d1: 0, d2: 0 };

    pub fn new(d1: i64, d2: i64) -> Self {
        Self { d1, d2 }
    }
}

/// Parses `"<int>;<int>"`. Surrounding whitespace and the line terminator are ignored.
pub fn decode_frame(line: &str) -> Result<RawFrame, DecodeError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(DecodeError::Empty);
    }
    let mut fields = line.split(DELIMITER);
    let first = fields.next().unwrap_or_default();
    let Some(second) = fields.next() else {
        return Err(DecodeError::MissingDelimiter(line.to_owned()));
    };
    if fields.next().is_some() {
        return Err(DecodeError::UnexpectedField(line.to_owned()));
    }
    Ok(RawFrame {
        d1: parse_field(0, first)?,
        d2: parse_field(1, second)?,
    })
}

fn parse_field(index: usize, text: &str) -> Result<i64, DecodeError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| DecodeError::InvalidField {
            index,
            text: text.to_owned(),
        })
}
