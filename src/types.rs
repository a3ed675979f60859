// src/types.rs
use serde::Deserialize;

/// Where frames come from.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    Simulation,
    #[default]
    Hardware,
}

/// The two analog inputs carried by every frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Channel {
    One,
    Two,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::One, Channel::Two];

    pub fn label(self) -> &'static str {
        match self {
            Channel::One => "Channel 1",
            Channel::Two => "Channel 2",
        }
    }
}
