//! Discrete drive primitives understood by the robot.

use serde::{Deserialize, Serialize};

/// One drive command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Primitive {
    /// Drive one cell along the current bearing
    Forward,
    /// Drive one cell against the current bearing
    Reverse,
    /// Rotate 90° counter-clockwise in place
    TurnLeft,
    /// Rotate 90° clockwise in place
    TurnRight,
    /// Hold position; closes a leg
    Stop,
}

impl Primitive {
    /// Does this primitive change the robot's cell?
    #[inline]
    pub fn is_translation(self) -> bool {
        matches!(self, Primitive::Forward | Primitive::Reverse)
    }

    /// Command string used by the legacy serial link.
    ///
    /// Translations and turns carry a fixed `010` magnitude.
    pub fn legacy_code(self) -> &'static str {
        match self {
            Primitive::Forward => "w010",
            Primitive::Reverse => "s010",
            Primitive::TurnLeft => "j010",
            Primitive::TurnRight => "k010",
            Primitive::Stop => "x",
        }
    }

    /// Primitive for a legacy serial command string.
    pub fn from_legacy_code(code: &str) -> Option<Primitive> {
        match code.trim() {
            "w010" => Some(Primitive::Forward),
            "s010" => Some(Primitive::Reverse),
            "j010" => Some(Primitive::TurnLeft),
            "k010" => Some(Primitive::TurnRight),
            "x" => Some(Primitive::Stop),
            _ => None,
        }
    }

    /// Does this primitive rotate the robot?
    #[inline]
    pub fn is_turn(self) -> bool {
        matches!(self, Primitive::TurnLeft | Primitive::TurnRight)
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Primitive::Forward => "FORWARD",
            Primitive::Reverse => "REVERSE",
            Primitive::TurnLeft => "TURN_LEFT",
            Primitive::TurnRight => "TURN_RIGHT",
            Primitive::Stop => "STOP",
        };
        f.write_str(name)
    }
}
