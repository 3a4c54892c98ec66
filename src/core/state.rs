//! Robot pose on the arena grid.

use serde::{Deserialize, Serialize};

use super::bearing::Bearing;
use super::cell::{Cell, CoordinateFrame};
use super::primitive::Primitive;

/// Default start cell: centre of the 3×3 start zone in the bottom-left corner.
pub const START_CELL: Cell = Cell::new(1, 18);

/// Default start bearing.
pub const START_BEARING: Bearing = Bearing::North;

/// Robot position and heading.
///
/// During planning only the movement compiler advances this, one primitive
/// at a time, so the value always mirrors where the physical robot should be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotState {
    /// Current cell (internal frame)
    pub position: Cell,
    /// Current heading
    pub bearing: Bearing,
}

impl Default for RobotState {
    fn default() -> Self {
        Self::start()
    }
}

impl RobotState {
    /// Create a new state
    pub fn new(position: Cell, bearing: Bearing) -> Self {
        Self { position, bearing }
    }

    /// The mission start state.
    pub fn start() -> Self {
        Self::new(START_CELL, START_BEARING)
    }

    /// Advance the state by one primitive.
    pub fn apply(&mut self, primitive: Primitive) {
        match primitive {
            Primitive::Forward => self.position = self.position.step(self.bearing),
            Primitive::Reverse => self.position = self.position.step(self.bearing.reverse()),
            Primitive::TurnLeft => self.bearing = self.bearing.counter_clockwise(),
            Primitive::TurnRight => self.bearing = self.bearing.clockwise(),
            Primitive::Stop => {}
        }
    }

    /// Snapshot with the position expressed in `frame`.
    pub fn in_frame(&self, frame: CoordinateFrame) -> RobotState {
        RobotState::new(frame.convert(self.position), self.bearing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_state() {
        let s = RobotState::start();
        assert_eq!(s.position, Cell::new(1, 18));
        assert_eq!(s.bearing, Bearing::North);
        assert_eq!(s.in_frame(CoordinateFrame::BottomLeft).position, Cell::new(1, 1));
    }

    #[test]
    fn test_apply_primitives() {
        let mut s = RobotState::new(Cell::new(5, 5), Bearing::North);

        s.apply(Primitive::Forward);
        assert_eq!(s.position, Cell::new(5, 4));

        s.apply(Primitive::Reverse);
        assert_eq!(s.position, Cell::new(5, 5));
        assert_eq!(s.bearing, Bearing::North);

        s.apply(Primitive::TurnRight);
        assert_eq!(s.bearing, Bearing::East);
        assert_eq!(s.position, Cell::new(5, 5));

        s.apply(Primitive::Forward);
        assert_eq!(s.position, Cell::new(6, 5));

        s.apply(Primitive::TurnLeft);
        s.apply(Primitive::TurnLeft);
        assert_eq!(s.bearing, Bearing::West);

        let before = s;
        s.apply(Primitive::Stop);
        assert_eq!(s, before);
    }
}
