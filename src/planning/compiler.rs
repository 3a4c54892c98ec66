//! Route to drive-primitive compilation.
//!
//! Walks a route cell by cell and emits the primitives the robot needs,
//! advancing a [`RobotState`] in lockstep so every emitted primitive has a
//! matching pose snapshot.

use crate::core::{Bearing, Cell, Primitive, RobotState};
use crate::error::CompileError;

/// Primitives for one leg plus the pose after each of them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegProgram {
    /// Drive primitives, always terminated by `Stop`
    pub primitives: Vec<Primitive>,
    /// `snapshots[i]` is the robot state after `primitives[i]`
    pub snapshots: Vec<RobotState>,
}

impl LegProgram {
    fn emit(&mut self, primitive: Primitive, state: &mut RobotState) {
        state.apply(primitive);
        self.primitives.push(primitive);
        self.snapshots.push(*state);
    }

    /// Number of FORWARD/REVERSE primitives.
    pub fn translations(&self) -> usize {
        self.primitives.iter().filter(|p| p.is_translation()).count()
    }

    /// Number of TURN_LEFT/TURN_RIGHT primitives.
    pub fn turns(&self) -> usize {
        self.primitives.iter().filter(|p| p.is_turn()).count()
    }
}

/// Quarter turns that take `from` to `to`.
///
/// A half turn is always two right turns.
pub fn bearing_correction(from: Bearing, to: Bearing) -> &'static [Primitive] {
    let quarters = ((to.index() + 8 - from.index()) % 8) / 2;
    match quarters {
        0 => &[],
        1 => &[Primitive::TurnRight],
        2 => &[Primitive::TurnRight, Primitive::TurnRight],
        _ => &[Primitive::TurnLeft],
    }
}

/// Turns routes into drive primitives.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovementCompiler;

impl MovementCompiler {
    /// Create a compiler
    pub fn new() -> Self {
        Self
    }

    /// Compile `route` starting from `state`, finishing at `final_bearing`.
    ///
    /// `route` must start at `state.position`; an empty route or a single
    /// cell means the robot is already there. On success `state` holds the
    /// pose after the closing STOP. On error `state` is left untouched.
    pub fn compile(
        &self,
        route: &[Cell],
        state: &mut RobotState,
        final_bearing: Bearing,
    ) -> Result<LegProgram, CompileError> {
        if !state.bearing.is_cardinal() {
            return Err(CompileError::DiagonalBearing(state.bearing));
        }
        if !final_bearing.is_cardinal() {
            return Err(CompileError::DiagonalBearing(final_bearing));
        }
        if let Some(&first) = route.first()
            && first != state.position
        {
            return Err(CompileError::StartMismatch {
                route_start: first,
                robot: state.position,
            });
        }

        let mut pose = *state;
        let mut program = LegProgram::default();

        for pair in route.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let Some(direction) = from.bearing_to(&to) else {
                return Err(CompileError::Discontinuous { from, to });
            };

            if direction == pose.bearing {
                program.emit(Primitive::Forward, &mut pose);
            } else if direction == pose.bearing.reverse() {
                program.emit(Primitive::Reverse, &mut pose);
            } else if direction == pose.bearing.counter_clockwise() {
                program.emit(Primitive::TurnLeft, &mut pose);
                program.emit(Primitive::Forward, &mut pose);
            } else {
                program.emit(Primitive::TurnRight, &mut pose);
                program.emit(Primitive::Forward, &mut pose);
            }
        }

        for &turn in bearing_correction(pose.bearing, final_bearing) {
            program.emit(turn, &mut pose);
        }
        program.emit(Primitive::Stop, &mut pose);

        tracing::trace!(
            "Compiled {} cells into {} primitives, ending at {} facing {}",
            route.len(),
            program.primitives.len(),
            pose.position,
            pose.bearing
        );

        *state = pose;
        Ok(program)
    }
}
