use glam::Vec2;

use crate::api::types::{SocketId, WireId};
use crate::core::board::ConnectionBoard;
use crate::error::{QuizError, QuizResult, Transition};
use crate::systems::positions::PositionTracker;

/// A wire currently following the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub wire: WireId,
    /// Where the drag began.
    pub origin: Vec2,
    /// Live pointer position.
    pub pointer: Vec2,
}

/// Where a released wire landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub wire: WireId,
    pub point: Vec2,
    /// `None` means "no new target", never "unplug".
    pub target: Option<SocketId>,
}

/// Idle → Dragging → Idle. At most one wire in flight.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up a wire. Locked wires stay put, and a second drag is refused.
    pub fn begin(&mut self, wire: WireId, at: Vec2, board: &ConnectionBoard) -> QuizResult<()> {
        if let Some(active) = &self.active {
            return Err(Transition::DragInProgress(active.wire).into());
        }
        if board.question(wire).is_none() {
            return Err(QuizError::InvalidReference(wire));
        }
        if board.is_locked(wire) {
            return Err(Transition::WireLocked(wire).into());
        }
        self.active = Some(ActiveDrag { wire, origin: at, pointer: at });
        log::debug!("drag {} from {:?}", wire, at);
        Ok(())
    }

    /// Follow the pointer. Returns false when nothing is being dragged.
    pub fn move_to(&mut self, p: Vec2) -> bool {
        match &mut self.active {
            Some(active) => {
                active.pointer = p;
                true
            }
            None => false,
        }
    }

    /// Drop the wire at `p` and go back to Idle.
    ///
    /// The target is the single socket under `p`. A socket that already
    /// holds a correct plug is not a valid target.
    pub fn release(
        &mut self,
        p: Vec2,
        positions: &PositionTracker,
        board: &ConnectionBoard,
    ) -> Result<Release, Transition> {
        let active = self.active.take().ok_or(Transition::NotDragging)?;
        let target = positions.socket_at(p).filter(|&s| {
            let locked = board.is_socket_locked(s);
            if locked {
                log::debug!("{} is locked, dropping {} on nothing", s, active.wire);
            }
            !locked
        });
        Ok(Release { wire: active.wire, point: p, target })
    }

    /// Abandon the drag without a connection attempt.
    pub fn cancel(&mut self) -> Option<ActiveDrag> {
        self.active.take()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}
