use glam::Vec2;

use crate::api::types::{Anchor, ConnectionStatus, WireId};
use crate::core::board::ConnectionBoard;
use crate::input::drag::DragController;
use crate::systems::positions::PositionTracker;

/// A line the renderer draws from a plug to its socket, or to the pointer
/// while the wire is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorLine {
    pub wire: WireId,
    pub from: Vec2,
    pub to: Vec2,
    pub status: ConnectionStatus,
    /// Follows the pointer rather than a socket.
    pub live: bool,
}

impl ConnectorLine {
    /// Control point of a quadratic curve that sags upward between the ends.
    pub fn sag_control(&self) -> Vec2 {
        let d = self.to - self.from;
        let sag = if self.live { d.length() * 0.1 } else { (d.length() * 0.15).min(80.0) };
        Vec2::new(self.from.x + d.x * 0.5, self.from.y + d.y * 0.4 - sag)
    }
}

/// Rebuild every drawable line. Wires whose anchors were never reported are skipped.
pub fn build_connector_lines(
    board: &ConnectionBoard,
    positions: &PositionTracker,
    drag: &DragController,
    out: &mut Vec<ConnectorLine>,
) {
    out.clear();
    let dragging = drag.active();

    for conn in board.connections() {
        let wire = conn.wire_id;
        let status = board.status(wire).unwrap_or(ConnectionStatus::Disconnected);
        let plug = positions.lookup(Anchor::Plug(wire));

        if let Some(active) = dragging.filter(|a| a.wire == wire) {
            out.push(ConnectorLine {
                wire,
                from: plug.unwrap_or(active.origin),
                to: active.pointer,
                status,
                live: true,
            });
            continue;
        }

        let Some(socket) = conn.socket_id else { continue };
        if let (Some(from), Some(to)) = (plug, positions.lookup(Anchor::Socket(socket))) {
            out.push(ConnectorLine { wire, from, to, status, live: false });
        }
    }
}
