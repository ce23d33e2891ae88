use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Identifier of a wire. Equal to the id of the question it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireId(pub u32);

/// 1-based position of a socket in the shuffled answer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocketId(pub u32);

impl SocketId {
    /// Zero-based index into the answer slots. `None` for the invalid id 0.
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    /// Socket id for a zero-based slot index.
    pub fn from_index(index: usize) -> Self {
        SocketId(index as u32 + 1)
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wire #{}", self.0)
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "socket #{}", self.0)
    }
}

/// Something on screen whose position the presentation layer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// The draggable plug at the end of a wire.
    Plug(WireId),
    /// The center of a socket.
    Socket(SocketId),
}

/// Judgement of a single wire's current binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionStatus {
    Disconnected,
    Correct,
    Incorrect,
}

impl ConnectionStatus {
    /// Numeric code written into the state buffer.
    pub fn code(self) -> f32 {
        match self {
            ConnectionStatus::Disconnected => 0.0,
            ConnectionStatus::Correct => 1.0,
            ConnectionStatus::Incorrect => 2.0,
        }
    }
}

/// A game event communicated from Rust to TypeScript through the event buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_index_is_one_based() {
        assert_eq!(SocketId(1).index(), Some(0));
        assert_eq!(SocketId(4).index(), Some(3));
        assert_eq!(SocketId(0).index(), None);
        assert_eq!(SocketId::from_index(2), SocketId(3));
    }

    #[test]
    fn game_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<GameEvent>(), GameEvent::FLOATS * 4);
        let events = [GameEvent::new(3.0, 1.0, 2.0, 1.0)];
        let floats: &[f32] = bytemuck::cast_slice(&events);
        assert_eq!(floats, &[3.0, 1.0, 2.0, 1.0]);
    }
}
