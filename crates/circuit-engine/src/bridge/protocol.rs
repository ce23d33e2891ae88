//! Flat buffer layout shared with the presentation layer.
//! Must stay in sync with the TypeScript reader.
//!
//! State buffer (all values f32):
//! ```text
//! [Header: 16 floats]
//! [Wires: wire_count × 4 floats]   wire id, socket id (0 = none), status, points
//! [Lines: wire_count × 9 floats]   wire id, from x, from y, control x, control y,
//!                                  to x, to y, status, live (1 while dragged)
//! ```
//!
//! Only the first `HEADER_LINE_COUNT` line records are meaningful.
//! Events travel separately as 4-float `GameEvent` records.

use bytemuck::{Pod, Zeroable};

use crate::api::engine::QuizEngine;
use crate::systems::connectors::ConnectorLine;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_WIRE_COUNT: usize = 1;
pub const HEADER_SCORE: usize = 2;
pub const HEADER_LIVES: usize = 3;
pub const HEADER_TIME_LEFT: usize = 4;
pub const HEADER_PHASE: usize = 5;
pub const HEADER_CORRECT_COUNT: usize = 6;
pub const HEADER_COMPLETE: usize = 7;
pub const HEADER_FAILED: usize = 8;
pub const HEADER_DRAG_WIRE: usize = 9;
pub const HEADER_POINTER_X: usize = 10;
pub const HEADER_POINTER_Y: usize = 11;
pub const HEADER_LINE_COUNT: usize = 12;
pub const HEADER_LIVES_TOTAL: usize = 13;
pub const HEADER_TIME_LIMIT: usize = 14;
pub const HEADER_PROGRESS: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per wire record (wire format, never changes).
pub const WIRE_FLOATS: usize = 4;

/// Floats per connector line record (wire format, never changes).
pub const LINE_FLOATS: usize = 9;

// Game event kinds (Rust → React)
pub const EVENT_ROUND_RESET: f32 = 1.0;
pub const EVENT_SESSION_STARTED: f32 = 2.0;
pub const EVENT_CONNECTED: f32 = 3.0;
pub const EVENT_EVICTED: f32 = 4.0;
pub const EVENT_DISCONNECTED: f32 = 5.0;
pub const EVENT_SCORE: f32 = 6.0;
pub const EVENT_LIVES: f32 = 7.0;
pub const EVENT_TIME: f32 = 8.0;
pub const EVENT_COMPLETED: f32 = 9.0;
pub const EVENT_FAILED: f32 = 10.0;
pub const EVENT_TIMED_OUT: f32 = 11.0;
pub const EVENT_PAUSED: f32 = 12.0;
pub const EVENT_RESUMED: f32 = 13.0;

// Custom event kinds (React → Rust)
pub const CUSTOM_START: u32 = 1;
pub const CUSTOM_RESET: u32 = 2;
/// `a` carries the wire id.
pub const CUSTOM_DISCONNECT: u32 = 3;
pub const CUSTOM_PAUSE: u32 = 4;
pub const CUSTOM_RESUME: u32 = 5;

/// One wire's binding as written into the state buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WireRecord {
    pub wire: f32,
    pub socket: f32,
    pub status: f32,
    pub points: f32,
}

/// One connector line as written into the state buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineRecord {
    pub wire: f32,
    pub from_x: f32,
    pub from_y: f32,
    /// Quadratic curve control point.
    pub ctrl_x: f32,
    pub ctrl_y: f32,
    pub to_x: f32,
    pub to_y: f32,
    pub status: f32,
    pub live: f32,
}

impl From<&ConnectorLine> for LineRecord {
    fn from(line: &ConnectorLine) -> Self {
        let ctrl = line.sag_control();
        Self {
            wire: line.wire.0 as f32,
            from_x: line.from.x,
            from_y: line.from.y,
            ctrl_x: ctrl.x,
            ctrl_y: ctrl.y,
            to_x: line.to.x,
            to_y: line.to.y,
            status: line.status.code(),
            live: if line.live { 1.0 } else { 0.0 },
        }
    }
}

/// Offsets of each section for a round with `wire_count` wires.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub wire_count: usize,
    /// Offset (in floats) where wire records begin.
    pub wire_data_offset: usize,
    /// Offset (in floats) where line records begin.
    pub line_data_offset: usize,
    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
}

impl ProtocolLayout {
    pub fn for_round(wire_count: usize) -> Self {
        let wire_data_offset = HEADER_FLOATS;
        let line_data_offset = wire_data_offset + wire_count * WIRE_FLOATS;
        let buffer_total_floats = line_data_offset + wire_count * LINE_FLOATS;
        Self {
            wire_count,
            wire_data_offset,
            line_data_offset,
            buffer_total_floats,
        }
    }
}

/// Serialize the engine's state into `out`, resizing it to the layout.
/// `lines` is scratch space for connector lines.
pub fn pack_state(engine: &QuizEngine, lines: &mut Vec<ConnectorLine>, out: &mut Vec<f32>) -> ProtocolLayout {
    let board = engine.board();
    let layout = ProtocolLayout::for_round(board.len());
    out.clear();
    out.resize(layout.buffer_total_floats, 0.0);

    engine.connector_lines(lines);
    let drag = engine.drag().active();

    let header = &mut out[..HEADER_FLOATS];
    header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    header[HEADER_WIRE_COUNT] = board.len() as f32;
    header[HEADER_SCORE] = board.score() as f32;
    header[HEADER_LIVES] = board.lives() as f32;
    header[HEADER_TIME_LEFT] = engine.time_left() as f32;
    header[HEADER_PHASE] = engine.phase().code();
    header[HEADER_CORRECT_COUNT] = board.correct_count() as f32;
    header[HEADER_COMPLETE] = if engine.is_complete() { 1.0 } else { 0.0 };
    header[HEADER_FAILED] = if engine.is_failed() { 1.0 } else { 0.0 };
    header[HEADER_DRAG_WIRE] = drag.map_or(0.0, |d| d.wire.0 as f32);
    header[HEADER_POINTER_X] = drag.map_or(0.0, |d| d.pointer.x);
    header[HEADER_POINTER_Y] = drag.map_or(0.0, |d| d.pointer.y);
    header[HEADER_LINE_COUNT] = lines.len() as f32;
    header[HEADER_LIVES_TOTAL] = board.lives_total() as f32;
    header[HEADER_TIME_LIMIT] = engine.config().time_limit_seconds as f32;
    header[HEADER_PROGRESS] = board.progress();

    let wires: Vec<WireRecord> = board
        .questions()
        .iter()
        .zip(board.connections())
        .map(|(q, c)| WireRecord {
            wire: c.wire_id.0 as f32,
            socket: c.socket_id.map_or(0.0, |s| s.0 as f32),
            status: board.status(c.wire_id).map_or(0.0, |s| s.code()),
            points: q.points as f32,
        })
        .collect();
    out[layout.wire_data_offset..layout.line_data_offset]
        .copy_from_slice(bytemuck::cast_slice(&wires));

    let records: Vec<LineRecord> = lines.iter().map(LineRecord::from).collect();
    let floats: &[f32] = bytemuck::cast_slice(&records);
    let start = layout.line_data_offset;
    out[start..start + floats.len()].copy_from_slice(floats);

    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes_match_float_counts() {
        assert_eq!(std::mem::size_of::<WireRecord>(), WIRE_FLOATS * 4);
        assert_eq!(std::mem::size_of::<LineRecord>(), LINE_FLOATS * 4);
    }

    #[test]
    fn layout_offsets() {
        let layout = ProtocolLayout::for_round(4);
        assert_eq!(layout.wire_data_offset, 16);
        assert_eq!(layout.line_data_offset, 16 + 16);
        assert_eq!(layout.buffer_total_floats, 16 + 16 + 36);
    }

    #[test]
    fn line_record_carries_curve_and_live_flag() {
        use crate::api::types::{ConnectionStatus, WireId};
        use glam::Vec2;

        let line = ConnectorLine {
            wire: WireId(3),
            from: Vec2::ZERO,
            to: Vec2::new(1000.0, 0.0),
            status: ConnectionStatus::Incorrect,
            live: false,
        };
        let record = LineRecord::from(&line);
        assert_eq!((record.ctrl_x, record.ctrl_y), (500.0, -80.0));
        assert_eq!(record.status, 2.0);
        assert_eq!(record.live, 0.0);
    }
}
