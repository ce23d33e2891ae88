// systems/positions.rs
//
// Last-known screen positions of plugs and sockets.
// Written by the presentation layer whenever it measures layout (mount,
// resize, scroll, polling). Read for hit-testing and for connector anchors.
// Nothing here affects game rules; a headless round works with it empty.

use std::collections::HashMap;
use glam::Vec2;
use crate::api::types::{Anchor, SocketId, WireId};

/// Axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from a DOM-style `(left, top, width, height)` box.
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        let a = Vec2::new(x, y);
        let b = Vec2::new(x + w, y + h);
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Edges count as inside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Best-effort position cache, last write wins per anchor.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    points: HashMap<Anchor, Vec2>,
    bounds: HashMap<SocketId, Rect>,
    /// Grab radius around a plug for pointer-down.
    plug_radius: f32,
    /// Drop radius around a socket that has no reported bounds.
    socket_radius: f32,
}

impl PositionTracker {
    pub fn new(plug_radius: f32, socket_radius: f32) -> Self {
        Self {
            points: HashMap::new(),
            bounds: HashMap::new(),
            plug_radius,
            socket_radius,
        }
    }

    pub fn set_radii(&mut self, plug_radius: f32, socket_radius: f32) {
        self.plug_radius = plug_radius;
        self.socket_radius = socket_radius;
    }

    /// Overwrite the last-known position of an anchor.
    pub fn report(&mut self, anchor: Anchor, position: Vec2) {
        self.points.insert(anchor, position);
    }

    /// Record a socket's drop region. Its center becomes the socket anchor.
    pub fn report_bounds(&mut self, socket: SocketId, rect: Rect) {
        self.points.insert(Anchor::Socket(socket), rect.center());
        self.bounds.insert(socket, rect);
    }

    /// Absent until the first report.
    pub fn lookup(&self, anchor: Anchor) -> Option<Vec2> {
        self.points.get(&anchor).copied()
    }

    pub fn bounds(&self, socket: SocketId) -> Option<Rect> {
        self.bounds.get(&socket).copied()
    }

    /// Drop every anchor `keep` rejects, socket bounds included.
    pub fn retain(&mut self, mut keep: impl FnMut(Anchor) -> bool) {
        self.points.retain(|&anchor, _| keep(anchor));
        self.bounds.retain(|&socket, _| keep(Anchor::Socket(socket)));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn socket_contains(&self, socket: SocketId, center: Vec2, p: Vec2) -> bool {
        match self.bounds.get(&socket) {
            Some(rect) => rect.contains(p),
            None => center.distance(p) <= self.socket_radius,
        }
    }

    /// The socket under `p`, if exactly one socket region contains it.
    /// Overlapping regions are ambiguous and count as a miss.
    pub fn socket_at(&self, p: Vec2) -> Option<SocketId> {
        let mut hits = self.points.iter().filter_map(|(anchor, &center)| match *anchor {
            Anchor::Socket(s) if self.socket_contains(s, center, p) => Some(s),
            _ => None,
        });
        let first = hits.next()?;
        match hits.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// The plug nearest to `p` within the grab radius.
    pub fn plug_at(&self, p: Vec2) -> Option<WireId> {
        self.points
            .iter()
            .filter_map(|(anchor, &pos)| match *anchor {
                Anchor::Plug(w) => Some((w, pos.distance(p))),
                _ => None,
            })
            .filter(|&(_, d)| d <= self.plug_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(w, _)| w)
    }
}
