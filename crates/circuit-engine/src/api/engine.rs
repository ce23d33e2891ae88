use glam::Vec2;
use serde::Serialize;

use crate::api::config::RoundConfig;
use crate::api::types::{Anchor, GameEvent, SocketId, WireId};
use crate::bridge::protocol::*;
use crate::core::board::{ConnectOutcome, Connection, ConnectionBoard};
use crate::core::rng::Rng;
use crate::core::session::{Countdown, SessionClock, SessionPhase};
use crate::error::{ConfigError, QuizError, QuizResult, Transition};
use crate::input::drag::DragController;
use crate::input::queue::{InputEvent, InputQueue};
use crate::systems::connectors::{build_connector_lines, ConnectorLine};
use crate::systems::positions::{PositionTracker, Rect};

/// Read-only snapshot of a round for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    pub connections: Vec<Connection>,
    pub score: u32,
    pub lives: u32,
    pub time_left: u32,
    /// Seconds taken off the clock so far.
    pub elapsed: u32,
    pub started: bool,
    pub complete: bool,
    pub failed: bool,
    pub phase: SessionPhase,
    pub correct_count: usize,
    pub total: usize,
}

/// One quiz instance: board, clock, drag controller and position cache.
///
/// Every mutation is a plain `&mut self` call that finishes before the next
/// one starts. Events describing what changed accumulate in `events()` until
/// the caller clears them, once per frame.
pub struct QuizEngine {
    config: RoundConfig,
    board: ConnectionBoard,
    clock: SessionClock,
    drag: DragController,
    positions: PositionTracker,
    rng: Rng,
    events: Vec<GameEvent>,
}

impl QuizEngine {
    /// Validate `config` and deal the first round.
    pub fn new(config: RoundConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Rng::new(seed);
        let board = ConnectionBoard::new(config.questions.clone(), config.lives_total, &mut rng);
        Ok(Self::assemble(config, board, rng))
    }

    /// Like `new`, but the first round uses the given socket order.
    pub fn arranged(config: RoundConfig, slots: &[&str], seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = slots.iter().map(|s| s.to_string()).collect();
        let board = ConnectionBoard::arranged(config.questions.clone(), slots, config.lives_total)?;
        Ok(Self::assemble(config, board, Rng::new(seed)))
    }

    fn assemble(config: RoundConfig, board: ConnectionBoard, rng: Rng) -> Self {
        log::info!(
            "round ready: {} wires, {}s, {} lives",
            board.len(),
            config.time_limit_seconds,
            config.lives_total
        );
        let mut engine = Self {
            clock: SessionClock::new(config.time_limit_seconds),
            positions: PositionTracker::new(config.plug_radius, config.socket_radius),
            drag: DragController::new(),
            events: Vec::with_capacity(32),
            config,
            board,
            rng,
        };
        engine.emit_reset();
        engine
    }

    /// Replace the configuration and start over from NotStarted.
    /// Anchors for wires and sockets the new round lacks are dropped.
    pub fn initialize(&mut self, config: RoundConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.positions.set_radii(config.plug_radius, config.socket_radius);
        let sockets = config.questions.len();
        let questions = &config.questions;
        self.positions.retain(|anchor| match anchor {
            Anchor::Plug(wire) => questions.iter().any(|q| q.id == wire),
            Anchor::Socket(socket) => socket.index().is_some_and(|i| i < sockets),
        });
        self.config = config;
        self.reset_session();
        Ok(())
    }

    fn emit(&mut self, kind: f32, a: f32, b: f32, c: f32) {
        self.events.push(GameEvent::new(kind, a, b, c));
    }

    fn emit_reset(&mut self) {
        self.emit(
            EVENT_ROUND_RESET,
            self.board.len() as f32,
            self.config.time_limit_seconds as f32,
            self.config.lives_total as f32,
        );
    }

    /// Mutations are refused once the round has ended.
    fn ensure_playable(&self) -> QuizResult<()> {
        match self.clock.phase() {
            p if p.is_terminal() => Err(QuizError::RoundOver),
            SessionPhase::Paused => Err(Transition::SessionPaused.into()),
            _ => Ok(()),
        }
    }

    // -- Input events --

    /// Pick up a wire at its last reported plug position.
    pub fn begin_drag(&mut self, wire: WireId) -> QuizResult<()> {
        let at = self.positions.lookup(Anchor::Plug(wire)).unwrap_or(Vec2::ZERO);
        self.begin_drag_at(wire, at)
    }

    /// Pick up a wire. The first drag of a round starts the clock.
    pub fn begin_drag_at(&mut self, wire: WireId, at: Vec2) -> QuizResult<()> {
        self.ensure_playable()?;
        self.drag.begin(wire, at, &self.board)?;
        self.start_session();
        Ok(())
    }

    pub fn move_drag(&mut self, p: Vec2) -> bool {
        self.drag.move_to(p)
    }

    /// Drop the dragged wire at `p` and judge the result.
    pub fn release_drag(&mut self, p: Vec2) -> QuizResult<ConnectOutcome> {
        if self.clock.phase().is_terminal() {
            self.drag.cancel();
            return Err(QuizError::RoundOver);
        }
        let release = self.drag.release(p, &self.positions, &self.board)?;
        let outcome = self.board.attempt_connect(release.wire, release.target)?;
        if let Some(socket) = release.target {
            self.apply_outcome(release.wire, socket, &outcome);
        }
        Ok(outcome)
    }

    fn apply_outcome(&mut self, wire: WireId, socket: SocketId, outcome: &ConnectOutcome) {
        if let Some(evicted) = outcome.evicted {
            self.emit(EVENT_EVICTED, evicted.0 as f32, socket.0 as f32, 0.0);
        }
        let correct = if outcome.correct { 1.0 } else { 0.0 };
        self.emit(EVENT_CONNECTED, wire.0 as f32, socket.0 as f32, correct);

        if outcome.correct {
            self.emit(
                EVENT_SCORE,
                self.board.score() as f32,
                outcome.points_awarded as f32,
                self.board.correct_count() as f32,
            );
        } else {
            self.emit(EVENT_LIVES, self.board.lives() as f32, self.board.lives_total() as f32, 0.0);
        }

        if outcome.failed && self.clock.fail() {
            self.drag.cancel();
            self.emit(EVENT_FAILED, self.board.score() as f32, 0.0, 0.0);
        }
        if outcome.completed && self.clock.complete() {
            self.emit(
                EVENT_COMPLETED,
                self.board.score() as f32,
                self.clock.time_left() as f32,
                0.0,
            );
        }
    }

    /// Unplug a wire that is not locked into its correct socket.
    pub fn request_disconnect(&mut self, wire: WireId) -> QuizResult<bool> {
        self.ensure_playable()?;
        let socket = self.board.socket_of(wire);
        let changed = self.board.disconnect(wire)?;
        if changed {
            let socket = socket.map_or(0.0, |s| s.0 as f32);
            self.emit(EVENT_DISCONNECTED, wire.0 as f32, socket, 0.0);
        }
        Ok(changed)
    }

    pub fn start_session(&mut self) -> bool {
        let started = self.clock.start();
        if started {
            self.emit(EVENT_SESSION_STARTED, self.clock.time_left() as f32, 0.0, 0.0);
        }
        started
    }

    /// Freeze the clock. Any drag in flight is dropped without a connection.
    pub fn pause_session(&mut self) -> bool {
        let paused = self.clock.pause();
        if paused {
            self.drag.cancel();
            self.emit(EVENT_PAUSED, self.clock.time_left() as f32, 0.0, 0.0);
        }
        paused
    }

    pub fn resume_session(&mut self) -> bool {
        let resumed = self.clock.resume();
        if resumed {
            self.emit(EVENT_RESUMED, self.clock.time_left() as f32, 0.0, 0.0);
        }
        resumed
    }

    /// Deal a fresh round with the current configuration.
    /// Reported positions survive; the layout does not move on reset.
    pub fn reset_session(&mut self) {
        self.board = ConnectionBoard::new(
            self.config.questions.clone(),
            self.config.lives_total,
            &mut self.rng,
        );
        self.clock.reset(self.config.time_limit_seconds);
        self.drag.cancel();
        log::info!("round reset");
        self.emit_reset();
    }

    pub fn report_position(&mut self, anchor: Anchor, position: Vec2) {
        self.positions.report(anchor, position);
    }

    pub fn report_socket_bounds(&mut self, socket: SocketId, rect: Rect) {
        self.positions.report_bounds(socket, rect);
    }

    /// Apply a frame's worth of raw input in order.
    pub fn handle_input(&mut self, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => {
                    let p = Vec2::new(x, y);
                    if let Some(wire) = self.positions.plug_at(p) {
                        if let Err(e) = self.begin_drag_at(wire, p) {
                            log::debug!("pointer down on {} ignored: {}", wire, e);
                        }
                    }
                }
                InputEvent::PointerMove { x, y } => {
                    self.move_drag(Vec2::new(x, y));
                }
                InputEvent::PointerUp { x, y } => {
                    if self.drag.is_dragging() {
                        if let Err(e) = self.release_drag(Vec2::new(x, y)) {
                            log::warn!("release rejected: {}", e);
                        }
                    }
                }
                InputEvent::Custom { kind, a, .. } => self.handle_custom(kind, a),
            }
        }
    }

    fn handle_custom(&mut self, kind: u32, a: f32) {
        match kind {
            CUSTOM_START => {
                self.start_session();
            }
            CUSTOM_RESET => self.reset_session(),
            CUSTOM_DISCONNECT => {
                let wire = WireId(a as u32);
                if let Err(e) = self.request_disconnect(wire) {
                    log::warn!("disconnect of {} rejected: {}", wire, e);
                }
            }
            CUSTOM_PAUSE => {
                self.pause_session();
            }
            CUSTOM_RESUME => {
                self.resume_session();
            }
            _ => log::warn!("unknown custom event kind {}", kind),
        }
    }

    /// Advance the clock by one frame.
    pub fn tick(&mut self, dt: f32) -> Countdown {
        let report = self.clock.tick(dt);
        if report.ticked > 0 {
            self.emit(EVENT_TIME, self.clock.time_left() as f32, 0.0, 0.0);
        }
        if report.timed_out {
            self.drag.cancel();
            self.emit(
                EVENT_TIMED_OUT,
                self.board.score() as f32,
                self.board.correct_count() as f32,
                0.0,
            );
        }
        report
    }

    // -- Queries --

    pub fn round_state(&self) -> RoundState {
        let phase = self.clock.phase();
        RoundState {
            connections: self.board.connections().to_vec(),
            score: self.board.score(),
            lives: self.board.lives(),
            time_left: self.clock.time_left(),
            elapsed: self.clock.elapsed(),
            started: phase.is_started(),
            complete: self.board.is_complete(),
            failed: self.board.is_failed(),
            phase,
            correct_count: self.board.correct_count(),
            total: self.board.len(),
        }
    }

    pub fn correct_count(&self) -> usize {
        self.board.correct_count()
    }

    pub fn time_left(&self) -> u32 {
        self.clock.time_left()
    }

    pub fn is_complete(&self) -> bool {
        self.clock.phase() == SessionPhase::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.clock.phase() == SessionPhase::Failed
    }

    pub fn is_timed_out(&self) -> bool {
        self.clock.phase() == SessionPhase::TimedOut
    }

    pub fn phase(&self) -> SessionPhase {
        self.clock.phase()
    }

    pub fn progress(&self) -> f32 {
        self.board.progress()
    }

    pub fn connector_lines(&self, out: &mut Vec<ConnectorLine>) {
        build_connector_lines(&self.board, &self.positions, &self.drag, out);
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn board(&self) -> &ConnectionBoard {
        &self.board
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn positions(&self) -> &PositionTracker {
        &self.positions
    }

    /// Events emitted since the last `clear_events`.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}
