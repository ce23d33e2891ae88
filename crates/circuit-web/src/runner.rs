use circuit_engine::{
    pack_state, Anchor, ConfigError, ConnectorLine, GameEvent, InputEvent, InputQueue,
    ProtocolLayout, QuizEngine, QuizResult, Rect, RoundConfig, SessionPhase, SocketId, WireId,
};
use glam::Vec2;

/// Owns one engine plus the flat buffers JS reads between frames.
///
/// Each concrete quiz creates a `thread_local!` QuizRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export the
/// engine directly. See `export_quiz!`.
pub struct QuizRunner {
    engine: QuizEngine,
    input: InputQueue,
    state_buffer: Vec<f32>,
    /// Events published by the last tick.
    event_buffer: Vec<GameEvent>,
    lines: Vec<ConnectorLine>,
    layout: ProtocolLayout,
}

impl QuizRunner {
    pub fn new(config: RoundConfig, seed: u64) -> Result<Self, ConfigError> {
        let engine = QuizEngine::new(config, seed)?;
        let mut runner = Self {
            layout: ProtocolLayout::for_round(engine.board().len()),
            engine,
            input: InputQueue::new(),
            state_buffer: Vec::new(),
            event_buffer: Vec::with_capacity(32),
            lines: Vec::new(),
        };
        runner.refresh();
        Ok(runner)
    }

    /// Replace the round configuration. The old round keeps running on error.
    pub fn load_config(&mut self, json: &str) -> bool {
        let result = RoundConfig::from_json(json).and_then(|config| self.engine.initialize(config));
        match result {
            Ok(()) => {
                self.input.drain();
                self.refresh();
                true
            }
            Err(e) => {
                log::error!("rejected round config: {}", e);
                false
            }
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: apply queued input, advance the clock, publish buffers.
    pub fn tick(&mut self, dt: f32) {
        self.engine.handle_input(&self.input);
        self.input.drain();
        self.engine.tick(dt);

        // Events from direct calls since the last frame ride along too.
        self.event_buffer.clear();
        self.event_buffer.extend_from_slice(self.engine.events());
        self.engine.clear_events();

        self.refresh();
    }

    fn refresh(&mut self) {
        self.layout = pack_state(&self.engine, &mut self.lines, &mut self.state_buffer);
    }

    fn settle<T>(&mut self, result: QuizResult<T>) -> Option<T> {
        self.refresh();
        result
            .map_err(|e| log::warn!("{}", e))
            .ok()
    }

    // ---- Direct commands (bypass the input queue) ----

    pub fn begin_drag(&mut self, wire: u32) -> bool {
        let result = self.engine.begin_drag(WireId(wire));
        self.settle(result).is_some()
    }

    /// True when the wire ended up plugged into a socket.
    pub fn release_drag(&mut self, x: f32, y: f32) -> bool {
        let result = self.engine.release_drag(Vec2::new(x, y));
        self.settle(result).is_some_and(|outcome| outcome.connected)
    }

    pub fn request_disconnect(&mut self, wire: u32) -> bool {
        let result = self.engine.request_disconnect(WireId(wire));
        self.settle(result).unwrap_or(false)
    }

    pub fn start_session(&mut self) -> bool {
        let started = self.engine.start_session();
        self.refresh();
        started
    }

    pub fn pause_session(&mut self) -> bool {
        let paused = self.engine.pause_session();
        self.refresh();
        paused
    }

    pub fn resume_session(&mut self) -> bool {
        let resumed = self.engine.resume_session();
        self.refresh();
        resumed
    }

    pub fn reset_session(&mut self) {
        self.input.drain();
        self.engine.reset_session();
        self.refresh();
    }

    // ---- Position reports ----

    pub fn report_plug(&mut self, wire: u32, x: f32, y: f32) {
        self.engine.report_position(Anchor::Plug(WireId(wire)), Vec2::new(x, y));
    }

    pub fn report_socket(&mut self, socket: u32, x: f32, y: f32) {
        self.engine.report_position(Anchor::Socket(SocketId(socket)), Vec2::new(x, y));
    }

    pub fn report_socket_bounds(&mut self, socket: u32, x: f32, y: f32, w: f32, h: f32) {
        self.engine
            .report_socket_bounds(SocketId(socket), Rect::from_xywh(x, y, w, h));
    }

    // ---- Pointer accessors for buffer reads ----

    pub fn state_ptr(&self) -> *const f32 {
        self.state_buffer.as_ptr()
    }

    pub fn state_len(&self) -> u32 {
        self.state_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.event_buffer.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.event_buffer.len() as u32
    }

    pub fn state(&self) -> &[f32] {
        &self.state_buffer
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.event_buffer
    }

    // ---- Scalar accessors ----

    pub fn score(&self) -> u32 {
        self.engine.board().score()
    }

    pub fn lives(&self) -> u32 {
        self.engine.board().lives()
    }

    pub fn time_left(&self) -> u32 {
        self.engine.time_left()
    }

    pub fn correct_count(&self) -> u32 {
        self.engine.correct_count() as u32
    }

    pub fn wire_count(&self) -> u32 {
        self.layout.wire_count as u32
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn is_failed(&self) -> bool {
        self.engine.is_failed()
    }

    pub fn phase(&self) -> SessionPhase {
        self.engine.phase()
    }

    /// Answer text shown in a socket, empty for an unknown socket.
    pub fn answer_at(&self, socket: u32) -> String {
        self.engine
            .board()
            .answer_at(SocketId(socket))
            .unwrap_or_default()
            .to_string()
    }

    pub fn round_state_json(&self) -> String {
        serde_json::to_string(&self.engine.round_state()).unwrap_or_else(|e| {
            log::error!("round state serialization failed: {}", e);
            String::new()
        })
    }

    // ---- Layout accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn wire_data_offset(&self) -> u32 {
        self.layout.wire_data_offset as u32
    }

    pub fn line_data_offset(&self) -> u32 {
        self.layout.line_data_offset as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuit_engine::bridge::protocol::*;
    use circuit_engine::Question;

    fn runner() -> QuizRunner {
        let config = RoundConfig::new(vec![
            Question::new(1, "What limits current?", "Resistor").with_points(100),
            Question::new(2, "What stores charge?", "Capacitor").with_points(100),
        ]);
        let mut runner = QuizRunner::new(config, 42).unwrap();
        runner.report_plug(1, 0.0, 0.0);
        runner.report_plug(2, 0.0, 100.0);
        for socket in 1..=2u32 {
            runner.report_socket_bounds(socket, 280.0, (socket - 1) as f32 * 100.0 - 20.0, 40.0, 40.0);
        }
        runner
    }

    /// Socket whose answer belongs to `wire`.
    fn socket_for(runner: &QuizRunner, wire: u32) -> u32 {
        let answer = &runner.engine().board().questions()[wire as usize - 1].answer;
        (1..=2).find(|&s| runner.answer_at(s) == *answer).unwrap()
    }

    fn socket_center(socket: u32) -> (f32, f32) {
        (300.0, (socket - 1) as f32 * 100.0)
    }

    #[test]
    fn first_tick_publishes_reset_event() {
        let mut r = runner();
        r.tick(0.016);
        assert_eq!(r.game_events()[0].kind, EVENT_ROUND_RESET);
        r.tick(0.016);
        assert!(r.game_events().is_empty());
    }

    #[test]
    fn pointer_drag_connects_through_the_queue() {
        let mut r = runner();
        let (x, y) = socket_center(socket_for(&r, 1));
        r.push_input(InputEvent::PointerDown { x: 2.0, y: 3.0 });
        r.push_input(InputEvent::PointerMove { x: 150.0, y: 40.0 });
        r.push_input(InputEvent::PointerUp { x, y });
        r.tick(0.016);

        assert_eq!(r.score(), 100);
        assert_eq!(r.correct_count(), 1);
        assert_eq!(r.phase(), SessionPhase::Running);
        let state = r.state();
        assert_eq!(state[HEADER_SCORE], 100.0);
        assert_eq!(state[HEADER_PHASE], 1.0);
        assert_eq!(state[HEADER_LINE_COUNT], 1.0);
        let wire = r.wire_data_offset() as usize;
        assert_eq!(state[wire + 2], 1.0);
    }

    #[test]
    fn buffer_matches_layout() {
        let r = runner();
        assert_eq!(r.state_len(), r.buffer_total_floats());
        assert_eq!(r.buffer_total_floats(), 16 + 2 * 4 + 2 * 9);
        assert_eq!(r.state()[HEADER_WIRE_COUNT], 2.0);
    }

    #[test]
    fn direct_commands_report_success() {
        let mut r = runner();
        assert!(r.begin_drag(2));
        assert!(!r.begin_drag(1));
        let (x, y) = socket_center(socket_for(&r, 1));
        assert!(r.release_drag(x, y));
        assert_eq!(r.lives(), 2);
        assert!(r.request_disconnect(2));
        assert!(!r.request_disconnect(9));
    }

    #[test]
    fn load_config_swaps_the_round() {
        let mut r = runner();
        let json = r#"{ "questions": [
            { "id": 1, "prompt": "Q", "answer": "A" },
            { "id": 2, "prompt": "R", "answer": "B" },
            { "id": 3, "prompt": "S", "answer": "C" }
        ], "timeLimitSeconds": 45 }"#;
        assert!(r.load_config(json));
        assert_eq!(r.wire_count(), 3);
        assert_eq!(r.time_left(), 45);
        assert!(!r.load_config("{}"));
        assert_eq!(r.wire_count(), 3);
    }

    #[test]
    fn round_state_json_is_camel_case() {
        let r = runner();
        let json = r.round_state_json();
        assert!(json.contains("\"correctCount\":0"));
        assert!(json.contains("\"phase\":\"notStarted\""));
    }
}
