pub mod runner;

pub use runner::QuizRunner;

/// Seed for the socket shuffle, drawn from `Math.random()`.
pub fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

/// Generate all `#[wasm_bindgen]` exports for a quiz.
///
/// Generates:
/// - `thread_local!` storage for the QuizRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, input handlers, commands, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use circuit_engine::*;
///
/// mod questions;
///
/// circuit_web::export_quiz!(questions::round_config, "my-quiz");
/// ```
///
/// # Arguments
///
/// - `$config_fn`: A function returning the `circuit_engine::RoundConfig` to start with
/// - `$quiz_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_quiz {
    ($config_fn:path, $quiz_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::QuizRunner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::QuizRunner) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Quiz not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            match $crate::QuizRunner::new($config_fn(), $crate::random_seed()) {
                Ok(runner) => {
                    RUNNER.with(|cell| {
                        *cell.borrow_mut() = Some(runner);
                    });
                    log::info!("{}: initialized", $quiz_name);
                    true
                }
                Err(e) => {
                    log::error!("{}: bad round config: {}", $quiz_name, e);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn game_load_config(json: &str) -> bool {
            with_runner(|r| r.load_config(json))
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Commands ----

        #[wasm_bindgen]
        pub fn game_begin_drag(wire: u32) -> bool {
            with_runner(|r| r.begin_drag(wire))
        }

        #[wasm_bindgen]
        pub fn game_release_drag(x: f32, y: f32) -> bool {
            with_runner(|r| r.release_drag(x, y))
        }

        #[wasm_bindgen]
        pub fn game_disconnect(wire: u32) -> bool {
            with_runner(|r| r.request_disconnect(wire))
        }

        #[wasm_bindgen]
        pub fn game_start() -> bool {
            with_runner(|r| r.start_session())
        }

        #[wasm_bindgen]
        pub fn game_pause() -> bool {
            with_runner(|r| r.pause_session())
        }

        #[wasm_bindgen]
        pub fn game_resume() -> bool {
            with_runner(|r| r.resume_session())
        }

        #[wasm_bindgen]
        pub fn game_reset() {
            with_runner(|r| r.reset_session());
        }

        // ---- Position reports ----

        #[wasm_bindgen]
        pub fn game_report_plug(wire: u32, x: f32, y: f32) {
            with_runner(|r| r.report_plug(wire, x, y));
        }

        #[wasm_bindgen]
        pub fn game_report_socket(socket: u32, x: f32, y: f32) {
            with_runner(|r| r.report_socket(socket, x, y));
        }

        #[wasm_bindgen]
        pub fn game_report_socket_bounds(socket: u32, x: f32, y: f32, w: f32, h: f32) {
            with_runner(|r| r.report_socket_bounds(socket, x, y, w, h));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_state_ptr() -> *const f32 {
            with_runner(|r| r.state_ptr())
        }

        #[wasm_bindgen]
        pub fn get_state_len() -> u32 {
            with_runner(|r| r.state_len())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_round_state_json() -> String {
            with_runner(|r| r.round_state_json())
        }

        #[wasm_bindgen]
        pub fn get_answer_at(socket: u32) -> String {
            with_runner(|r| r.answer_at(socket))
        }

        #[wasm_bindgen]
        pub fn get_score() -> u32 {
            with_runner(|r| r.score())
        }

        #[wasm_bindgen]
        pub fn get_lives() -> u32 {
            with_runner(|r| r.lives())
        }

        #[wasm_bindgen]
        pub fn get_time_left() -> u32 {
            with_runner(|r| r.time_left())
        }

        #[wasm_bindgen]
        pub fn get_correct_count() -> u32 {
            with_runner(|r| r.correct_count())
        }

        #[wasm_bindgen]
        pub fn get_is_complete() -> bool {
            with_runner(|r| r.is_complete())
        }

        #[wasm_bindgen]
        pub fn get_is_failed() -> bool {
            with_runner(|r| r.is_failed())
        }

        // ---- Layout accessors ----

        #[wasm_bindgen]
        pub fn get_wire_count() -> u32 {
            with_runner(|r| r.wire_count())
        }

        #[wasm_bindgen]
        pub fn get_wire_data_offset() -> u32 {
            with_runner(|r| r.wire_data_offset())
        }

        #[wasm_bindgen]
        pub fn get_line_data_offset() -> u32 {
            with_runner(|r| r.line_data_offset())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }
    };
}
