use wasm_bindgen::prelude::*;
use circuit_engine::InputEvent;

mod questions;

circuit_web::export_quiz!(questions::round_config, "crack-the-circuit");
