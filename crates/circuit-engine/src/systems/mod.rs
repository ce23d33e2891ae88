// systems/mod.rs
//
// Per-frame derived state. Nothing here decides correctness; the board does.

pub mod connectors;
pub mod positions;
