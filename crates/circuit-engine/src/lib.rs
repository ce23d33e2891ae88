pub mod api;
pub mod bridge;
pub mod core;
pub mod error;
pub mod input;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::RoundConfig;
pub use api::engine::{QuizEngine, RoundState};
pub use api::types::{Anchor, ConnectionStatus, GameEvent, SocketId, WireId};
pub use bridge::protocol::{pack_state, LineRecord, ProtocolLayout, WireRecord};
pub use crate::core::board::{ConnectOutcome, Connection, ConnectionBoard};
pub use crate::core::question::Question;
pub use crate::core::rng::Rng;
pub use crate::core::session::{Countdown, SessionClock, SessionPhase};
pub use crate::core::time::FixedTimestep;
pub use error::{ConfigError, QuizError, QuizResult, Transition};
pub use input::drag::{ActiveDrag, DragController, Release};
pub use input::queue::{InputEvent, InputQueue};
pub use systems::connectors::{build_connector_lines, ConnectorLine};
pub use systems::positions::{PositionTracker, Rect};
