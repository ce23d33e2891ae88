pub mod board;
pub mod question;
pub mod rng;
pub mod session;
pub mod time;
