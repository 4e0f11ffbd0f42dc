//! Debug Challenge · timed bug-fixing game backend.
//!
//! A player is shown a buggy snippet drawn from the problem bank, edits it and
//! submits it for exact-text comparison against the stored solution, while a
//! hint assistant answers questions with increasingly explicit hints until
//! the countdown runs out.

pub mod bank;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod hints;
pub mod logic;
pub mod openai;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod session;
pub mod state;
pub mod telemetry;
pub mod util;

pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
