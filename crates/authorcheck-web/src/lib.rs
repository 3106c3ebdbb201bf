pub mod cli;
pub mod config;
pub mod interaction;
pub mod presentation;
pub mod server;
pub mod state;

pub use cli::*;
pub use config::*;
pub use interaction::{handle, Outcome, Trigger, Verdict};
pub use presentation::{present, OutcomeView};
pub use server::*;
pub use state::*;
