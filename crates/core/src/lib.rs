//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod config;
pub mod content;
pub mod effects;
pub mod events;
pub mod grid;
pub mod ledger;
pub mod matcher;
pub mod rng;
pub mod session;

pub use config::*;
pub use content::*;
pub use effects::*;
pub use events::*;
pub use grid::*;
pub use ledger::*;
pub use matcher::*;
pub use rng::*;
pub use session::*;
