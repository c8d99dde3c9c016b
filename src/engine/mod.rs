//! Engine controller and time management.
//!
//! The interface layer (a text protocol, a GUI bridge, tests) talks to
//! [`EngineController`]: it sets positions, starts and stops searches and
//! manages the hash table. Searches run on one worker thread.

mod controller;
pub mod time;

pub use controller::{EngineController, SearchJob};
pub use time::{SearchRequest, TimeConfig, TimeControl};
