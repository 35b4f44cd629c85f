//! Event loop and everything it dispatches.
//!
//! - `events` — terminal event to `Action`
//! - `actions` — `Action` applied to `State`, returning side effects
//! - `background` — change, branch and account jobs off the loop thread
//! - `benchmark` — `--benchmark` timings

pub mod actions;
#[allow(clippy::module_inception)]
pub mod app;
pub mod background;
pub mod benchmark;
pub mod events;

pub use app::App;
