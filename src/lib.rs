// Library target holds the whole module tree; main.rs only owns the
// terminal. Integration tests and benchmarks import through `recite::*`.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod session;
pub mod speech;
pub mod store;
pub mod ui;
