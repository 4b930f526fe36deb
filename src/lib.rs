// Library target holds the learning core so the binary, integration tests and
// criterion benchmarks all share it via `lexdrill::*`.

pub mod config;
pub mod engine;
pub mod logging;
pub mod session;
pub mod sets;
pub mod store;
