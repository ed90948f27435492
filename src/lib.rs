// Library target for integration tests and criterion benchmarks. The binary
// entry point is main.rs; the terminal front end is only compiled there.

pub mod config;
pub mod engine;
pub mod session;
pub mod store;
pub mod words;
