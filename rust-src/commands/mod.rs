//! CLI command implementations.

pub mod export;
pub mod print;
pub mod watch;
