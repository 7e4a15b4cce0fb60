//! Panel Pop (workspace facade crate).
//!
//! Re-exports the board simulation, input mapping and terminal renderer that
//! live in dedicated crates under `crates/`, plus the command-line plumbing
//! shared by the binary and the integration tests.

pub mod cli;

pub use panel_pop_core as core;
pub use panel_pop_input as input;
pub use panel_pop_term as term;
pub use panel_pop_types as types;
