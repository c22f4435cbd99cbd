//! Interactive front ends for the search session.

pub mod cli;

pub use cli::CliChannel;
