//! School Match: profile in, recommended schools out.

pub mod channels;
pub mod config;
pub mod error;
pub mod form;
pub mod llm;
pub mod messages;
pub mod render;
pub mod schools;
pub mod session;
