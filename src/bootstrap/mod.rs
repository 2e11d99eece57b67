//! The view bootstrap: one greeting, one awaited host call, one error channel.

pub mod failure;
pub mod handler;
pub mod sink;

pub use handler::ReadyHandler;
