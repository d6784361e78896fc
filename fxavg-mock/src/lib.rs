//! fxavg-mock
//!
//! A transport whose responses are scripted per URL prefix by a controller,
//! and fixture builders for the two provider payload shapes.

mod dynamic;
pub mod fixtures;

pub use dynamic::{MockBehavior, MockTransport, MockTransportController};
