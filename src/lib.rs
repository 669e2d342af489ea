//! Delayed match-to-sample: trial timeline plus leaky evidence accumulator.

#[path = "core/accumulator.rs"]
pub mod accumulator;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/integrate.rs"]
pub mod integrate;

#[path = "core/pointer.rs"]
pub mod pointer;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/sequencer.rs"]
pub mod sequencer;

#[path = "core/vocab.rs"]
pub mod vocab;

pub mod model;
pub mod observer;

pub use error::{Error, Result};
