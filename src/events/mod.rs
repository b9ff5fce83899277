//! Generic publish/subscribe primitives

pub mod signal;

pub use signal::{ListenerKey, Signal, SignalSubscriber};
