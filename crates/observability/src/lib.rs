//! Tracing/logging setup shared by storefront binaries and tests.

pub mod subscriber;

pub use subscriber::{LogFormat, init, init_with};
