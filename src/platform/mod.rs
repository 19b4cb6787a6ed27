//! Platform abstraction layer
//!
//! The browser adapter wraps a `Session` for JavaScript hosts. Native builds
//! drive `Session` directly and need nothing from here.

#[cfg(target_arch = "wasm32")]
pub mod web;
