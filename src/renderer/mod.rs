//! Renderer-facing frame data
//!
//! The external 3D engine draws from a `RenderFrame` built once per frame.
//! Nothing here reads back from the engine.

pub mod frame;

pub use frame::{CameraPose, FxLevels, GroundFrame, Instance, RenderFrame, Shape, WaveFrame};
