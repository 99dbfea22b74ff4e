//! # SeamKit Toolpath
//!
//! Turns concentric circular rings into printer motion instructions.
//!
//! ## Pipeline
//!
//! - **Geometry**: evenly spaced points on a circle, closed into a [`Ring`]
//! - **Segments**: directed edges with cached lengths
//! - **Flow**: bead volume to filament length
//! - **Motion**: one segment at a target height to one `G1` instruction
//! - **Layer**: retract, travel, raise, un-retract, then the ramped seam
//!   blend (up-ramp, flat run, down-ramp) for one ring at one height
//! - **G-code**: text rendering and file output
//! - **Print**: the full multi-ring, multi-layer program

pub mod flow;
pub mod gcode;
pub mod geometry;
pub mod layer;
pub mod motion;
pub mod print;
pub mod segment;

pub use seamkit_core::ToolpathError;

pub use flow::FlowCalculator;
pub use gcode::{GcodeFormatter, GcodeProgram, ProgramLine};
pub use geometry::{concentric_rings, points_on_circle, CircleSpec, Point};
pub use layer::{LayerBuilder, LayerPlan, LayerRequest};
pub use motion::{MotionEmitter, MotionInstruction, MotionTag};
pub use print::{ConcentricPrintGenerator, PrintParameters};
pub use segment::{Ring, Segment};

/// Result type alias for toolpath operations.
pub type ToolpathResult<T> = Result<T, ToolpathError>;
