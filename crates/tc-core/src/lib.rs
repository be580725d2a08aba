//! Core of a tropical-cyclone detection engine: grid geometry, vorticity
//! and anomaly fields, the criterion cascade, de-duplication and the
//! relaxation mask that ties steps together.
//!
//! I/O, CLI and calendar concerns live outside this crate; see the
//! `FieldReader`, `DetectionWriter` and `RelaxMaskStore` traits in
//! [`engine`] for the boundary.

pub mod anomaly;
pub mod boxes;
pub mod config;
pub mod dedup;
pub mod detect;
pub mod engine;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod grid;
pub mod ocs;
pub mod relax;
pub mod stencil;
pub mod vorticity;

pub use config::Configuration;
pub use detect::Detection;
pub use engine::{DetectionWriter, Engine, FieldReader, RelaxMaskStore, StepTimestamp};
pub use error::{EngineError, Result};
pub use fields::{DerivedFrame, Field2D, Field3D, FieldFrame};
pub use geometry::GeometryTable;
pub use grid::Grid;
pub use relax::RelaxMask;
