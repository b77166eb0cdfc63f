//! Representation and handling of circuits

#[allow(clippy::module_inception)]
mod circuit;
mod component;
pub mod generators;
mod kind;
pub mod stats;

pub use circuit::{Circuit, Wire, WireId};
pub use component::{snap_to_grid, Component, ComponentId, Placement, Rotation, GRID_SIZE};
pub use kind::ComponentKind;
