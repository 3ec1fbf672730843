//! CubeView Core - Dimensional Aggregation for Engagement Telemetry
//!
//! Turns a flat table of per-user session records into a small OLAP cube:
//! 1. **Aggregation**: partition records over three fixed categorical axes
//!    (day context, device, content category) into summarized cells
//! 2. **Layout**: deterministic origin-centered 3D positions for renderers
//! 3. **Interaction**: an explicit hover/selection/drill-down state machine
//!    decoupled from any rendering framework
//!
//! Rendering is an external consumer: it receives cells and a selection
//! snapshot and draws them. This crate does no I/O and holds no global state.

pub mod catalog;
pub mod cube;
pub mod layout;
pub mod records;
pub mod selection;
pub mod summary;

// Re-export key types for convenience
pub use catalog::{Axis, CatalogError, DimensionCatalog};
pub use cube::{build_cube, Cell, CellId, Cube, CubeError};
pub use layout::LayoutConfig;
pub use records::{parse_records, ParseError, SessionRecord};
pub use selection::{neighbors_of, Mode, SelectionSnapshot, SelectionState};
pub use summary::CubeSummary;
