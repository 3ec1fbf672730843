//! Dimension Catalog - the fixed, ordered value sets for the three axes.
//!
//! Value order defines the grid index 0..k-1 on each axis, so the catalog
//! is immutable after construction: changing an axis cardinality would
//! invalidate every existing cell coordinate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three categorical axes of the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Day context (weekday vs weekend)
    X,
    /// Device class
    Y,
    /// Content category
    Z,
}

impl Axis {
    /// Human-readable label for dashboards and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::X => "day type",
            Axis::Y => "device",
            Axis::Z => "content type",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Errors raised while constructing a catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// An axis was given an empty value list.
    #[error("{0} axis has no values")]
    EmptyAxis(Axis),

    /// An axis lists the same value twice.
    #[error("{0} axis lists duplicate value '{1}'")]
    DuplicateValue(Axis, String),

    /// Blank strings cannot serve as categorical values.
    #[error("{0} axis contains a blank value")]
    BlankValue(Axis),
}

/// The ordered value sets for the three cube axes.
///
/// Defines the total addressable cell space |X| x |Y| x |Z|. The cube is
/// sparse: combinations with no matching records produce no cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionCatalog {
    day_types: Vec<String>,
    devices: Vec<String>,
    content_types: Vec<String>,
}

impl DimensionCatalog {
    /// Build a catalog, rejecting empty axes, blank values, and duplicates.
    pub fn new(
        day_types: Vec<String>,
        devices: Vec<String>,
        content_types: Vec<String>,
    ) -> Result<Self, CatalogError> {
        validate_axis(Axis::X, &day_types)?;
        validate_axis(Axis::Y, &devices)?;
        validate_axis(Axis::Z, &content_types)?;
        Ok(Self {
            day_types,
            devices,
            content_types,
        })
    }

    /// The catalog of the bundled streaming-telemetry demo domain.
    pub fn streaming_default() -> Self {
        Self {
            day_types: vec!["weekday".into(), "weekend".into()],
            devices: vec!["mobile".into(), "desktop".into()],
            content_types: vec![
                "music".into(),
                "news".into(),
                "search".into(),
                "podcast".into(),
                "video".into(),
            ],
        }
    }

    /// The ordered values on one axis.
    pub fn values(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::X => &self.day_types,
            Axis::Y => &self.devices,
            Axis::Z => &self.content_types,
        }
    }

    /// Grid index of `value` on `axis`, or `None` if it is out of catalog.
    pub fn index_of(&self, axis: Axis, value: &str) -> Option<usize> {
        self.values(axis).iter().position(|v| v == value)
    }

    /// Cardinality of one axis.
    pub fn len(&self, axis: Axis) -> usize {
        self.values(axis).len()
    }

    /// Cardinalities of (X, Y, Z) in order.
    pub fn lens(&self) -> [usize; 3] {
        [self.day_types.len(), self.devices.len(), self.content_types.len()]
    }

    /// Total addressable cell space |X| x |Y| x |Z|.
    pub fn cell_space(&self) -> usize {
        self.lens().iter().product()
    }
}

fn validate_axis(axis: Axis, values: &[String]) -> Result<(), CatalogError> {
    if values.is_empty() {
        return Err(CatalogError::EmptyAxis(axis));
    }
    for (i, value) in values.iter().enumerate() {
        if value.trim().is_empty() {
            return Err(CatalogError::BlankValue(axis));
        }
        if values[..i].contains(value) {
            return Err(CatalogError::DuplicateValue(axis, value.clone()));
        }
    }
    Ok(())
}
