//! The Aggregation Engine - flat session records in, summarized cells out.
//!
//! `build_cube` partitions records by the Cartesian product of the three
//! catalog axes and emits one `Cell` per non-empty bucket:
//! - Single O(records) grouping pass keyed by the grid index triple
//! - Canonical emission order: X outer, Y middle, Z inner
//! - Sequential `cell-<n>` identifiers assigned in that order, so
//!   rebuilding from identical input is idempotent
//! - A record with an out-of-catalog tag aborts the whole run; no partial
//!   cube is ever published

use std::collections::HashMap;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Axis, DimensionCatalog};
use crate::layout::{centered_position, LayoutConfig};
use crate::records::SessionRecord;

/// Stable cell identifier, `cell-<n>` with `n` counted 1-based in canonical
/// traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    fn from_counter(n: usize) -> Self {
        CellId(format!("cell-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CellId {
    fn from(s: &str) -> Self {
        CellId(s.to_string())
    }
}

/// Errors that abort an aggregation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CubeError {
    /// A record carries a tag that is not in the catalog's value set for
    /// its axis. The whole run is rejected: a catalog/data mismatch means
    /// no cell can be trusted.
    #[error("record '{user_id}': {axis} tag '{value}' is not in the catalog")]
    CatalogMismatch {
        user_id: String,
        axis: Axis,
        value: String,
    },
}

/// One non-empty bucket of the cube, with aggregated statistics.
///
/// Cells only exist for dimensional combinations that at least one record
/// maps to, and are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    /// X-axis tag value
    pub day_type: String,
    /// Y-axis tag value
    pub device: String,
    /// Z-axis tag value
    pub content_type: String,
    /// Grid indices on (X, Y, Z), each in [0, axis length)
    pub grid: [usize; 3],
    /// Origin-centered, unscaled layout coordinates
    pub centered: Vector3<f64>,
    /// Number of contributing records
    pub count: usize,
    pub total_minutes: f64,
    pub avg_minutes: f64,
    /// Fraction of contributing sessions started from a recommendation
    pub recommended_rate: f64,
    /// Fraction of contributing sessions completed
    pub completion_rate: f64,
    /// Fraction of contributing sessions flagged as binge
    pub binge_rate: f64,
    /// Contributing records sorted by descending duration, ties in input
    /// order. Drill-down presentation order only; aggregation does not
    /// depend on it.
    pub records: Vec<SessionRecord>,
}

impl Cell {
    /// Scaled 3D layout position for rendering consumers.
    pub fn position(&self, config: &LayoutConfig) -> Vector3<f64> {
        self.centered * config.spacing
    }
}

/// The full set of cells produced by one aggregation run.
///
/// Immutable after construction. A data refresh builds a new `Cube` off to
/// the side and swaps the published value whole, so concurrent readers
/// never observe a partially built cube.
#[derive(Debug, Clone, Serialize)]
pub struct Cube {
    cells: Vec<Cell>,
    #[serde(skip)]
    by_id: HashMap<CellId, usize>,
    lens: [usize; 3],
}

impl Cube {
    /// Cells in canonical traversal order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Look up a cell by identifier.
    pub fn get(&self, id: &CellId) -> Option<&Cell> {
        self.by_id.get(id).map(|&i| &self.cells[i])
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of non-empty cells. Zero is a valid state, not an error.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Axis cardinalities of the catalog this cube was built against.
    pub fn axis_lens(&self) -> [usize; 3] {
        self.lens
    }

    /// Total contributing records across all cells. Equals the input
    /// record count (the aggregation is a partition).
    pub fn total_records(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }
}

/// Aggregate records into a cube of non-empty cells.
///
/// Pure function of `(records, catalog)`: no side effects, and identical
/// inputs yield identical cells and identifiers. Every record is validated
/// against the catalog during the grouping pass, so a mismatch aborts
/// before any cell is emitted.
pub fn build_cube(
    records: &[SessionRecord],
    catalog: &DimensionCatalog,
) -> Result<Cube, CubeError> {
    let mut groups: HashMap<[usize; 3], Vec<usize>> = HashMap::new();
    for (idx, record) in records.iter().enumerate() {
        groups.entry(grid_key(record, catalog)?).or_default().push(idx);
    }

    let lens = catalog.lens();
    let [nx, ny, nz] = lens;
    let mut cells = Vec::with_capacity(groups.len());
    let mut by_id = HashMap::with_capacity(groups.len());
    let mut counter = 0;

    // Canonical traversal: X outer, Y middle, Z inner. Identifier
    // assignment depends on this order.
    for x in 0..nx {
        for y in 0..ny {
            for z in 0..nz {
                let Some(members) = groups.get(&[x, y, z]) else {
                    continue;
                };
                counter += 1;
                let cell = summarize(
                    CellId::from_counter(counter),
                    [x, y, z],
                    lens,
                    members,
                    records,
                    catalog,
                );
                by_id.insert(cell.id.clone(), cells.len());
                cells.push(cell);
            }
        }
    }

    Ok(Cube { cells, by_id, lens })
}

fn grid_key(record: &SessionRecord, catalog: &DimensionCatalog) -> Result<[usize; 3], CubeError> {
    let tag = |axis: Axis, value: &str| {
        catalog
            .index_of(axis, value)
            .ok_or_else(|| CubeError::CatalogMismatch {
                user_id: record.user_id.clone(),
                axis,
                value: value.to_string(),
            })
    };
    Ok([
        tag(Axis::X, &record.day_type)?,
        tag(Axis::Y, &record.device)?,
        tag(Axis::Z, &record.content_type)?,
    ])
}

fn summarize(
    id: CellId,
    grid: [usize; 3],
    lens: [usize; 3],
    members: &[usize],
    records: &[SessionRecord],
    catalog: &DimensionCatalog,
) -> Cell {
    let mut rows: Vec<SessionRecord> = members.iter().map(|&i| records[i].clone()).collect();
    // Stable sort keeps ties in input order
    rows.sort_by(|a, b| b.minutes.total_cmp(&a.minutes));

    let count = rows.len();
    let total_minutes: f64 = rows.iter().map(|r| r.minutes).sum();
    let recommended = rows.iter().filter(|r| r.recommended).count();
    let completed = rows.iter().filter(|r| r.completed).count();
    let binge = rows.iter().filter(|r| r.binge).count();

    Cell {
        id,
        day_type: catalog.values(Axis::X)[grid[0]].clone(),
        device: catalog.values(Axis::Y)[grid[1]].clone(),
        content_type: catalog.values(Axis::Z)[grid[2]].clone(),
        grid,
        centered: centered_position(grid, lens),
        count,
        total_minutes,
        avg_minutes: total_minutes / count as f64,
        recommended_rate: recommended as f64 / count as f64,
        completion_rate: completed as f64 / count as f64,
        binge_rate: binge as f64 / count as f64,
        records: rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(user: &str, day: &str, device: &str, content: &str, minutes: f64) -> SessionRecord {
        SessionRecord {
            user_id: user.to_string(),
            hour: 12,
            day_type: day.to_string(),
            device: device.to_string(),
            content_type: content.to_string(),
            minutes,
            recommended: false,
            completed: minutes >= 10.0,
            binge: false,
        }
    }

    fn small_catalog() -> DimensionCatalog {
        DimensionCatalog::new(
            vec!["weekday".into(), "weekend".into()],
            vec!["mobile".into(), "desktop".into()],
            vec!["music".into(), "video".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_single_bucket_aggregation() {
        let records = vec![
            record("U01", "weekday", "mobile", "music", 7.0),
            record("U02", "weekday", "mobile", "music", 12.0),
        ];
        let cube = build_cube(&records, &small_catalog()).unwrap();

        assert_eq!(cube.len(), 1);
        let cell = &cube.cells()[0];
        assert_eq!(cell.count, 2);
        assert_relative_eq!(cell.total_minutes, 19.0);
        assert_relative_eq!(cell.avg_minutes, 9.5);
        // Drill-down order: descending duration
        let minutes: Vec<f64> = cell.records.iter().map(|r| r.minutes).collect();
        assert_eq!(minutes, vec![12.0, 7.0]);
        assert_relative_eq!(cell.completion_rate, 0.5);
    }

    #[test]
    fn test_sparse_cube_emits_only_populated_cells() {
        // 2x2x2 space, 5 of 8 combinations populated
        let records = vec![
            record("U01", "weekday", "mobile", "music", 5.0),
            record("U02", "weekday", "mobile", "video", 30.0),
            record("U03", "weekday", "desktop", "video", 45.0),
            record("U04", "weekend", "mobile", "music", 15.0),
            record("U05", "weekend", "desktop", "video", 60.0),
        ];
        let cube = build_cube(&records, &small_catalog()).unwrap();
        assert_eq!(cube.len(), 5);
        assert_eq!(cube.total_records(), 5);
    }

    #[test]
    fn test_canonical_order_and_identifiers() {
        let records = vec![
            record("U01", "weekend", "desktop", "video", 60.0),
            record("U02", "weekday", "mobile", "music", 5.0),
            record("U03", "weekday", "desktop", "music", 9.0),
        ];
        let cube = build_cube(&records, &small_catalog()).unwrap();

        // X outer, Y middle, Z inner regardless of input order
        let grids: Vec<[usize; 3]> = cube.cells().iter().map(|c| c.grid).collect();
        assert_eq!(grids, vec![[0, 0, 0], [0, 1, 0], [1, 1, 1]]);
        let ids: Vec<&str> = cube.cells().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cell-1", "cell-2", "cell-3"]);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let records = vec![
            record("U01", "weekday", "mobile", "music", 7.0),
            record("U02", "weekend", "desktop", "video", 55.0),
            record("U03", "weekday", "mobile", "music", 12.0),
        ];
        let catalog = small_catalog();
        let a = build_cube(&records, &catalog).unwrap();
        let b = build_cube(&records, &catalog).unwrap();
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn test_partition_law() {
        let records = vec![
            record("U01", "weekday", "mobile", "music", 7.0),
            record("U02", "weekday", "desktop", "video", 40.0),
            record("U03", "weekend", "mobile", "music", 18.0),
            record("U04", "weekend", "mobile", "music", 6.0),
        ];
        let cube = build_cube(&records, &small_catalog()).unwrap();

        assert_eq!(cube.total_records(), records.len());
        let mut seen: Vec<&str> = cube
            .cells()
            .iter()
            .flat_map(|c| c.records.iter().map(|r| r.user_id.as_str()))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["U01", "U02", "U03", "U04"]);
    }

    #[test]
    fn test_out_of_catalog_tag_aborts_run() {
        let records = vec![
            record("U01", "weekday", "mobile", "music", 7.0),
            record("U02", "weekday", "tablet", "music", 9.0),
        ];
        let err = build_cube(&records, &small_catalog()).unwrap_err();
        assert_eq!(
            err,
            CubeError::CatalogMismatch {
                user_id: "U02".into(),
                axis: Axis::Y,
                value: "tablet".into(),
            }
        );
    }

    #[test]
    fn test_empty_input_yields_empty_cube() {
        let cube = build_cube(&[], &small_catalog()).unwrap();
        assert!(cube.is_empty());
        assert_eq!(cube.total_records(), 0);
    }

    #[test]
    fn test_duration_ties_keep_input_order() {
        let mut first = record("U01", "weekday", "mobile", "music", 10.0);
        first.hour = 8;
        let mut second = record("U02", "weekday", "mobile", "music", 10.0);
        second.hour = 9;
        let cube = build_cube(&[first, second], &small_catalog()).unwrap();
        let users: Vec<&str> = cube.cells()[0]
            .records
            .iter()
            .map(|r| r.user_id.as_str())
            .collect();
        assert_eq!(users, vec!["U01", "U02"]);
    }

    #[test]
    fn test_cell_position_scales_centered_coordinates() {
        let records = vec![record("U01", "weekend", "desktop", "video", 60.0)];
        let cube = build_cube(&records, &small_catalog()).unwrap();
        let cell = &cube.cells()[0];
        assert_relative_eq!(cell.centered, Vector3::new(0.5, 0.5, 0.5));

        let config = LayoutConfig { spacing: 2.0 };
        assert_relative_eq!(cell.position(&config), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_lookup_by_id() {
        let records = vec![record("U01", "weekday", "mobile", "music", 7.0)];
        let cube = build_cube(&records, &small_catalog()).unwrap();
        let id = CellId::from("cell-1");
        assert!(cube.contains(&id));
        assert_eq!(cube.get(&id).unwrap().count, 1);
        assert!(cube.get(&CellId::from("cell-99")).is_none());
    }

    #[test]
    fn test_cells_serialize() {
        let records = vec![record("U01", "weekday", "mobile", "music", 7.0)];
        let cube = build_cube(&records, &small_catalog()).unwrap();
        let json = serde_json::to_string(&cube).unwrap();
        assert!(json.contains("\"cell-1\""));
        assert!(json.contains("\"avg_minutes\":7.0"));
    }
}
