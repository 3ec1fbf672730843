//! Scenario execution against the aggregation engine and selection state.

use std::collections::{HashMap, HashSet};

use cubeview_core::{
    build_cube, neighbors_of, CellId, Cube, CubeError, DimensionCatalog, SelectionState,
    SessionRecord,
};
use serde::Serialize;
use tracing::debug;

use crate::dataset;
use crate::generator::WorkloadGenerator;
use crate::scenarios::ScenarioId;

/// Float tolerance for aggregate statistics checks.
const EPSILON: f64 = 1e-9;

/// Counters accumulated while a scenario runs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioMetrics {
    /// Records in the workload
    pub records: usize,
    /// Cells in the built cube
    pub cells: usize,
    /// Selection-state transitions driven
    pub transitions: usize,
    /// Neighbor-set evaluations performed
    pub neighbor_checks: usize,
}

/// Outcome of one scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: ScenarioId,
    pub seed: u64,
    pub passed: bool,
    pub failure_reason: Option<String>,
    pub metrics: ScenarioMetrics,
}

/// Runs scenarios against a seeded synthetic workload or the bundled
/// demo dataset.
pub struct ScenarioRunner {
    seed: u64,
    record_count: usize,
    use_demo_data: bool,
}

impl ScenarioRunner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            record_count: 400,
            use_demo_data: false,
        }
    }

    /// Size of the synthetic workload (ignored with demo data).
    pub fn with_records(mut self, record_count: usize) -> Self {
        self.record_count = record_count;
        self
    }

    /// Run against the bundled 40-row demo dataset instead of a
    /// generated workload.
    pub fn with_demo_data(mut self, use_demo_data: bool) -> Self {
        self.use_demo_data = use_demo_data;
        self
    }

    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        debug!("running scenario '{}' (seed={})", scenario, self.seed);
        let outcome = match scenario {
            ScenarioId::Partition => self.run_partition(),
            ScenarioId::Rebuild => self.run_rebuild(),
            ScenarioId::Sweep => self.run_sweep(),
            ScenarioId::Inspect => self.run_inspect(),
            ScenarioId::Mismatch => self.run_mismatch(),
        };

        match outcome {
            Ok(metrics) => ScenarioResult {
                scenario,
                seed: self.seed,
                passed: true,
                failure_reason: None,
                metrics,
            },
            Err(reason) => ScenarioResult {
                scenario,
                seed: self.seed,
                passed: false,
                failure_reason: Some(reason),
                metrics: ScenarioMetrics::default(),
            },
        }
    }

    fn workload(&self) -> (Vec<SessionRecord>, DimensionCatalog) {
        if self.use_demo_data {
            (dataset::demo_records(), dataset::demo_catalog())
        } else {
            let mut gen = WorkloadGenerator::new(self.seed);
            let catalog = gen.catalog().clone();
            (gen.records(self.record_count), catalog)
        }
    }

    fn build(&self) -> Result<(Vec<SessionRecord>, Cube), String> {
        let (records, catalog) = self.workload();
        let cube =
            build_cube(&records, &catalog).map_err(|e| format!("aggregation failed: {e}"))?;
        Ok((records, cube))
    }

    /// CV-001: the cube partitions the workload exactly.
    fn run_partition(&self) -> Result<ScenarioMetrics, String> {
        let (records, catalog) = self.workload();
        let cube =
            build_cube(&records, &catalog).map_err(|e| format!("aggregation failed: {e}"))?;

        if cube.total_records() != records.len() {
            return Err(format!(
                "partition law violated: {} records in, {} across cells",
                records.len(),
                cube.total_records()
            ));
        }

        let mut contributed: Vec<&str> = cube
            .cells()
            .iter()
            .flat_map(|c| c.records.iter().map(|r| r.user_id.as_str()))
            .collect();
        contributed.sort_unstable();
        let mut expected: Vec<&str> = records.iter().map(|r| r.user_id.as_str()).collect();
        expected.sort_unstable();
        if contributed != expected {
            return Err("a record was dropped or duplicated across cells".to_string());
        }

        let lens = catalog.lens();
        let mut grids = HashSet::new();
        for cell in cube.cells() {
            if cell.count == 0 {
                return Err(format!("{} has count 0", cell.id));
            }
            for rate in [cell.recommended_rate, cell.completion_rate, cell.binge_rate] {
                if !(0.0..=1.0).contains(&rate) {
                    return Err(format!("{} has rate {} outside [0,1]", cell.id, rate));
                }
            }
            if (cell.avg_minutes - cell.total_minutes / cell.count as f64).abs() > EPSILON {
                return Err(format!("{} mean disagrees with sum/count", cell.id));
            }
            for (axis, (&g, &len)) in cell.grid.iter().zip(lens.iter()).enumerate() {
                if g >= len {
                    return Err(format!("{} grid index {} out of bounds on axis {}", cell.id, g, axis));
                }
            }
            if !grids.insert(cell.grid) {
                return Err(format!("duplicate grid coordinates {:?}", cell.grid));
            }
        }

        if cube.len() > catalog.cell_space() {
            return Err("more cells than addressable combinations".to_string());
        }

        Ok(ScenarioMetrics {
            records: records.len(),
            cells: cube.len(),
            ..Default::default()
        })
    }

    /// CV-002: rebuilding from identical input is idempotent.
    fn run_rebuild(&self) -> Result<ScenarioMetrics, String> {
        let (records, catalog) = self.workload();
        let first =
            build_cube(&records, &catalog).map_err(|e| format!("first build failed: {e}"))?;
        let second =
            build_cube(&records, &catalog).map_err(|e| format!("second build failed: {e}"))?;

        if first.cells() != second.cells() {
            return Err("rebuild produced different cells".to_string());
        }

        Ok(ScenarioMetrics {
            records: records.len(),
            cells: first.len(),
            ..Default::default()
        })
    }

    /// CV-003: hover every cell; the neighbor relation behaves.
    fn run_sweep(&self) -> Result<ScenarioMetrics, String> {
        let (records, cube) = self.build()?;

        let mut neighbor_sets: HashMap<&CellId, HashSet<CellId>> = HashMap::new();
        for cell in cube.cells() {
            neighbor_sets.insert(&cell.id, neighbors_of(&cell.id, &cube));
        }

        for cell in cube.cells() {
            let neighbors = &neighbor_sets[&cell.id];
            if !neighbors.contains(&cell.id) {
                return Err(format!("{} is not its own neighbor", cell.id));
            }
            for other in cube.cells() {
                // Reference metric: integer squared grid distance <= 2
                let d2: i64 = cell
                    .grid
                    .iter()
                    .zip(other.grid.iter())
                    .map(|(&a, &b)| {
                        let d = a as i64 - b as i64;
                        d * d
                    })
                    .sum();
                let expected = d2 <= 2;
                if neighbors.contains(&other.id) != expected {
                    return Err(format!(
                        "{} vs {} (d^2={}) misclassified",
                        cell.id, other.id, d2
                    ));
                }
                if neighbors.contains(&other.id) != neighbor_sets[&other.id].contains(&cell.id) {
                    return Err(format!("asymmetry between {} and {}", cell.id, other.id));
                }
            }
        }

        // Hovering must never disturb the selection
        let mut state = SelectionState::new();
        let mut transitions = 0;
        if let Some(first) = cube.cells().first() {
            state.select(&first.id, &cube);
            transitions += 1;
            for cell in cube.cells() {
                state.hover(&cell.id, &cube);
                transitions += 1;
                if state.snapshot().selected.as_ref() != Some(&first.id) {
                    return Err(format!("hovering {} changed the selection", cell.id));
                }
            }
        }

        Ok(ScenarioMetrics {
            records: records.len(),
            cells: cube.len(),
            transitions,
            neighbor_checks: cube.len() * cube.len(),
        })
    }

    /// CV-004: drill-down transition guards.
    fn run_inspect(&self) -> Result<ScenarioMetrics, String> {
        let (records, cube) = self.build()?;
        if cube.len() < 2 {
            return Err("inspect needs at least two cells".to_string());
        }

        let first = cube.cells()[0].id.clone();
        let second = cube.cells()[1].id.clone();
        let mut state = SelectionState::new();
        let mut transitions = 0;

        // Opening without a selection must be a no-op
        state.open_drill_down();
        transitions += 1;
        if state.snapshot().drill_down_open {
            return Err("drill-down opened without a selection".to_string());
        }

        state.select(&first, &cube);
        state.open_drill_down();
        transitions += 2;
        let snap = state.snapshot();
        if !snap.drill_down_open || snap.selected.as_ref() != Some(&first) {
            return Err("select + open did not reach drill-down".to_string());
        }

        // Switching the inspected segment dismisses the open table
        state.select(&second, &cube);
        transitions += 1;
        let snap = state.snapshot();
        if snap.drill_down_open {
            return Err("selecting a new cell left drill-down open".to_string());
        }
        if snap.selected.as_ref() != Some(&second) {
            return Err("selection did not move to the new cell".to_string());
        }

        // Stale identifiers (e.g. after a data refresh) must be no-ops
        let stale = CellId::from("cell-9999");
        let before = state.snapshot();
        state.select(&stale, &cube);
        state.hover(&stale, &cube);
        transitions += 2;
        if state.snapshot() != before {
            return Err("an unknown cell id mutated the state".to_string());
        }

        // close keeps the selection, deselect clears everything
        state.open_drill_down();
        state.close_drill_down();
        transitions += 2;
        let snap = state.snapshot();
        if snap.drill_down_open || snap.selected.as_ref() != Some(&second) {
            return Err("close_drill_down disturbed the selection".to_string());
        }
        state.deselect();
        transitions += 1;
        let snap = state.snapshot();
        if snap.selected.is_some() || snap.drill_down_open {
            return Err("deselect left residual state".to_string());
        }

        Ok(ScenarioMetrics {
            records: records.len(),
            cells: cube.len(),
            transitions,
            ..Default::default()
        })
    }

    /// CV-005: catalog mismatch rejects the whole run.
    fn run_mismatch(&self) -> Result<ScenarioMetrics, String> {
        let (mut records, catalog) = self.workload();
        let clean_cells = build_cube(&records, &catalog)
            .map_err(|e| format!("clean build failed: {e}"))?
            .len();

        records.push(SessionRecord {
            user_id: "U-BAD".into(),
            hour: 12,
            day_type: "weekday".into(),
            device: "mobile".into(),
            content_type: "vr_stream".into(),
            minutes: 10.0,
            recommended: false,
            completed: false,
            binge: false,
        });

        match build_cube(&records, &catalog) {
            Err(CubeError::CatalogMismatch { user_id, value, .. }) => {
                if user_id != "U-BAD" || value != "vr_stream" {
                    return Err(format!(
                        "mismatch error cites '{user_id}'/'{value}' instead of the bad record"
                    ));
                }
            }
            Err(other) => return Err(format!("unexpected error: {other}")),
            Ok(_) => return Err("out-of-catalog tag did not abort aggregation".to_string()),
        }

        Ok(ScenarioMetrics {
            records: records.len(),
            cells: clean_cells,
            ..Default::default()
        })
    }
}
