//! Selection/Interaction State - hover, selection, and drill-down as an
//! explicit state machine.
//!
//! Hover and selection are independent: hovering never touches the
//! selection, and selecting never touches the hover. Drill-down is only
//! ever open on top of a selection, and selecting a different cell
//! dismisses any open drill-down so the inspected segment and the raw
//! table can never disagree.
//!
//! Every transition is a total, synchronous function. Operations citing a
//! cell identifier that is not in the current cube are silent no-ops,
//! which tolerates stale identifiers after a data refresh.

use std::collections::HashSet;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::cube::{CellId, Cube};

/// Squared grid-distance threshold for the neighbor relation. Face
/// neighbors (d^2 = 1) and edge diagonals (d^2 = 2) qualify; corner
/// diagonals (d^2 = 3) do not.
pub const NEIGHBOR_RADIUS_SQ: f64 = 2.5;

/// Derived interaction mode, for consumers that want a tagged view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Nothing hovered, nothing selected
    Idle,
    Hovering(CellId),
    Selected(CellId),
    /// A selection exists while a (possibly different) cell is hovered
    SelectedAndHovering { selected: CellId, hovered: CellId },
    /// The raw-record table is open for the selected cell
    DrillDown(CellId),
}

/// Read-only view of the interaction state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub hovered: Option<CellId>,
    pub selected: Option<CellId>,
    pub drill_down_open: bool,
}

/// Tracks at most one hovered and at most one selected cell, keyed by
/// identifier only - never by reference into cell data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    hovered: Option<CellId>,
    selected: Option<CellId>,
    drill_down_open: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hovered cell. Never touches the selection.
    pub fn hover(&mut self, id: &CellId, cube: &Cube) {
        if cube.contains(id) {
            self.hovered = Some(id.clone());
        }
    }

    /// Clear the hovered cell. Never touches the selection.
    pub fn unhover(&mut self) {
        self.hovered = None;
    }

    /// Select a cell, dismissing any open drill-down table.
    pub fn select(&mut self, id: &CellId, cube: &Cube) {
        if cube.contains(id) {
            self.selected = Some(id.clone());
            self.drill_down_open = false;
        }
    }

    /// Clear the selection and any open drill-down.
    pub fn deselect(&mut self) {
        self.selected = None;
        self.drill_down_open = false;
    }

    /// Open the raw-record table for the current selection. No-op when
    /// nothing is selected.
    pub fn open_drill_down(&mut self) {
        if self.selected.is_some() {
            self.drill_down_open = true;
        }
    }

    /// Close the raw-record table, keeping the selection.
    pub fn close_drill_down(&mut self) {
        self.drill_down_open = false;
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            hovered: self.hovered.clone(),
            selected: self.selected.clone(),
            drill_down_open: self.drill_down_open,
        }
    }

    pub fn mode(&self) -> Mode {
        match (&self.selected, &self.hovered, self.drill_down_open) {
            (Some(sel), _, true) => Mode::DrillDown(sel.clone()),
            (Some(sel), Some(hov), false) => Mode::SelectedAndHovering {
                selected: sel.clone(),
                hovered: hov.clone(),
            },
            (Some(sel), None, false) => Mode::Selected(sel.clone()),
            (None, Some(hov), _) => Mode::Hovering(hov.clone()),
            (None, None, _) => Mode::Idle,
        }
    }
}

/// Cells spatially grouped with `hovered` for presentation emphasis
/// (non-neighbors get dimmed by the renderer).
///
/// Membership: squared Euclidean distance between grid triples is at most
/// [`NEIGHBOR_RADIUS_SQ`]. The metric is symmetric and every cell is its
/// own neighbor. An unknown identifier yields the empty set.
pub fn neighbors_of(hovered: &CellId, cube: &Cube) -> HashSet<CellId> {
    let Some(center) = cube.get(hovered) else {
        return HashSet::new();
    };
    let origin = grid_vector(center.grid);
    cube.cells()
        .iter()
        .filter(|cell| (grid_vector(cell.grid) - origin).norm_squared() <= NEIGHBOR_RADIUS_SQ)
        .map(|cell| cell.id.clone())
        .collect()
}

fn grid_vector(grid: [usize; 3]) -> Vector3<f64> {
    Vector3::new(grid[0] as f64, grid[1] as f64, grid[2] as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DimensionCatalog;
    use crate::cube::build_cube;
    use crate::records::SessionRecord;

    fn record(user: &str, day: &str, device: &str, content: &str) -> SessionRecord {
        SessionRecord {
            user_id: user.to_string(),
            hour: 20,
            day_type: day.to_string(),
            device: device.to_string(),
            content_type: content.to_string(),
            minutes: 30.0,
            recommended: true,
            completed: true,
            binge: false,
        }
    }

    /// Fully populated 2x2x2 cube (ids cell-1 .. cell-8).
    fn full_cube() -> Cube {
        let catalog = DimensionCatalog::new(
            vec!["weekday".into(), "weekend".into()],
            vec!["mobile".into(), "desktop".into()],
            vec!["music".into(), "video".into()],
        )
        .unwrap();
        let mut records = Vec::new();
        for day in ["weekday", "weekend"] {
            for device in ["mobile", "desktop"] {
                for content in ["music", "video"] {
                    let user = format!("U-{day}-{device}-{content}");
                    records.push(record(&user, day, device, content));
                }
            }
        }
        build_cube(&records, &catalog).unwrap()
    }

    #[test]
    fn test_hover_never_touches_selection() {
        let cube = full_cube();
        let mut state = SelectionState::new();

        state.select(&CellId::from("cell-3"), &cube);
        state.hover(&CellId::from("cell-5"), &cube);
        let snap = state.snapshot();
        assert_eq!(snap.selected, Some(CellId::from("cell-3")));
        assert_eq!(snap.hovered, Some(CellId::from("cell-5")));

        state.unhover();
        assert_eq!(state.snapshot().selected, Some(CellId::from("cell-3")));
    }

    #[test]
    fn test_select_closes_drill_down() {
        let cube = full_cube();
        let mut state = SelectionState::new();

        state.select(&CellId::from("cell-3"), &cube);
        state.open_drill_down();
        assert!(state.snapshot().drill_down_open);

        state.select(&CellId::from("cell-7"), &cube);
        let snap = state.snapshot();
        assert!(!snap.drill_down_open);
        assert_eq!(snap.selected, Some(CellId::from("cell-7")));
    }

    #[test]
    fn test_drill_down_requires_selection() {
        let cube = full_cube();
        let mut state = SelectionState::new();

        state.open_drill_down();
        assert_eq!(state.snapshot(), SelectionState::new().snapshot());

        state.hover(&CellId::from("cell-1"), &cube);
        state.open_drill_down();
        assert!(!state.snapshot().drill_down_open);
    }

    #[test]
    fn test_deselect_clears_drill_down() {
        let cube = full_cube();
        let mut state = SelectionState::new();

        state.select(&CellId::from("cell-2"), &cube);
        state.open_drill_down();
        state.deselect();
        let snap = state.snapshot();
        assert_eq!(snap.selected, None);
        assert!(!snap.drill_down_open);
    }

    #[test]
    fn test_close_drill_down_keeps_selection() {
        let cube = full_cube();
        let mut state = SelectionState::new();

        state.select(&CellId::from("cell-2"), &cube);
        state.open_drill_down();
        state.close_drill_down();
        let snap = state.snapshot();
        assert_eq!(snap.selected, Some(CellId::from("cell-2")));
        assert!(!snap.drill_down_open);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let cube = full_cube();
        let mut state = SelectionState::new();

        state.hover(&CellId::from("cell-99"), &cube);
        state.select(&CellId::from("stale-id"), &cube);
        assert_eq!(state, SelectionState::new());
    }

    #[test]
    fn test_mode_progression() {
        let cube = full_cube();
        let mut state = SelectionState::new();
        assert_eq!(state.mode(), Mode::Idle);

        state.hover(&CellId::from("cell-1"), &cube);
        assert_eq!(state.mode(), Mode::Hovering(CellId::from("cell-1")));

        state.select(&CellId::from("cell-2"), &cube);
        assert_eq!(
            state.mode(),
            Mode::SelectedAndHovering {
                selected: CellId::from("cell-2"),
                hovered: CellId::from("cell-1"),
            }
        );

        state.unhover();
        assert_eq!(state.mode(), Mode::Selected(CellId::from("cell-2")));

        state.open_drill_down();
        assert_eq!(state.mode(), Mode::DrillDown(CellId::from("cell-2")));
    }

    #[test]
    fn test_neighbors_include_self_and_edge_diagonals() {
        let cube = full_cube();
        // cell-1 sits at grid [0,0,0]
        let neighbors = neighbors_of(&CellId::from("cell-1"), &cube);
        assert!(neighbors.contains(&CellId::from("cell-1")));

        for cell in cube.cells() {
            let d2: usize = cell.grid.iter().map(|&g| g * g).sum();
            assert_eq!(
                neighbors.contains(&cell.id),
                d2 <= 2,
                "grid {:?} misclassified",
                cell.grid
            );
        }
        // Corner diagonal [1,1,1] excluded: 8 cells, 7 within threshold
        assert_eq!(neighbors.len(), 7);
    }

    #[test]
    fn test_neighbor_relation_is_symmetric() {
        let cube = full_cube();
        for a in cube.cells() {
            let na = neighbors_of(&a.id, &cube);
            for b in cube.cells() {
                let nb = neighbors_of(&b.id, &cube);
                assert_eq!(na.contains(&b.id), nb.contains(&a.id));
            }
        }
    }

    #[test]
    fn test_neighbors_of_unknown_id_is_empty() {
        let cube = full_cube();
        assert!(neighbors_of(&CellId::from("cell-42"), &cube).is_empty());
    }
}
