//! Scripted scenarios exercising the aggregation and interaction invariants.

use serde::Serialize;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScenarioId {
    /// CV-001: Partition law, rate bounds, grid bounds, sparsity
    Partition,

    /// CV-002: Rebuild idempotence (cells, statistics, identifiers)
    Rebuild,

    /// CV-003: Hover every cell; neighbor symmetry and threshold
    Sweep,

    /// CV-004: Select/drill-down transition guards and stale-id tolerance
    Inspect,

    /// CV-005: Out-of-catalog tag rejects the whole aggregation run
    Mismatch,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Partition,
            ScenarioId::Rebuild,
            ScenarioId::Sweep,
            ScenarioId::Inspect,
            ScenarioId::Mismatch,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Partition => "partition",
            ScenarioId::Rebuild => "rebuild",
            ScenarioId::Sweep => "sweep",
            ScenarioId::Inspect => "inspect",
            ScenarioId::Mismatch => "mismatch",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Partition => "every record lands in exactly one cell; rates stay in [0,1]",
            ScenarioId::Rebuild => "rebuilding from identical input yields identical cells and ids",
            ScenarioId::Sweep => "hover sweep: neighbor symmetry, self-membership, threshold",
            ScenarioId::Inspect => "drill-down guards: select dismisses the table, stale ids no-op",
            ScenarioId::Mismatch => "an out-of-catalog tag aborts aggregation with no partial cube",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "partition" | "cv-001" => Ok(ScenarioId::Partition),
            "rebuild" | "cv-002" => Ok(ScenarioId::Rebuild),
            "sweep" | "cv-003" => Ok(ScenarioId::Sweep),
            "inspect" | "cv-004" => Ok(ScenarioId::Inspect),
            "mismatch" | "cv-005" => Ok(ScenarioId::Mismatch),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>(), Ok(scenario));
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        assert!("chaos".parse::<ScenarioId>().is_err());
    }
}
