//! Global dashboard metrics derived from a built cube.
//!
//! Presentation-facing rollup of the whole cube: volume, session count,
//! weighted flag rates, and the dominant content category by total
//! minutes. Pure derivation; nothing here feeds back into aggregation.

use std::collections::HashMap;

use serde::Serialize;

use crate::cube::Cube;

/// Cube-wide rollup for the dashboard overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CubeSummary {
    /// Total contributing sessions
    pub total_sessions: usize,
    pub total_minutes: f64,
    /// Session-weighted completion rate [0, 1]
    pub completion_rate: f64,
    /// Session-weighted binge rate [0, 1]
    pub binge_rate: f64,
    /// Session-weighted recommendation rate [0, 1]
    pub recommendation_rate: f64,
    /// Total minutes per content category, descending (ties by name)
    pub minutes_by_content: Vec<(String, f64)>,
    /// Content category with the most total minutes
    pub dominant_content: Option<String>,
}

impl CubeSummary {
    pub fn from_cube(cube: &Cube) -> Self {
        let mut total_sessions = 0usize;
        let mut total_minutes = 0.0;
        let mut completed = 0.0;
        let mut binge = 0.0;
        let mut recommended = 0.0;
        let mut by_content: HashMap<String, f64> = HashMap::new();

        for cell in cube.cells() {
            let weight = cell.count as f64;
            total_sessions += cell.count;
            total_minutes += cell.total_minutes;
            completed += cell.completion_rate * weight;
            binge += cell.binge_rate * weight;
            recommended += cell.recommended_rate * weight;
            *by_content.entry(cell.content_type.clone()).or_default() += cell.total_minutes;
        }

        let mut minutes_by_content: Vec<(String, f64)> = by_content.into_iter().collect();
        minutes_by_content.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let dominant_content = minutes_by_content.first().map(|(c, _)| c.clone());

        let rate = |weighted: f64| {
            if total_sessions > 0 {
                weighted / total_sessions as f64
            } else {
                0.0
            }
        };

        Self {
            total_sessions,
            total_minutes,
            completion_rate: rate(completed),
            binge_rate: rate(binge),
            recommendation_rate: rate(recommended),
            minutes_by_content,
            dominant_content,
        }
    }

    pub fn total_hours(&self) -> f64 {
        self.total_minutes / 60.0
    }

    /// Print a formatted report to the console.
    pub fn print(&self) {
        println!();
        println!("╔══════════════════════════════════════════════╗");
        println!("║            CUBEVIEW GLOBAL METRICS           ║");
        println!("╠══════════════════════════════════════════════╣");
        println!("║ Sessions:           {:>10}               ║", self.total_sessions);
        println!("║ Total Volume:       {:>10.1} hrs           ║", self.total_hours());
        println!("║ Completion Rate:    {:>10.1}%              ║", self.completion_rate * 100.0);
        println!("║ Binge Rate:         {:>10.1}%              ║", self.binge_rate * 100.0);
        println!("║ Recommended Rate:   {:>10.1}%              ║", self.recommendation_rate * 100.0);
        println!("╚══════════════════════════════════════════════╝");

        if !self.minutes_by_content.is_empty() {
            println!();
            println!("Content Categories by Total Minutes:");
            println!("─────────────────────────────────────");
            for (content, minutes) in &self.minutes_by_content {
                println!("  {:<12} {:>8.0} min", content, minutes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DimensionCatalog;
    use crate::cube::build_cube;
    use crate::records::SessionRecord;
    use approx::assert_relative_eq;

    fn record(content: &str, minutes: f64, completed: bool) -> SessionRecord {
        SessionRecord {
            user_id: format!("U-{content}-{minutes}"),
            hour: 18,
            day_type: "weekday".into(),
            device: "mobile".into(),
            content_type: content.to_string(),
            minutes,
            recommended: completed,
            completed,
            binge: false,
        }
    }

    fn catalog() -> DimensionCatalog {
        DimensionCatalog::new(
            vec!["weekday".into()],
            vec!["mobile".into()],
            vec!["music".into(), "video".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_summary_rollup() {
        let records = vec![
            record("music", 10.0, false),
            record("music", 20.0, true),
            record("video", 60.0, true),
            record("video", 30.0, true),
        ];
        let cube = build_cube(&records, &catalog()).unwrap();
        let summary = CubeSummary::from_cube(&cube);

        assert_eq!(summary.total_sessions, 4);
        assert_relative_eq!(summary.total_minutes, 120.0);
        assert_relative_eq!(summary.total_hours(), 2.0);
        assert_relative_eq!(summary.completion_rate, 0.75, epsilon = 1e-9);
        assert_eq!(summary.dominant_content.as_deref(), Some("video"));
        assert_eq!(summary.minutes_by_content[0], ("video".into(), 90.0));
    }

    #[test]
    fn test_empty_cube_zeroed_summary() {
        let cube = build_cube(&[], &catalog()).unwrap();
        let summary = CubeSummary::from_cube(&cube);
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.completion_rate, 0.0);
        assert_eq!(summary.dominant_content, None);
    }
}
