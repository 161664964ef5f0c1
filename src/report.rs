// Garden reports - text summaries and chart data
// Rendering-neutral: the TUI and the CLI both draw from these.

use crate::garden::{Garden, GardenStats};

/// Shown in place of the chart when nothing is planted
pub const EMPTY_GARDEN: &str = "No trees in the garden";

pub const CHART_TITLE: &str = "CO2 capture per tree type";
pub const CHART_UNIT: &str = "kg/year";

/// One bar of the absorption chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,

    /// count × rate
    pub value: f64,

    /// Value as printed above the bar
    pub text: String,
}

/// Multi-line statistics, as shown by the "compute" action
pub fn summary(stats: &GardenStats) -> String {
    let mut lines = vec![
        "Garden statistics:".to_string(),
        format!("- Total number of trees: {}", stats.total_count),
        format!("- Total CO2 capture: {:.2} {}", stats.total_rate, CHART_UNIT),
        String::new(),
        "Trees by type:".to_string(),
    ];

    lines.extend(breakdown_lines(stats));
    lines.join("\n")
}

fn breakdown_lines(stats: &GardenStats) -> Vec<String> {
    stats
        .breakdown
        .iter()
        .map(|(name, count)| format!("- {}: {}", name, count))
        .collect()
}

/// One-line description of what is planted
pub fn garden_line(garden: &Garden) -> String {
    let entries: Vec<String> = garden
        .plantings()
        .map(|p| format!("{} ({})", p.tree().name(), p.count()))
        .collect();

    format!("Current garden: {}", entries.join(", "))
}

/// Bars for every planted tree type; empty when the garden is empty
pub fn chart_bars(garden: &Garden) -> Vec<ChartBar> {
    garden
        .absorption_by_tree()
        .into_iter()
        .map(|(name, value)| ChartBar {
            label: name.to_string(),
            value,
            text: format!("{:.1}", value),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Tree;

    fn sample_garden() -> Garden {
        let mut garden = Garden::new();
        let oak = Tree::shared("Oak", 22.0);
        garden.increment(&oak);
        garden.increment(&oak);
        garden.increment(&oak);
        garden.increment(&Tree::shared("Pine", 20.0));
        garden
    }

    #[test]
    fn test_summary_text() {
        let text = summary(&sample_garden().aggregate());

        assert_eq!(
            text,
            "Garden statistics:\n\
             - Total number of trees: 4\n\
             - Total CO2 capture: 86.00 kg/year\n\
             \n\
             Trees by type:\n\
             - Oak: 3\n\
             - Pine: 1"
        );
    }

    #[test]
    fn test_summary_of_empty_garden() {
        let text = summary(&Garden::new().aggregate());
        assert!(text.contains("Total number of trees: 0"));
        assert!(text.contains("0.00 kg/year"));
        assert!(text.ends_with("Trees by type:"));
    }

    #[test]
    fn test_garden_line() {
        assert_eq!(garden_line(&sample_garden()), "Current garden: Oak (3), Pine (1)");
        assert_eq!(garden_line(&Garden::new()), "Current garden: ");
    }

    #[test]
    fn test_chart_bars() {
        let bars = chart_bars(&sample_garden());

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Oak");
        assert_eq!(bars[0].value, 66.0);
        assert_eq!(bars[0].text, "66.0");
        assert_eq!(bars[1].text, "20.0");

        assert!(chart_bars(&Garden::new()).is_empty());
    }
}
