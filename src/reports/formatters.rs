use crate::types::DagReport;
use anyhow::Result;

/// Trait for report formatters
pub trait ReportFormatter {
    fn format(&self, report: &DagReport) -> Result<String>;
}

/// Line-per-query text output:
/// `Ancestors of <name>: ...`, `Leaves: ...`, `Bisectors: ...`
pub struct TextFormatter {
    separator: String,
}

impl TextFormatter {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Sort before joining so output is stable across runs
    fn join(&self, names: &[String]) -> String {
        let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted.join(self.separator.as_str())
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(", ")
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &DagReport) -> Result<String> {
        let mut lines = Vec::new();

        if let Some(ancestors) = &report.ancestors {
            lines.push(format!(
                "Ancestors of {}: {}",
                ancestors.node,
                self.join(&ancestors.ancestors)
            ));
        }
        if let Some(leaves) = &report.leaves {
            lines.push(format!("Leaves: {}", self.join(leaves)));
        }
        if let Some(bisectors) = &report.bisectors {
            lines.push(format!("Bisectors: {}", self.join(bisectors)));
        }
        if let Some(stats) = &report.statistics {
            let score = stats
                .bisector_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string());
            lines.push(format!(
                "Statistics: nodes={}, edges={}, roots={}, leaves={}, bisector_score={}",
                stats.total_nodes, stats.total_edges, stats.root_nodes, stats.leaf_nodes, score
            ));
        }

        Ok(lines.join("\n"))
    }
}

/// JSON formatter
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &DagReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GraphStatistics;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_text_ancestors_line_is_sorted() {
        let report = DagReport::new().with_ancestors("D", strings(&["D", "B", "C", "A"]));
        let output = TextFormatter::default().format(&report).unwrap();

        assert_eq!(output, "Ancestors of D: A, B, C, D");
    }

    #[test]
    fn test_text_leaves_and_bisectors() {
        let report = DagReport::new()
            .with_leaves(strings(&["D"]))
            .with_bisectors(strings(&["C", "B"]));
        let output = TextFormatter::default().format(&report).unwrap();

        assert_eq!(output, "Leaves: D\nBisectors: B, C");
    }

    #[test]
    fn test_text_custom_separator() {
        let report = DagReport::new().with_leaves(strings(&["Y", "X"]));
        let output = TextFormatter::new(" ").format(&report).unwrap();

        assert_eq!(output, "Leaves: X Y");
    }

    #[test]
    fn test_text_statistics_on_empty_graph() {
        let report = DagReport::new().with_statistics(GraphStatistics {
            total_nodes: 0,
            total_edges: 0,
            leaf_nodes: 0,
            root_nodes: 0,
            bisector_score: None,
        });
        let output = TextFormatter::default().format(&report).unwrap();

        assert!(output.ends_with("bisector_score=none"));
    }

    #[test]
    fn test_json_omits_absent_sections() {
        let report = DagReport::new().with_bisectors(strings(&["D"]));
        let output = JsonFormatter.format(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["bisectors"], serde_json::json!(["D"]));
        assert!(value.get("leaves").is_none());
        assert!(value.get("generated_at").is_some());
    }
}
