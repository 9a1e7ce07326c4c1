use crate::dag::Dag;
use crate::reports::formatters::{JsonFormatter, ReportFormatter, TextFormatter};
use crate::types::{DagReport, OutputFormat};
use anyhow::Result;
use tracing::debug;

/// Which queries a report should answer
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub ancestors_of: Option<String>,
    pub leaves: bool,
    pub bisectors: bool,
    pub statistics: bool,
}

impl ReportRequest {
    /// Ancestors (when a node is given), leaves and bisectors
    pub fn all(ancestors_of: Option<String>) -> Self {
        Self {
            ancestors_of,
            leaves: true,
            bisectors: true,
            statistics: false,
        }
    }
}

/// Report generator for creating various output formats
pub struct ReportGenerator {
    separator: String,
}

impl ReportGenerator {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Run the requested queries against `dag`
    pub fn collect(&self, dag: &Dag, request: &ReportRequest) -> crate::Result<DagReport> {
        let mut report = DagReport::new();

        if let Some(name) = &request.ancestors_of {
            let ancestors = dag.ancestors_of(name)?.iter().cloned().collect();
            report = report.with_ancestors(name.clone(), ancestors);
        }
        if request.leaves {
            report = report.with_leaves(dag.leaves().iter().cloned().collect());
        }
        if request.bisectors {
            report = report.with_bisectors(dag.bisectors().iter().cloned().collect());
        }
        if request.statistics {
            report = report.with_statistics(dag.statistics());
        }

        debug!("Collected report for request {:?}", request);
        Ok(report)
    }

    /// Generate report in the specified format
    pub fn generate(&self, report: &DagReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => TextFormatter::new(self.separator.as_str()).format(report),
            OutputFormat::Json => JsonFormatter.format(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DagError;

    fn create_test_graph() -> Dag {
        Dag::from_declarations(&["A:", "B: A", "C: A", "D: B, C"]).unwrap()
    }

    #[test]
    fn test_full_text_report() {
        let dag = create_test_graph();
        let generator = ReportGenerator::default();

        let report = generator
            .collect(&dag, &ReportRequest::all(Some("C".to_string())))
            .unwrap();
        let output = generator.generate(&report, OutputFormat::Text).unwrap();

        assert_eq!(output, "Ancestors of C: A, C\nLeaves: D\nBisectors: D");
    }

    #[test]
    fn test_collect_unknown_node() {
        let dag = create_test_graph();
        let request = ReportRequest {
            ancestors_of: Some("Z".to_string()),
            ..ReportRequest::default()
        };

        let err = ReportGenerator::default().collect(&dag, &request).unwrap_err();
        assert_eq!(err, DagError::not_found("Z"));
    }

    #[test]
    fn test_statistics_only_report() {
        let dag = create_test_graph();
        let request = ReportRequest {
            statistics: true,
            ..ReportRequest::default()
        };

        let report = ReportGenerator::default().collect(&dag, &request).unwrap();

        assert!(report.leaves.is_none());
        assert_eq!(report.statistics.unwrap().total_nodes, 4);
    }

    #[test]
    fn test_json_report() {
        let dag = create_test_graph();
        let generator = ReportGenerator::default();
        let report = generator.collect(&dag, &ReportRequest::all(None)).unwrap();

        let output = generator.generate(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["leaves"], serde_json::json!(["D"]));
        assert!(value.get("ancestors").is_none());
    }
}
