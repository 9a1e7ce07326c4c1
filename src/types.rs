//! Result and report types shared by the library and the CLI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub leaf_nodes: usize,
    pub root_nodes: usize,
    pub bisector_score: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorsReport {
    pub node: String,
    /// Sorted, includes `node` itself
    pub ancestors: Vec<String>,
}

/// Everything a single CLI invocation may print
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DagReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<AncestorsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bisectors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<GraphStatistics>,
    pub generated_at: DateTime<Utc>,
}

impl DagReport {
    pub fn new() -> Self {
        Self {
            ancestors: None,
            leaves: None,
            bisectors: None,
            statistics: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_ancestors(mut self, node: impl Into<String>, ancestors: Vec<String>) -> Self {
        self.ancestors = Some(AncestorsReport {
            node: node.into(),
            ancestors,
        });
        self
    }

    pub fn with_leaves(mut self, leaves: Vec<String>) -> Self {
        self.leaves = Some(leaves);
        self
    }

    pub fn with_bisectors(mut self, bisectors: Vec<String>) -> Self {
        self.bisectors = Some(bisectors);
        self
    }

    pub fn with_statistics(mut self, statistics: GraphStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }
}

impl Default for DagReport {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Unsupported format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
