use crate::dag::bisector::{balance_score, BisectorSet};
use crate::error::{DagError, Result};
use crate::types::GraphStatistics;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

/// A node together with its precomputed, self-inclusive ancestor set
#[derive(Debug, Clone)]
pub struct DagNode {
    pub name: String,
    /// Declared parents in declaration order, duplicates removed
    pub parents: Vec<String>,
    pub ancestors: BTreeSet<String>,
}

/// Immutable DAG built by [`crate::dag::GraphBuilder`].
///
/// Edges point from parent to child. Leaves and bisectors are fixed at
/// construction time and only read afterwards.
#[derive(Debug, Clone)]
pub struct Dag {
    graph: DiGraph<DagNode, ()>,
    node_map: HashMap<String, NodeIndex>,
    leaves: BTreeSet<String>,
    bisectors: BisectorSet,
}

impl Dag {
    pub(crate) fn new(
        graph: DiGraph<DagNode, ()>,
        node_map: HashMap<String, NodeIndex>,
        leaves: BTreeSet<String>,
    ) -> Self {
        Self {
            graph,
            node_map,
            leaves,
            bisectors: BisectorSet::default(),
        }
    }

    pub(crate) fn set_bisectors(&mut self, bisectors: BisectorSet) {
        self.bisectors = bisectors;
    }

    /// Build a graph straight from declaration strings
    pub fn from_declarations<S: AsRef<str>>(declarations: &[S]) -> Result<Self> {
        crate::dag::GraphBuilder::construct(declarations)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Iterate over all nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &DagNode> {
        self.graph
            .node_indices()
            .filter_map(move |index| self.graph.node_weight(index))
    }

    pub fn node(&self, name: &str) -> Option<&DagNode> {
        self.node_map
            .get(name)
            .and_then(|&index| self.graph.node_weight(index))
    }

    fn require(&self, name: &str) -> Result<&DagNode> {
        self.node(name).ok_or_else(|| DagError::not_found(name))
    }

    /// Transitive ancestors of `name`, including `name` itself
    pub fn ancestors_of(&self, name: &str) -> Result<&BTreeSet<String>> {
        Ok(&self.require(name)?.ancestors)
    }

    /// Nodes never referenced as a parent
    pub fn leaves(&self) -> &BTreeSet<String> {
        &self.leaves
    }

    /// Nodes whose ancestor count most evenly splits the graph
    pub fn bisectors(&self) -> &BTreeSet<String> {
        &self.bisectors.members
    }

    /// The minimal balance score shared by every bisector, `None` when empty
    pub fn bisector_score(&self) -> Option<usize> {
        self.bisectors.score
    }

    pub fn score_of(&self, name: &str) -> Result<usize> {
        let node = self.require(name)?;
        Ok(balance_score(node.ancestors.len(), self.node_count()))
    }

    pub fn parents_of(&self, name: &str) -> Result<&[String]> {
        Ok(&self.require(name)?.parents)
    }

    /// Direct children of `name`, sorted by name
    pub fn children_of(&self, name: &str) -> Result<Vec<String>> {
        let index = self
            .node_map
            .get(name)
            .ok_or_else(|| DagError::not_found(name))?;

        let mut children: Vec<String> = self
            .graph
            .neighbors_directed(*index, Direction::Outgoing)
            .filter_map(|child| self.graph.node_weight(child))
            .map(|child| child.name.clone())
            .collect();
        children.sort();

        Ok(children)
    }

    /// Nodes declared without parents, sorted by name
    pub fn root_nodes(&self) -> Vec<String> {
        let mut roots: Vec<String> = self
            .graph
            .externals(Direction::Incoming)
            .filter_map(|index| self.graph.node_weight(index))
            .map(|node| node.name.clone())
            .collect();
        roots.sort();
        roots
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            total_nodes: self.node_count(),
            total_edges: self.edge_count(),
            leaf_nodes: self.leaves.len(),
            root_nodes: self.graph.externals(Direction::Incoming).count(),
            bisector_score: self.bisector_score(),
        }
    }
}
