use crate::dag::bisector::compute_bisectors;
use crate::dag::graph::{Dag, DagNode};
use crate::dag::parser::{parse_declaration, Declaration};
use crate::error::{DagError, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// Incremental DAG construction from declarations in dependency order.
///
/// Every parent must already be present when a child is declared. That single
/// rule rejects forward references and cycles.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DiGraph<DagNode, ()>,
    node_map: HashMap<String, NodeIndex>,
    leaves: BTreeSet<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and ingest every declaration string, then compute bisectors
    pub fn construct<S: AsRef<str>>(declarations: &[S]) -> Result<Dag> {
        let mut builder = Self::new();
        for (index, text) in declarations.iter().enumerate() {
            builder.add_declaration(parse_declaration(index + 1, text.as_ref())?)?;
        }
        Ok(builder.finish())
    }

    /// Ingest already parsed declarations, then compute bisectors
    pub fn from_declarations<I>(declarations: I) -> Result<Dag>
    where
        I: IntoIterator<Item = Declaration>,
    {
        let mut builder = Self::new();
        for declaration in declarations {
            builder.add_declaration(declaration)?;
        }
        Ok(builder.finish())
    }

    /// Add one node. Parents are validated before anything is inserted, so a
    /// node can never name itself as a parent.
    pub fn add_declaration(&mut self, declaration: Declaration) -> Result<()> {
        let Declaration { name, parents, .. } = declaration;

        if self.node_map.contains_key(&name) {
            return Err(DagError::DuplicateNode { name });
        }

        let mut parent_links: Vec<(NodeIndex, String)> = Vec::with_capacity(parents.len());
        for parent in parents {
            let index = *self
                .node_map
                .get(&parent)
                .ok_or_else(|| DagError::unknown_parent(&name, &parent))?;
            if !parent_links.iter().any(|(seen, _)| *seen == index) {
                parent_links.push((index, parent));
            }
        }

        // Parents are final, so their ancestor sets are already complete
        let mut ancestors = BTreeSet::new();
        ancestors.insert(name.clone());
        for (index, _) in &parent_links {
            if let Some(parent) = self.graph.node_weight(*index) {
                ancestors.extend(parent.ancestors.iter().cloned());
            }
        }

        let child = self.graph.add_node(DagNode {
            name: name.clone(),
            parents: parent_links.iter().map(|(_, parent)| parent.clone()).collect(),
            ancestors,
        });
        self.node_map.insert(name.clone(), child);
        self.leaves.insert(name.clone());

        for (index, parent) in parent_links {
            self.graph.add_edge(index, child, ());
            if self.leaves.remove(&parent) {
                debug!("{} is no longer a leaf (parent of {})", parent, name);
            }
        }

        Ok(())
    }

    /// Freeze the graph and run the bisector scan once
    pub fn finish(self) -> Dag {
        let mut dag = Dag::new(self.graph, self.node_map, self.leaves);
        let bisectors = compute_bisectors(&dag);
        dag.set_bisectors(bisectors);

        info!(
            "DAG built with {} nodes, {} edges, {} leaves, {} bisectors",
            dag.node_count(),
            dag.edge_count(),
            dag.leaves().len(),
            dag.bisectors().len()
        );
        dag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_example_graph() {
        let dag = GraphBuilder::construct(&["A:", "B: A", "C: A", "D: B, C"]).unwrap();

        assert_eq!(dag.node_count(), 4);
        assert_eq!(dag.edge_count(), 4);
        assert_eq!(dag.leaves().iter().collect::<Vec<_>>(), vec!["D"]);
        assert_eq!(dag.bisectors().iter().collect::<Vec<_>>(), vec!["D"]);
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let err = GraphBuilder::construct(&["B: A"]).unwrap_err();
        assert_eq!(err, DagError::unknown_parent("B", "A"));
    }

    #[test]
    fn test_self_reference_is_rejected() {
        let err = GraphBuilder::construct(&["A: A"]).unwrap_err();
        assert_eq!(err, DagError::unknown_parent("A", "A"));
    }

    #[test]
    fn test_cycle_is_rejected() {
        // B would need C before C exists
        let err = GraphBuilder::construct(&["A:", "B: A, C", "C: B"]).unwrap_err();
        assert_eq!(err, DagError::unknown_parent("B", "C"));
    }

    #[test]
    fn test_duplicate_node_is_rejected() {
        let err = GraphBuilder::construct(&["A:", "B: A", "A:"]).unwrap_err();
        assert_eq!(err, DagError::DuplicateNode { name: "A".to_string() });
    }

    #[test]
    fn test_repeated_parent_adds_single_edge() {
        let dag = GraphBuilder::construct(&["A:", "B: A, A"]).unwrap();

        assert_eq!(dag.edge_count(), 1);
        assert_eq!(dag.parents_of("B").unwrap(), &["A".to_string()]);
    }

    #[test]
    fn test_malformed_line_reports_position() {
        let err = GraphBuilder::construct(&["A:", "B A"]).unwrap_err();
        assert!(matches!(err, DagError::MalformedDeclaration { line: 2, .. }));
    }

    #[test]
    fn test_leaf_revoked_when_referenced() {
        let mut builder = GraphBuilder::new();
        builder
            .add_declaration(parse_declaration(1, "A:").unwrap())
            .unwrap();
        builder
            .add_declaration(parse_declaration(2, "B:").unwrap())
            .unwrap();
        builder
            .add_declaration(parse_declaration(3, "C: A").unwrap())
            .unwrap();
        let dag = builder.finish();
        assert_eq!(dag.leaves().iter().collect::<Vec<_>>(), vec!["B", "C"]);
    }

    #[test]
    fn test_transitive_ancestors_through_chain() {
        let dag = GraphBuilder::construct(&["A:", "B: A", "C: B"]).unwrap();
        let ancestors: Vec<_> = dag.ancestors_of("C").unwrap().iter().collect();

        assert_eq!(ancestors, vec!["A", "B", "C"]);
    }
}
