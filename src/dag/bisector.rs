use crate::dag::graph::Dag;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Nodes sharing the minimal balance score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BisectorSet {
    pub score: Option<usize>,
    pub members: BTreeSet<String>,
}

/// `min(A, N - A)` for a node with `A` ancestors in a graph of `N` nodes
pub fn balance_score(ancestor_count: usize, total_nodes: usize) -> usize {
    ancestor_count.min(total_nodes.saturating_sub(ancestor_count))
}

/// Scan every node once and keep all nodes tied at the lowest score.
///
/// Each score only reads the node's finished ancestor set, so the result does
/// not depend on iteration order.
pub fn compute_bisectors(dag: &Dag) -> BisectorSet {
    let total = dag.node_count();

    let bisectors = dag.nodes().fold(BisectorSet::default(), |mut acc, node| {
        let score = balance_score(node.ancestors.len(), total);
        match acc.score {
            Some(best) if score > best => {}
            Some(best) if score == best => {
                acc.members.insert(node.name.clone());
            }
            _ => {
                acc.score = Some(score);
                acc.members.clear();
                acc.members.insert(node.name.clone());
            }
        }
        acc
    });

    debug!(
        "Found {} bisectors with score {:?} across {} nodes",
        bisectors.members.len(),
        bisectors.score,
        total
    );
    bisectors
}
