pub mod bisector;
pub mod builder;
pub mod graph;
pub mod parser;

pub use bisector::{compute_bisectors, BisectorSet};
pub use builder::GraphBuilder;
pub use graph::{Dag, DagNode};
pub use parser::{Declaration, DeclarationParser};
