pub mod config;
pub mod dag;
pub mod error;
pub mod reports;
pub mod types;

pub use dag::{Dag, GraphBuilder};
pub use error::{DagError, Result};
