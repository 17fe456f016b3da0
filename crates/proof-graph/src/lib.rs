#![deny(missing_docs)]
#![doc = "Structural analysis of proof dependency graphs: depth, cycles, bottlenecks, topological order and critical path."]

mod analyzer;
mod result;
mod view;

pub use analyzer::{GraphAnalyzer, BOTTLENECK_IN_DEGREE};
pub use result::{CycleError, ErrorKind, GraphResult, Severity, StepDepth};
pub use view::{EdgeKind, GraphView, ViewEdge, ViewNode, LABEL_MAX_CHARS};
