pub mod batch;
pub mod evaluate;
pub mod graph;
pub mod score;
