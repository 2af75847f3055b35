pub mod graph;
pub mod id;
pub mod node;
pub mod op;
pub mod sample;
