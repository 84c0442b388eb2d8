pub mod algorithms;
pub mod pipeline;
pub mod tree;
