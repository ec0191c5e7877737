pub mod nearest_node;
pub mod private_mutations;
pub mod tree_attach;
pub mod tree_node;
pub mod tree_preprocess;
