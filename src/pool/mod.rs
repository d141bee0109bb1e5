pub mod builder;
pub mod quote;
pub mod state;
pub mod traversal;
