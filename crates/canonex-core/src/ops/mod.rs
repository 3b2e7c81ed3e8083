pub mod canonical_ops;
pub mod corpus;
pub mod example_ops;

pub use corpus::Corpus;
