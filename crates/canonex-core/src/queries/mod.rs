pub mod example_queries;

pub use example_queries::{KeyGroup, ListFilter, QueryFacade};
