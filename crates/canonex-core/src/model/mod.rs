pub mod displacement;
pub mod example;
pub mod grouping_key;

pub use displacement::DisplacementEvent;
pub use example::{EntitySpan, Example, ExamplePatch, NewExample};
pub use grouping_key::{EntityScope, GroupingKey};
