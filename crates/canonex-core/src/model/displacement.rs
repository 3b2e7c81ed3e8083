use serde::{Deserialize, Serialize};

use super::grouping_key::GroupingKey;

/// Record of a previous canonical holder losing a key to another example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplacementEvent {
    pub displaced_id: String,
    pub displaced_by: String,
    pub shared_key: GroupingKey,
}

impl DisplacementEvent {
    pub fn new(displaced_id: String, displaced_by: String, shared_key: GroupingKey) -> Self {
        Self {
            displaced_id,
            displaced_by,
            shared_key,
        }
    }

    /// Notification text shown to the user after a switch
    pub fn message(&self) -> String {
        format!(
            "The previous canonical example with {} was unmarked.",
            self.shared_key.describe()
        )
    }
}
