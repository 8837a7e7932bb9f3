use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipStatus {
    Single,
    Relationship,
    Complicated,
    Married,
}

impl RelationshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Single => "Single",
            RelationshipStatus::Relationship => "Relationship",
            RelationshipStatus::Complicated => "Complicated",
            RelationshipStatus::Married => "Married",
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, RelationshipStatus::Single)
    }
}

impl fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The completed pre-quiz profile. Built once by the profile steps and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub relationship_status: RelationshipStatus,
    pub relationship_history_count: u32,
    pub intent: String,
    pub insecurity: Option<String>,
    pub self_love_trait: Option<String>,
}

impl UserContext {
    /// Multi-line profile block injected into prompts.
    pub fn prompt_block(&self) -> String {
        format!(
            "Name: {}\nAge: {}\nGender: {}\nRelationship status: {}\n\
             Serious relationships so far: {}\nWhy they are taking this test: {}\n\
             Biggest insecurity: {}\nWhat they love about themselves: {}",
            self.name,
            self.age,
            self.gender,
            self.relationship_status,
            self.relationship_history_count,
            if self.intent.trim().is_empty() {
                "not shared"
            } else {
                self.intent.as_str()
            },
            self.insecurity.as_deref().unwrap_or("not shared"),
            self.self_love_trait.as_deref().unwrap_or("not shared"),
        )
    }
}
