//! Audience targeting for an assignment.

use serde::{Deserialize, Serialize};

/// Which user kinds an assignment is visible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Student,
    Teacher,
    #[default]
    Both,
}

impl Audience {
    pub fn includes_students(&self) -> bool {
        matches!(self, Audience::Student | Audience::Both)
    }

    pub fn includes_teachers(&self) -> bool {
        matches!(self, Audience::Teacher | Audience::Both)
    }

    /// Returns the storage/wire name of this audience.
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Student => "student",
            Audience::Teacher => "teacher",
            Audience::Both => "both",
        }
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
