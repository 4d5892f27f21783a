//! In-memory directory.
//!
//! Implements the directory, roster and school registry ports from a fixed
//! set of users, schools and class placements.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::domain::foundation::{ClassId, ProfileId, SchoolId, UserId};
use crate::ports::{
    ClassRoster, DirectoryEntry, DirectoryError, DirectoryGateway, SchoolRegistry,
};

/// Seed data, typically loaded from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectorySeed {
    #[serde(default)]
    pub users: HashMap<UserId, DirectoryEntry>,
    #[serde(default)]
    pub schools: Vec<SchoolId>,
    #[serde(default)]
    pub classes: HashMap<ProfileId, ClassId>,
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: HashMap<UserId, DirectoryEntry>,
    schools: HashSet<SchoolId>,
    classes: HashMap<ProfileId, ClassId>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: DirectorySeed) -> Self {
        let mut directory = Self {
            users: seed.users,
            schools: seed.schools.into_iter().collect(),
            classes: seed.classes,
        };
        directory.register_user_schools();
        directory
    }

    /// Reads a seed file.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DirectoryError::unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let seed: DirectorySeed = serde_json::from_str(&raw)
            .map_err(|e| DirectoryError::malformed(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_seed(seed))
    }

    pub fn with_user(mut self, user_id: UserId, entry: DirectoryEntry) -> Self {
        if let Some(school) = &entry.school_id {
            self.schools.insert(school.clone());
        }
        self.users.insert(user_id, entry);
        self
    }

    pub fn with_school(mut self, school_id: SchoolId) -> Self {
        self.schools.insert(school_id);
        self
    }

    pub fn with_student_class(mut self, profile_id: ProfileId, class_id: ClassId) -> Self {
        self.classes.insert(profile_id, class_id);
        self
    }

    // Every school a user belongs to exists.
    fn register_user_schools(&mut self) {
        let schools: Vec<SchoolId> = self
            .users
            .values()
            .filter_map(|entry| entry.school_id.clone())
            .collect();
        self.schools.extend(schools);
    }
}

#[async_trait]
impl DirectoryGateway for InMemoryDirectory {
    async fn resolve_user_context(&self, user_id: &UserId) -> Result<DirectoryEntry, DirectoryError> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or(DirectoryError::Unauthorized)
    }
}

#[async_trait]
impl ClassRoster for InMemoryDirectory {
    async fn student_class(&self, profile_id: &ProfileId) -> Result<Option<ClassId>, DirectoryError> {
        Ok(self.classes.get(profile_id).cloned())
    }
}

#[async_trait]
impl SchoolRegistry for InMemoryDirectory {
    async fn school_exists(&self, school_id: &SchoolId) -> Result<bool, DirectoryError> {
        Ok(self.schools.contains(school_id))
    }
}
