//! UserContextResolver - turns a raw user identity into a `UserContext`.
//!
//! The directory supplies role, school and profile. A student the directory
//! reports without a class is looked up in the class roster; a student the
//! roster cannot place stays without a class and only sees unrestricted
//! assignments.

use std::sync::Arc;

use crate::domain::entitlement::{EntitlementError, Role, UserContext};
use crate::domain::foundation::UserId;
use crate::ports::{ClassRoster, DirectoryEntry, DirectoryError, DirectoryGateway};

pub struct UserContextResolver {
    directory: Arc<dyn DirectoryGateway>,
    roster: Arc<dyn ClassRoster>,
}

impl UserContextResolver {
    pub fn new(directory: Arc<dyn DirectoryGateway>, roster: Arc<dyn ClassRoster>) -> Self {
        Self { directory, roster }
    }

    pub async fn resolve(&self, user_id: &UserId) -> Result<UserContext, EntitlementError> {
        let entry = self
            .directory
            .resolve_user_context(user_id)
            .await
            .map_err(directory_error)?;

        let mut ctx = context_from_entry(entry)?;

        if let UserContext::Student {
            profile_id,
            class_id,
            ..
        } = &mut ctx
        {
            if class_id.is_none() {
                *class_id = self
                    .roster
                    .student_class(profile_id)
                    .await
                    .map_err(directory_error)?;
            }
        }

        tracing::debug!(user_id = %user_id, role = ?ctx.role(), "Resolved user context");
        Ok(ctx)
    }
}

fn directory_error(err: DirectoryError) -> EntitlementError {
    match err {
        DirectoryError::Unauthorized => EntitlementError::unauthorized("unknown identity"),
        DirectoryError::Unavailable(msg) => EntitlementError::dependency_unavailable(msg),
        DirectoryError::Malformed(msg) => {
            tracing::error!("Directory returned malformed data: {}", msg);
            EntitlementError::dependency_unavailable(format!("malformed directory data: {}", msg))
        }
    }
}

/// Builds the tagged context, rejecting entries missing what the role needs.
fn context_from_entry(entry: DirectoryEntry) -> Result<UserContext, EntitlementError> {
    let missing = |field: &str| {
        EntitlementError::unauthorized(format!("directory entry has no {}", field))
    };

    match entry.role {
        Role::Superadmin => Ok(UserContext::Superadmin),
        Role::Admin => Ok(UserContext::Admin {
            school_id: entry.school_id.ok_or_else(|| missing("school"))?,
        }),
        Role::Teacher => Ok(UserContext::Teacher {
            school_id: entry.school_id.ok_or_else(|| missing("school"))?,
            profile_id: entry.profile_id.ok_or_else(|| missing("profile"))?,
        }),
        Role::Student => Ok(UserContext::Student {
            school_id: entry.school_id.ok_or_else(|| missing("school"))?,
            profile_id: entry.profile_id.ok_or_else(|| missing("profile"))?,
            class_id: entry.class_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ClassId, ProfileId, SchoolId};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockDirectory {
        entries: HashMap<String, DirectoryEntry>,
        unavailable: bool,
    }

    impl MockDirectory {
        fn with(user: &str, entry: DirectoryEntry) -> Self {
            let mut entries = HashMap::new();
            entries.insert(user.to_string(), entry);
            Self {
                entries,
                unavailable: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                entries: HashMap::new(),
                unavailable: true,
            }
        }
    }

    #[async_trait]
    impl DirectoryGateway for MockDirectory {
        async fn resolve_user_context(
            &self,
            user_id: &UserId,
        ) -> Result<DirectoryEntry, DirectoryError> {
            if self.unavailable {
                return Err(DirectoryError::unavailable("connection refused"));
            }
            self.entries
                .get(user_id.as_str())
                .cloned()
                .ok_or(DirectoryError::Unauthorized)
        }
    }

    struct MockRoster {
        class: Option<ClassId>,
        calls: Mutex<u32>,
        unavailable: bool,
    }

    impl MockRoster {
        fn placing(class: Option<&str>) -> Self {
            Self {
                class: class.map(|c| ClassId::new(c).unwrap()),
                calls: Mutex::new(0),
                unavailable: false,
            }
        }

        fn failing() -> Self {
            Self {
                class: None,
                calls: Mutex::new(0),
                unavailable: true,
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ClassRoster for MockRoster {
        async fn student_class(
            &self,
            _profile_id: &ProfileId,
        ) -> Result<Option<ClassId>, DirectoryError> {
            *self.calls.lock().unwrap() += 1;
            if self.unavailable {
                return Err(DirectoryError::unavailable("roster down"));
            }
            Ok(self.class.clone())
        }
    }

    fn student_entry(class: Option<&str>) -> DirectoryEntry {
        DirectoryEntry {
            role: Role::Student,
            school_id: Some(SchoolId::new("s-1").unwrap()),
            profile_id: Some(ProfileId::new("stu-1").unwrap()),
            class_id: class.map(|c| ClassId::new(c).unwrap()),
        }
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn student_with_class_skips_roster() {
        let roster = Arc::new(MockRoster::placing(Some("C9")));
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::with("u-1", student_entry(Some("C1")))),
            roster.clone(),
        );

        let ctx = resolver.resolve(&user("u-1")).await.unwrap();

        assert_eq!(
            ctx,
            UserContext::Student {
                school_id: SchoolId::new("s-1").unwrap(),
                profile_id: ProfileId::new("stu-1").unwrap(),
                class_id: Some(ClassId::new("C1").unwrap()),
            }
        );
        assert_eq!(roster.calls(), 0);
    }

    #[tokio::test]
    async fn student_without_class_falls_back_to_roster() {
        let roster = Arc::new(MockRoster::placing(Some("C2")));
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::with("u-1", student_entry(None))),
            roster.clone(),
        );

        let ctx = resolver.resolve(&user("u-1")).await.unwrap();

        match ctx {
            UserContext::Student { class_id, .. } => {
                assert_eq!(class_id, Some(ClassId::new("C2").unwrap()))
            }
            other => panic!("expected student, got {:?}", other),
        }
        assert_eq!(roster.calls(), 1);
    }

    #[tokio::test]
    async fn unplaced_student_stays_without_class() {
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::with("u-1", student_entry(None))),
            Arc::new(MockRoster::placing(None)),
        );

        let ctx = resolver.resolve(&user("u-1")).await.unwrap();
        assert!(matches!(ctx, UserContext::Student { class_id: None, .. }));
    }

    #[tokio::test]
    async fn unknown_identity_is_unauthorized() {
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::with("u-1", student_entry(None))),
            Arc::new(MockRoster::placing(None)),
        );

        let err = resolver.resolve(&user("intruder")).await.unwrap_err();
        assert!(matches!(err, EntitlementError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unreachable_directory_is_retryable() {
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::unavailable()),
            Arc::new(MockRoster::placing(None)),
        );

        let err = resolver.resolve(&user("u-1")).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn unreachable_roster_is_dependency_unavailable() {
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::with("u-1", student_entry(None))),
            Arc::new(MockRoster::failing()),
        );

        let err = resolver.resolve(&user("u-1")).await.unwrap_err();
        assert!(matches!(err, EntitlementError::DependencyUnavailable(_)));
    }

    #[tokio::test]
    async fn teacher_without_profile_is_rejected() {
        let entry = DirectoryEntry {
            role: Role::Teacher,
            school_id: Some(SchoolId::new("s-1").unwrap()),
            profile_id: None,
            class_id: None,
        };
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::with("u-2", entry)),
            Arc::new(MockRoster::placing(None)),
        );

        let err = resolver.resolve(&user("u-2")).await.unwrap_err();
        assert!(matches!(err, EntitlementError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn superadmin_needs_no_school() {
        let entry = DirectoryEntry {
            role: Role::Superadmin,
            school_id: None,
            profile_id: None,
            class_id: None,
        };
        let resolver = UserContextResolver::new(
            Arc::new(MockDirectory::with("root", entry)),
            Arc::new(MockRoster::placing(None)),
        );

        assert_eq!(resolver.resolve(&user("root")).await.unwrap(), UserContext::Superadmin);
    }
}
