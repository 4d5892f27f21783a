//! Fixtures shared by the entitlement handler tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::InMemoryEntitlementStore;
use crate::domain::availability::Audience;
use crate::domain::catalog::{Course, CourseScope, Pricing, SubscriptionPlan};
use crate::domain::entitlement::UserContext;
use crate::domain::foundation::{ClassId, CourseId, ProfileId, SchoolId};
use crate::ports::{AvailabilityRegistry, CourseRepository};

pub(crate) struct Fixture {
    pub store: Arc<InMemoryEntitlementStore>,
    pub bus: Arc<InMemoryEventBus>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryEntitlementStore::new()),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub async fn add_course(&self, course: Course) -> Course {
        self.store.save(&course).await.unwrap();
        course
    }

    pub async fn assign(&self, course_id: CourseId, schools: &[&str]) {
        let set: BTreeSet<SchoolId> = schools.iter().map(|s| school(s)).collect();
        self.store.sync_schools(&course_id, &set).await.unwrap();
    }

    pub async fn target(
        &self,
        course_id: CourseId,
        school_id: &str,
        audience: Audience,
        class: Option<&str>,
    ) {
        let mut record = AvailabilityRegistry::find(self.store.as_ref(), &course_id, &school(school_id))
            .await
            .unwrap()
            .unwrap();
        record.retarget(audience, class.map(class_id)).unwrap();
        self.store.update_targeting(&record).await.unwrap();
    }
}

pub(crate) fn school(id: &str) -> SchoolId {
    SchoolId::new(id).unwrap()
}

pub(crate) fn class_id(id: &str) -> ClassId {
    ClassId::new(id).unwrap()
}

pub(crate) fn free_course(title: &str) -> Course {
    Course::new(title, None, CourseScope::Global, Pricing::Free, None, None).unwrap()
}

pub(crate) fn paid_course(title: &str, cap: Option<u32>) -> Course {
    Course::new(
        title,
        None,
        CourseScope::Global,
        Pricing::Paid {
            plan: SubscriptionPlan::Annual,
            price_cents: 4_900,
        },
        cap,
        Some(format!("https://content.example/{}", title.to_lowercase())),
    )
    .unwrap()
}

pub(crate) fn student(profile: &str, school_id: &str, class: Option<&str>) -> UserContext {
    UserContext::Student {
        school_id: school(school_id),
        profile_id: ProfileId::new(profile).unwrap(),
        class_id: class.map(class_id),
    }
}

pub(crate) fn teacher(profile: &str, school_id: &str) -> UserContext {
    UserContext::Teacher {
        school_id: school(school_id),
        profile_id: ProfileId::new(profile).unwrap(),
    }
}

pub(crate) fn admin(school_id: &str) -> UserContext {
    UserContext::Admin {
        school_id: school(school_id),
    }
}
