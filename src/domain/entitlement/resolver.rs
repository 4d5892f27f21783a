//! Catalog resolution.
//!
//! Handlers load the school's availability records, the matching courses and
//! the viewer's entitlements; the functions here turn that snapshot into the
//! ordered list a user sees.

use crate::domain::availability::AvailabilityRecord;
use crate::domain::catalog::Course;
use crate::domain::foundation::CourseId;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use super::{CourseView, UserContext};

/// Course ids made visible to `ctx` by the given records.
pub fn visible_course_ids(ctx: &UserContext, records: &[AvailabilityRecord]) -> Vec<CourseId> {
    records
        .iter()
        .filter(|record| ctx.admits(record))
        .map(|record| record.course_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Annotates and orders visible courses for `ctx`.
///
/// `entitled` holds the courses the viewer is enrolled in, or for admins the
/// paid courses their school holds an active subscription to. Ordering is
/// newest first with ties broken by id.
pub fn resolve_catalog(
    ctx: &UserContext,
    courses: &[Course],
    entitled: &HashSet<CourseId>,
) -> Vec<CourseView> {
    let mut views: Vec<CourseView> = courses
        .iter()
        .map(|course| {
            let enrolled = match ctx {
                UserContext::Admin { .. } => course.pricing.is_paid() && entitled.contains(&course.id),
                _ => entitled.contains(&course.id),
            };
            CourseView::annotate(course, ctx, enrolled)
        })
        .collect();

    views.sort_by(catalog_order);
    views
}

fn catalog_order(a: &CourseView, b: &CourseView) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::Audience;
    use crate::domain::catalog::{CourseScope, Pricing, SubscriptionPlan};
    use crate::domain::foundation::{ClassId, ProfileId, SchoolId, Timestamp};

    fn school() -> SchoolId {
        SchoolId::new("s-1").unwrap()
    }

    fn free(title: &str) -> Course {
        Course::new(title, None, CourseScope::Global, Pricing::Free, None, None).unwrap()
    }

    fn paid(title: &str) -> Course {
        Course::new(
            title,
            None,
            CourseScope::Global,
            Pricing::Paid {
                plan: SubscriptionPlan::Termly,
                price_cents: 2_000,
            },
            Some(30),
            Some(format!("https://cdn.example/{}", title)),
        )
        .unwrap()
    }

    fn student() -> UserContext {
        UserContext::Student {
            school_id: school(),
            profile_id: ProfileId::new("stu-1").unwrap(),
            class_id: Some(ClassId::new("C1").unwrap()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Visibility
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn visible_ids_filter_by_context_and_dedupe() {
        let shown = CourseId::new();
        let hidden = CourseId::new();

        let mut teacher_only = AvailabilityRecord::assign(hidden, school());
        teacher_only.retarget(Audience::Teacher, None).unwrap();

        let records = vec![AvailabilityRecord::assign(shown, school()), teacher_only];
        assert_eq!(visible_course_ids(&student(), &records), vec![shown]);
    }

    #[test]
    fn no_records_means_nothing_visible() {
        assert!(visible_course_ids(&student(), &[]).is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Annotation
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn free_unenrolled_course_can_be_self_enrolled() {
        let course = free("Art");
        let views = resolve_catalog(&student(), &[course], &HashSet::new());

        assert!(views[0].can_self_enroll);
        assert!(!views[0].is_enrolled);
        assert!(views[0].is_available);
    }

    #[test]
    fn enrolled_course_cannot_be_self_enrolled_again() {
        let course = free("Art");
        let entitled: HashSet<CourseId> = [course.id].into_iter().collect();
        let views = resolve_catalog(&student(), &[course], &entitled);

        assert!(views[0].is_enrolled);
        assert!(!views[0].can_self_enroll);
    }

    #[test]
    fn paid_course_hides_content_until_enrolled() {
        let course = paid("Robotics");
        let views = resolve_catalog(&student(), &[course.clone()], &HashSet::new());
        assert!(views[0].content_url.is_none());
        assert!(!views[0].can_self_enroll);

        let entitled: HashSet<CourseId> = [course.id].into_iter().collect();
        let views = resolve_catalog(&student(), &[course], &entitled);
        assert!(views[0].content_url.is_some());
    }

    #[test]
    fn admin_enrollment_ignores_free_courses() {
        let admin = UserContext::Admin { school_id: school() };
        let free_course = free("Music");
        let paid_course = paid("Drama");
        let entitled: HashSet<CourseId> = [free_course.id, paid_course.id].into_iter().collect();

        let views = resolve_catalog(&admin, &[free_course.clone(), paid_course.clone()], &entitled);
        let free_view = views.iter().find(|v| v.id == free_course.id).unwrap();
        let paid_view = views.iter().find(|v| v.id == paid_course.id).unwrap();

        assert!(!free_view.is_enrolled);
        assert!(paid_view.is_enrolled);
        assert!(!free_view.can_self_enroll);
    }

    #[test]
    fn superadmin_is_enrolled_everywhere() {
        let views = resolve_catalog(&UserContext::Superadmin, &[paid("Latin")], &HashSet::new());
        assert!(views[0].is_enrolled);
        assert!(views[0].is_available);
        assert!(views[0].content_url.is_some());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Ordering
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn newest_course_comes_first() {
        let mut older = free("Older");
        older.created_at = Timestamp::now().add_days(-2);
        let newer = free("Newer");

        let views = resolve_catalog(&student(), &[older, newer], &HashSet::new());
        assert_eq!(views[0].title, "Newer");
        assert_eq!(views[1].title, "Older");
    }

    #[test]
    fn ties_break_by_id_ascending() {
        let created = Timestamp::now();
        let mut a = free("A");
        let mut b = free("B");
        a.created_at = created;
        b.created_at = created;

        let views = resolve_catalog(&student(), &[a.clone(), b.clone()], &HashSet::new());
        let expected_first = if a.id < b.id { a.id } else { b.id };
        assert_eq!(views[0].id, expected_first);
    }
}
