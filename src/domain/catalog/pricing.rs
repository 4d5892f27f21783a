//! Course pricing.

use serde::{Deserialize, Serialize};

/// Billing cadence of a paid course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Monthly,
    Termly,
    Annual,
    /// One-off purchase with no renewal.
    Lifetime,
}

impl SubscriptionPlan {
    /// Returns the storage/wire name of this plan.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "monthly",
            SubscriptionPlan::Termly => "termly",
            SubscriptionPlan::Annual => "annual",
            SubscriptionPlan::Lifetime => "lifetime",
        }
    }
}

impl std::fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How access to a course is obtained.
///
/// Money is carried as integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Pricing {
    /// Anyone who can see the course may self-enroll.
    Free,

    /// Access is granted through activation codes or a school subscription.
    Paid {
        plan: SubscriptionPlan,
        price_cents: i64,
    },
}

impl Pricing {
    /// Returns true for free courses.
    pub fn is_free(&self) -> bool {
        matches!(self, Pricing::Free)
    }

    /// Returns true for paid courses.
    pub fn is_paid(&self) -> bool {
        !self.is_free()
    }

    /// Returns the subscription plan of a paid course.
    pub fn plan(&self) -> Option<SubscriptionPlan> {
        match self {
            Pricing::Free => None,
            Pricing::Paid { plan, .. } => Some(*plan),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_is_not_paid() {
        assert!(Pricing::Free.is_free());
        assert!(!Pricing::Free.is_paid());
        assert_eq!(Pricing::Free.plan(), None);
    }

    #[test]
    fn paid_exposes_plan() {
        let pricing = Pricing::Paid {
            plan: SubscriptionPlan::Termly,
            price_cents: 4_500,
        };
        assert!(pricing.is_paid());
        assert_eq!(pricing.plan(), Some(SubscriptionPlan::Termly));
    }

    #[test]
    fn pricing_serializes_with_kind_tag() {
        let pricing = Pricing::Paid {
            plan: SubscriptionPlan::Annual,
            price_cents: 12_000,
        };
        let json = serde_json::to_value(pricing).unwrap();
        assert_eq!(json["kind"], "paid");
        assert_eq!(json["plan"], "annual");
        assert_eq!(json["price_cents"], 12_000);
    }

    #[test]
    fn plan_deserializes_from_lowercase() {
        let plan: SubscriptionPlan = serde_json::from_str("\"lifetime\"").unwrap();
        assert_eq!(plan, SubscriptionPlan::Lifetime);
    }
}
