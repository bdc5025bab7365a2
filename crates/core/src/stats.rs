//! Stats derived from an entity collection.
//!
//! Counts are recomputed from the rows returned by each read and are never
//! stored.

use abcd_db::entities::approvable_entity::{self, ApprovalStatus, EntityFamily};
use serde::Serialize;

/// Aggregate counts for one entity family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    /// Vendors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_review: Option<u64>,
    /// Vendors that registered but never submitted an application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_application: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<u64>,
}

/// Compute the stats of `family` from its live rows.
///
/// Users count as pending while neither payment-verified (approved) nor
/// rejected. Vendors without an application are counted under
/// `no_application` only, never as pending.
#[must_use]
pub fn compute(family: EntityFamily, entities: &[approvable_entity::Model]) -> ApprovalStats {
    let count = |pred: &dyn Fn(&approvable_entity::Model) -> bool| {
        entities.iter().filter(|e| pred(e)).count() as u64
    };

    let approved = count(&|e| e.status == ApprovalStatus::Approved);
    let rejected = count(&|e| e.status == ApprovalStatus::Rejected);

    let mut stats = ApprovalStats {
        total: entities.len() as u64,
        approved,
        rejected,
        ..ApprovalStats::default()
    };

    match family {
        EntityFamily::User => {
            stats.pending = count(&|e| {
                e.status != ApprovalStatus::Approved && e.status != ApprovalStatus::Rejected
            });
        }
        EntityFamily::Vendor => {
            stats.pending = count(&|e| {
                e.is_business_application_submitted && e.status == ApprovalStatus::Pending
            });
            stats.under_review = Some(count(&|e| e.status == ApprovalStatus::UnderReview));
            stats.no_application = Some(count(&|e| !e.is_business_application_submitted));
            stats.verified = Some(count(&|e| e.is_verified));
        }
        EntityFamily::BuyLead | EntityFamily::SellLead => {
            stats.pending = count(&|e| e.status == ApprovalStatus::Pending);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entity(family: EntityFamily, status: ApprovalStatus) -> approvable_entity::Model {
        approvable_entity::Model {
            id: abcd_common::IdGenerator::new().generate(),
            family,
            status,
            rejection_reason: (status == ApprovalStatus::Rejected).then(|| "reason".to_string()),
            admin_comments: None,
            is_business_application_submitted: true,
            is_verified: family == EntityFamily::Vendor && status == ApprovalStatus::Approved,
            payload: serde_json::json!({}),
            version: 1,
            created_at: Utc::now().into(),
            reviewed_at: None,
            reviewed_by: None,
            updated_at: None,
        }
    }

    fn five_of(family: EntityFamily) -> Vec<approvable_entity::Model> {
        vec![
            entity(family, ApprovalStatus::Pending),
            entity(family, ApprovalStatus::Pending),
            entity(family, ApprovalStatus::Approved),
            entity(family, ApprovalStatus::Approved),
            entity(family, ApprovalStatus::Rejected),
        ]
    }

    #[test]
    fn test_counts_for_every_family() {
        for family in EntityFamily::ALL {
            let stats = compute(family, &five_of(family));
            assert_eq!(stats.total, 5, "{family:?}");
            assert_eq!(stats.pending, 2, "{family:?}");
            assert_eq!(stats.approved, 2, "{family:?}");
            assert_eq!(stats.rejected, 1, "{family:?}");
        }
    }

    #[test]
    fn test_counts_follow_collection_changes() {
        let mut rows = five_of(EntityFamily::BuyLead);

        rows[0].status = ApprovalStatus::Approved;
        let stats = compute(EntityFamily::BuyLead, &rows);
        assert_eq!((stats.pending, stats.approved), (1, 3));

        rows.remove(4);
        let stats = compute(EntityFamily::BuyLead, &rows);
        assert_eq!((stats.total, stats.rejected), (4, 0));
    }

    #[test]
    fn test_vendor_extras() {
        let mut rows = five_of(EntityFamily::Vendor);
        rows[0].is_business_application_submitted = false;
        rows.push(entity(EntityFamily::Vendor, ApprovalStatus::UnderReview));

        let stats = compute(EntityFamily::Vendor, &rows);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.no_application, Some(1));
        assert_eq!(stats.under_review, Some(1));
        assert_eq!(stats.verified, Some(2));
    }

    #[test]
    fn test_non_vendor_omits_extras() {
        let stats = compute(EntityFamily::User, &five_of(EntityFamily::User));
        let json = serde_json::to_value(&stats).unwrap_or_default();

        assert!(json.get("noApplication").is_none());
        assert_eq!(json["pending"], 2);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(compute(EntityFamily::SellLead, &[]), ApprovalStats::default());
    }
}
