//! Tenant-scoped query filters.

use kadro_core::types::{EntityId, OwnerId};

use crate::document::Document;
use crate::fields::{FIELD_OWNER_ID, FIELD_PROJECT_ID};

/// Scope for a subscription query.
///
/// Every subscription is scoped to one owning tenant; board views over a
/// single project additionally scope by `project_id`. The scope is always
/// passed in explicitly by the embedding view — never read from ambient
/// auth state — so the subsystem stays testable in isolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionFilter {
    pub owner_id: OwnerId,
    pub project_id: Option<EntityId>,
}

impl CollectionFilter {
    /// Filter on the owning tenant only.
    pub fn owned_by(owner_id: impl Into<OwnerId>) -> Self {
        Self {
            owner_id: owner_id.into(),
            project_id: None,
        }
    }

    /// Narrow the filter to one parent project.
    pub fn with_project(mut self, project_id: impl Into<EntityId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Whether a document falls inside this scope.
    pub fn matches(&self, doc: &Document) -> bool {
        if doc.get_str(FIELD_OWNER_ID) != Some(self.owner_id.as_str()) {
            return false;
        }
        match &self.project_id {
            Some(project_id) => doc.get_str(FIELD_PROJECT_ID) == Some(project_id.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(owner: &str, project: Option<&str>) -> Document {
        let mut fields = serde_json::json!({ FIELD_OWNER_ID: owner });
        if let Some(p) = project {
            fields[FIELD_PROJECT_ID] = serde_json::Value::String(p.into());
        }
        Document::new("d-1", fields)
    }

    #[test]
    fn owner_scope_matches_only_that_owner() {
        let filter = CollectionFilter::owned_by("u-1");
        assert!(filter.matches(&doc("u-1", None)));
        assert!(!filter.matches(&doc("u-2", None)));
    }

    #[test]
    fn project_scope_requires_both_owner_and_project() {
        let filter = CollectionFilter::owned_by("u-1").with_project("p-1");
        assert!(filter.matches(&doc("u-1", Some("p-1"))));
        assert!(!filter.matches(&doc("u-1", Some("p-2"))));
        assert!(!filter.matches(&doc("u-1", None)));
        assert!(!filter.matches(&doc("u-2", Some("p-1"))));
    }

    #[test]
    fn document_without_owner_never_matches() {
        let filter = CollectionFilter::owned_by("u-1");
        let doc = Document::new("d-1", serde_json::json!({"title": "stray"}));
        assert!(!filter.matches(&doc));
    }
}
