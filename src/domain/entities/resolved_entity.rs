use serde::Serialize;

use super::{claim::IssuedClaim, entity_kind::EntityKind};

/// Display metadata shown alongside a picker entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMetadata {
    pub display_name: String,
    pub email: String,
    pub title: String,
}

/// A normalized, display-ready user or role returned by resolve and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEntity {
    pub claim: IssuedClaim,
    pub display_text: String,
    pub description: String,
    pub metadata: EntityMetadata,
    pub kind: EntityKind,
    pub entity_type: &'static str,
    pub is_resolved: bool,
    pub group: &'static str,
}
