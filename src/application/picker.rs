//! Entity normalization: turns repository users and roles into picker entities.

use crate::domain::entities::{
    claim::IssuedClaim,
    directory_user::DirectoryUser,
    entity_kind::EntityKind,
    resolved_entity::{EntityMetadata, ResolvedEntity},
};

const ROLE_DESCRIPTION: &str = "Role";

/// Schema element a picker host can display for an entity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SchemaElement {
    pub key: &'static str,
    pub display_name: &'static str,
}

/// Entity data keys exposed by every resolved entity.
pub const PICKER_SCHEMA: [SchemaElement; 3] = [
    SchemaElement {
        key: "DisplayName",
        display_name: "DisplayName",
    },
    SchemaElement {
        key: "Email",
        display_name: "EmailAddress",
    },
    SchemaElement {
        key: "JobTitle",
        display_name: "Identity",
    },
];

pub fn normalize_user(
    user: &DirectoryUser,
    identity_claim_type: &str,
    issuer_name: &str,
) -> ResolvedEntity {
    let claim = IssuedClaim::trusted(identity_claim_type, user.identity.as_str(), issuer_name);

    let description = first_non_empty(&[user.email.as_str(), claim.value.as_str()]).to_string();
    let display_text = first_non_empty(&[
        user.display_name.as_str(),
        user.email.as_str(),
        user.identity.as_str(),
    ]).to_string();

    ResolvedEntity {
        metadata: EntityMetadata {
            display_name: display_text.clone(),
            email: user.email.clone(),
            title: description.clone(),
        },
        claim,
        display_text,
        description,
        kind: EntityKind::User,
        entity_type: EntityKind::User.picker_entity_type(),
        is_resolved: true,
        group: EntityKind::User.group_label(),
    }
}

pub fn normalize_role(role_name: &str, role_claim_type: &str, issuer_name: &str) -> ResolvedEntity {
    ResolvedEntity {
        claim: IssuedClaim::trusted(role_claim_type, role_name, issuer_name),
        display_text: role_name.to_string(),
        description: ROLE_DESCRIPTION.to_string(),
        metadata: EntityMetadata {
            display_name: role_name.to_string(),
            email: String::new(),
            title: ROLE_DESCRIPTION.to_string(),
        },
        kind: EntityKind::Role,
        entity_type: EntityKind::Role.picker_entity_type(),
        is_resolved: true,
        group: EntityKind::Role.group_label(),
    }
}

fn first_non_empty<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}
