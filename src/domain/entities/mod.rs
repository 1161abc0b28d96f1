pub mod claim;
pub mod directory_role;
pub mod directory_user;
pub mod entity_kind;
pub mod profile_property;
pub mod resolved_entity;
