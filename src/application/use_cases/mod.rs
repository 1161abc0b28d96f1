pub mod attribute_store;
pub mod claim_types;
pub mod claims_provider;
pub mod directory;
