use serde::{Deserialize, Serialize};

/// Value type attached to every claim this provider issues.
pub const STRING_CLAIM_VALUE_TYPE: &str = "http://www.w3.org/2001/XMLSchema#string";

const TRUSTED_PROVIDER_ISSUER_PREFIX: &str = "TrustedProvider";

/// A bare (type, value) claim as received from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// A claim ready to hand back to the host, carrying its value type and issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedClaim {
    pub claim_type: String,
    pub value: String,
    pub value_type: String,
    pub original_issuer: String,
}

impl IssuedClaim {
    /// Build a string-valued claim issued by the named trusted provider.
    pub fn trusted(
        claim_type: impl Into<String>,
        value: impl Into<String>,
        issuer_name: &str,
    ) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: STRING_CLAIM_VALUE_TYPE.to_string(),
            original_issuer: format_trusted_issuer(issuer_name),
        }
    }
}

/// Format an original-issuer string for a trusted identity provider.
pub fn format_trusted_issuer(issuer_name: &str) -> String {
    format!("{}:{}", TRUSTED_PROVIDER_ISSUER_PREFIX, issuer_name)
}
