//! Parser for the attribute store command protocol.
//!
//! The host sends a command string plus a parameter array:
//! - `GetIdentity;field,field,...` with `[identity]`
//! - `LogClaim` with `["identity::claimType::claimValue"]`
//! - `SetRolesInactive` with `[identity]`
//!
//! The wire format stops here; the dispatcher only sees `AttributeQuery`.

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::directory_user::DirectoryUser,
};

const GET_IDENTITY: &str = "GetIdentity";
const LOG_CLAIM: &str = "LogClaim";
const SET_ROLES_INACTIVE: &str = "SetRolesInactive";

const FIELD_LIST_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ',';
const CLAIM_SEGMENT_SEPARATOR: &str = "::";

/// User flags that `GetIdentity` can project into its output row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    IsApproved,
    IsSecurityApproved,
    IsTouAccepted,
}

impl IdentityField {
    /// Match a requested field name exactly; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "isApproved" => Some(IdentityField::IsApproved),
            "isSecurityApproved" => Some(IdentityField::IsSecurityApproved),
            "isTOUAccepted" => Some(IdentityField::IsTouAccepted),
            _ => None,
        }
    }

    pub fn value_of(&self, user: &DirectoryUser) -> bool {
        match self {
            IdentityField::IsApproved => user.is_approved,
            IdentityField::IsSecurityApproved => user.is_security_approved,
            IdentityField::IsTouAccepted => user.is_tou_accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetIdentityRequest {
    pub identity: String,
    /// Recognized fields in the order they were requested. `None` when the
    /// command carried no `;` field list; the user is still looked up.
    pub fields: Option<Vec<IdentityField>>,
}

impl GetIdentityRequest {
    /// Render the requested flags of `user` as one output row, or `None`
    /// without a field list.
    pub fn project(&self, user: &DirectoryUser) -> Option<Vec<String>> {
        self.fields.as_ref().map(|fields| {
            fields
                .iter()
                .map(|field| format_flag(field.value_of(user)))
                .collect()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogClaimRequest {
    pub identity: String,
    pub claim_type: String,
    pub claim_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRolesInactiveRequest {
    pub identity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeQuery {
    GetIdentity(GetIdentityRequest),
    LogClaim(LogClaimRequest),
    SetRolesInactive(SetRolesInactiveRequest),
    /// Any command without a recognized prefix. Executes as a no-op.
    Unsupported,
}

impl AttributeQuery {
    /// Parse a raw command and parameter list.
    ///
    /// Returns `AppError::QueryFormat` only for an empty/absent command or
    /// absent parameters. A recognized command with unusable parameters is an
    /// `AppError::Internal`, which the dispatcher swallows.
    pub fn parse(command: Option<&str>, parameters: Option<&[String]>) -> AppResult<Self> {
        let command = match command {
            Some(c) if !c.is_empty() => c,
            _ => return Err(AppError::QueryFormat("No query string".into())),
        };
        let parameters =
            parameters.ok_or_else(|| AppError::QueryFormat("No query parameter".into()))?;

        if command.starts_with(GET_IDENTITY) {
            let identity = first_parameter(GET_IDENTITY, parameters)?;
            let fields = command.split(FIELD_LIST_SEPARATOR).nth(1).map(|list| {
                list.split(FIELD_SEPARATOR)
                    .filter_map(IdentityField::from_name)
                    .collect()
            });
            Ok(AttributeQuery::GetIdentity(GetIdentityRequest {
                identity: identity.to_string(),
                fields,
            }))
        } else if command.starts_with(LOG_CLAIM) {
            let raw = first_parameter(LOG_CLAIM, parameters)?;
            let segments: Vec<&str> = raw.split(CLAIM_SEGMENT_SEPARATOR).collect();
            match segments.as_slice() {
                [identity, claim_type, claim_value] => Ok(AttributeQuery::LogClaim(LogClaimRequest {
                    identity: identity.to_string(),
                    claim_type: claim_type.to_string(),
                    claim_value: claim_value.to_string(),
                })),
                _ => Err(AppError::Internal(format!(
                    "{} expects identity::claimType::claimValue, got {} segment(s)",
                    LOG_CLAIM,
                    segments.len()
                ))),
            }
        } else if command.starts_with(SET_ROLES_INACTIVE) {
            let identity = first_parameter(SET_ROLES_INACTIVE, parameters)?;
            Ok(AttributeQuery::SetRolesInactive(SetRolesInactiveRequest {
                identity: identity.to_string(),
            }))
        } else {
            Ok(AttributeQuery::Unsupported)
        }
    }
}

fn first_parameter<'a>(operation: &str, parameters: &'a [String]) -> AppResult<&'a str> {
    parameters
        .first()
        .map(String::as_str)
        .ok_or_else(|| AppError::Internal(format!("{} requires a first parameter", operation)))
}

/// Booleans go over the wire as `True` / `False`.
fn format_flag(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}
