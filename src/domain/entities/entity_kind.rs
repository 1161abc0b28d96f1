use serde::{Deserialize, Serialize};

/// The kinds of entity the claims provider can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    User,
    Role,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Role => "Role",
        }
    }

    /// Label under which the picker groups entities of this kind.
    pub fn group_label(&self) -> &'static str {
        match self {
            EntityKind::User => "Users",
            EntityKind::Role => "Roles",
        }
    }

    /// Entity type name understood by people-picker hosts.
    pub fn picker_entity_type(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Role => "FormsRole",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(EntityKind::User),
            "Role" | "FormsRole" => Ok(EntityKind::Role),
            _ => Err(format!("Invalid entity kind: {}. Must be 'User' or 'Role'", s)),
        }
    }
}

/// Entity kinds a caller allows in one resolve/search request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityKinds {
    pub users: bool,
    pub roles: bool,
}

impl EntityKinds {
    pub fn all() -> Self {
        Self {
            users: true,
            roles: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn allows(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::User => self.users,
            EntityKind::Role => self.roles,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.users && !self.roles
    }
}

impl FromIterator<EntityKind> for EntityKinds {
    fn from_iter<I: IntoIterator<Item = EntityKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), |mut kinds, kind| {
            match kind {
                EntityKind::User => kinds.users = true,
                EntityKind::Role => kinds.roles = true,
            }
            kinds
        })
    }
}
