use serde::Serialize;

/// Key/value profile attribute attached to a user. Passed through uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileProperty {
    pub name: String,
    pub value: String,
}

impl ProfileProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
