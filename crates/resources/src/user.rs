use assetdesk_core::{Entity, UserId};
use serde::{Deserialize, Serialize};

/// A person who can hold bookings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, src: impl Into<String>) -> Self {
        self.avatar = Some(src.into());
        self
    }
}

impl Entity for User {
    type Id = UserId;

    const RESOURCE: &'static str = "users";

    fn id(&self) -> Option<UserId> {
        self.id
    }

    fn set_id(&mut self, id: UserId) {
        self.id = Some(id);
    }
}
