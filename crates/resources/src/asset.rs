use assetdesk_core::{AssetId, Entity};
use serde::{Deserialize, Serialize};

/// A bookable resource (room, vehicle, device...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub id: Option<AssetId>,
    #[serde(default)]
    pub name: String,
}

impl Asset {
    pub fn new(id: AssetId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}

impl Entity for Asset {
    type Id = AssetId;

    const RESOURCE: &'static str = "assets";

    fn id(&self) -> Option<AssetId> {
        self.id
    }

    fn set_id(&mut self, id: AssetId) {
        self.id = Some(id);
    }
}
