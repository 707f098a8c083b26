use assetdesk_core::{AssetId, Entity, RequestId, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Asset, User};

/// A user's request to book an asset, pending until processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<RequestId>,
    #[serde(default)]
    pub asset_id: Option<AssetId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default, with = "crate::datetime::option")]
    pub from: Option<NaiveDateTime>,
    #[serde(default, with = "crate::datetime::option")]
    pub to: Option<NaiveDateTime>,
    #[serde(default, with = "crate::datetime::option")]
    pub processed_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
}

impl Request {
    pub fn is_processed(&self) -> bool {
        self.processed_at.is_some()
    }
}

impl Entity for Request {
    type Id = RequestId;

    const RESOURCE: &'static str = "requests";

    fn id(&self) -> Option<RequestId> {
        self.id
    }

    fn set_id(&mut self, id: RequestId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn processed_requests_are_flagged() {
        let request: Request = serde_json::from_value(json!({
            "id": 4,
            "processed_at": "2024-02-01T08:30",
        }))
        .unwrap();
        assert!(request.is_processed());
        assert_eq!(
            request.to_values().unwrap().get("processed_at"),
            Some(&json!("2024-02-01T08:30"))
        );
    }
}
