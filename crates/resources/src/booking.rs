use assetdesk_core::{AssetId, BookingId, Entity, UserId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Asset, User};

/// A confirmed reservation of an asset by a user over a time range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default)]
    pub id: Option<BookingId>,
    #[serde(default)]
    pub asset_id: Option<AssetId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default, with = "crate::datetime::option")]
    pub from: Option<NaiveDateTime>,
    #[serde(default, with = "crate::datetime::option")]
    pub to: Option<NaiveDateTime>,
    /// Set by the backend once the booking has been handled.
    #[serde(default, with = "crate::datetime::option")]
    pub processed_at: Option<NaiveDateTime>,
    /// Embedded by the API on reads; never required on writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
}

impl Entity for Booking {
    type Id = BookingId;

    const RESOURCE: &'static str = "bookings";

    fn id(&self) -> Option<BookingId> {
        self.id
    }

    fn set_id(&mut self, id: BookingId) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn new_booking_values_have_every_editable_field() {
        let values = Booking::default().to_values().unwrap();
        assert_eq!(
            Value::Object(values),
            json!({
                "id": null,
                "asset_id": null,
                "user_id": null,
                "from": null,
                "to": null,
                "processed_at": null,
            })
        );
    }

    #[test]
    fn fill_merges_form_values() {
        let patch = json!({
            "asset_id": 3,
            "user_id": 9,
            "from": "2024-01-01T10:00",
            "to": "",
            "unknown": "ignored",
        });
        let booking = Booking::default()
            .fill(patch.as_object().unwrap())
            .unwrap();

        assert_eq!(booking.asset_id, Some(AssetId::new(3)));
        assert_eq!(booking.user_id, Some(UserId::new(9)));
        assert!(booking.from.is_some());
        assert!(booking.to.is_none());
        assert!(!booking.is_persisted());
    }

    #[test]
    fn fill_rejects_mistyped_values() {
        let patch = json!({"asset_id": "three"});
        assert!(Booking::default().fill(patch.as_object().unwrap()).is_err());
    }

    #[test]
    fn reads_embedded_relations() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 1,
            "asset_id": 2,
            "user_id": 5,
            "from": "2024-01-01 10:00:00",
            "to": "2024-01-01 12:00:00",
            "processed_at": null,
            "user": {"id": 5, "name": "Ada", "avatar": "/a.png"},
            "asset": {"id": 2, "name": "Projector"},
        }))
        .unwrap();

        assert_eq!(booking.identity().as_deref(), Some("1"));
        assert_eq!(booking.user.unwrap().name, "Ada");
        assert_eq!(booking.asset.unwrap().name, "Projector");
    }
}
