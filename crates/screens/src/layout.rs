//! Static field layouts of the booking and request forms.

use assetdesk_core::Entity;
use assetdesk_resources::{Booking, Request};

/// Input a field is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    UserSelect,
    AssetSelect,
    DateTimeLocal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input: Input,
    pub required: bool,
    pub read_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub equal_widths: bool,
    pub fields: &'static [FieldSpec],
}

/// What distinguishes one entity form from another.
pub trait FormLayout: Send + Sync + 'static {
    type Model: Entity + Default;

    /// Name used in logs.
    const NAME: &'static str;
    /// Capitalized noun, e.g. `Booking`.
    const NOUN: &'static str;
    /// Header text between the user and asset links.
    const RELATION: &'static str;

    fn groups() -> &'static [GroupSpec];
}

/// asset + user, from + to, processed at.
const RESERVATION_GROUPS: &[GroupSpec] = &[
    GroupSpec {
        equal_widths: true,
        fields: &[
            FieldSpec {
                name: "asset_id",
                label: "Asset",
                placeholder: "Select an Asset",
                input: Input::AssetSelect,
                required: true,
                read_only: false,
            },
            FieldSpec {
                name: "user_id",
                label: "User",
                placeholder: "Select a User",
                input: Input::UserSelect,
                required: true,
                read_only: false,
            },
        ],
    },
    GroupSpec {
        equal_widths: true,
        fields: &[
            FieldSpec {
                name: "from",
                label: "From",
                placeholder: "From",
                input: Input::DateTimeLocal,
                required: true,
                read_only: false,
            },
            FieldSpec {
                name: "to",
                label: "To",
                placeholder: "To",
                input: Input::DateTimeLocal,
                required: true,
                read_only: false,
            },
        ],
    },
    GroupSpec {
        equal_widths: false,
        fields: &[FieldSpec {
            name: "processed_at",
            label: "Processed On",
            placeholder: "Processed At",
            input: Input::DateTimeLocal,
            required: false,
            read_only: true,
        }],
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BookingLayout;

impl FormLayout for BookingLayout {
    type Model = Booking;

    const NAME: &'static str = "booking";
    const NOUN: &'static str = "Booking";
    const RELATION: &'static str = " booking on ";

    fn groups() -> &'static [GroupSpec] {
        RESERVATION_GROUPS
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLayout;

impl FormLayout for RequestLayout {
    type Model = Request;

    const NAME: &'static str = "request";
    const NOUN: &'static str = "Request";
    const RELATION: &'static str = " requested ";

    fn groups() -> &'static [GroupSpec] {
        RESERVATION_GROUPS
    }
}
