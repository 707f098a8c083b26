//! Select options for the user and asset pickers.

use assetdesk_forms::SelectOption;
use assetdesk_resources::{Asset, User};

/// One option per saved user, with the avatar when there is one.
pub fn user_options(users: &[User]) -> Vec<SelectOption> {
    users
        .iter()
        .filter_map(|user| {
            let id = user.id?;
            let option = SelectOption::new(id, user.name.clone(), id.get());
            Some(match &user.avatar {
                Some(src) => option.with_avatar(src.clone()),
                None => option,
            })
        })
        .collect()
}

/// One option per saved asset.
pub fn asset_options(assets: &[Asset]) -> Vec<SelectOption> {
    assets
        .iter()
        .filter_map(|asset| {
            let id = asset.id?;
            Some(SelectOption::new(id, asset.name.clone(), id.get()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetdesk_core::{AssetId, UserId};
    use serde_json::json;

    #[test]
    fn users_carry_avatars() {
        let options = user_options(&[
            User::new(UserId::new(9), "Grace").with_avatar("/g.png"),
            User::new(UserId::new(5), "Ada"),
            User::default(),
        ]);

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].key, "9");
        assert_eq!(options[0].value, json!(9));
        assert_eq!(options[0].image.as_ref().unwrap().src, "/g.png");
        assert!(options[0].image.as_ref().unwrap().avatar);
        assert!(options[1].image.is_none());
    }

    #[test]
    fn assets_have_no_image() {
        let options = asset_options(&[Asset::new(AssetId::new(3), "Van")]);
        assert_eq!(options[0].text, "Van");
        assert!(options[0].image.is_none());
    }
}
