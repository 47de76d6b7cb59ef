//! Client configuration.
//!
//! Everything has a default matching the server templates, so an empty
//! JSON object is a complete config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::swap::SwapPolicy;
use crate::widgets::LightboxOptions;

/// Notification the server triggers after a photo is deleted
pub const PHOTO_DELETED_EVENT: &str = "PhotoDeletedEvent";

/// Element ids and classes shared with the server-rendered markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementIds {
    pub create_album_label: String,
    pub create_album_name: String,
    pub login_form: String,
    pub login_button: String,
    pub captcha_container: String,
    pub main_menu: String,
    pub main_menu_burger: String,
    pub logout_button: String,
    pub photo_gallery: String,
    pub edit_photos_menu: String,
    pub album_menu: String,
    pub album_menu_trigger: String,
    pub photos_count: String,
    pub current_count_class: String,
    pub total_count_class: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            create_album_label: "create-album-label".to_string(),
            create_album_name: "create-album-name".to_string(),
            login_form: "login-form".to_string(),
            login_button: "btn-login".to_string(),
            captcha_container: "g-recaptcha".to_string(),
            main_menu: "main-menu".to_string(),
            main_menu_burger: "main-menu-burger".to_string(),
            logout_button: "btn-logout".to_string(),
            photo_gallery: "photo-gallery".to_string(),
            edit_photos_menu: "menu-edit-photos".to_string(),
            album_menu: "btn-album-menu".to_string(),
            album_menu_trigger: "btn-album-menu-trigger".to_string(),
            photos_count: "photos-count-w".to_string(),
            current_count_class: "current-count".to_string(),
            total_count_class: "total-records".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub ids: ElementIds,
    pub swap: SwapPolicy,
    pub lightbox: LightboxOptions,
    /// Name of the photo deletion notification
    pub photo_deleted_event: String,
}

impl ClientConfig {
    pub fn from_json_str(json: &str) -> ClientResult<Self> {
        let config: ClientConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), "loaded client config");
        Ok(config)
    }

    fn validate(&self) -> ClientResult<()> {
        if self.photo_deleted_event.trim().is_empty() {
            return Err(ClientError::Config(
                "photo_deleted_event must not be empty".to_string(),
            ));
        }
        let ids = [
            ("create_album_label", &self.ids.create_album_label),
            ("create_album_name", &self.ids.create_album_name),
            ("login_form", &self.ids.login_form),
            ("login_button", &self.ids.login_button),
            ("captcha_container", &self.ids.captcha_container),
            ("main_menu", &self.ids.main_menu),
            ("main_menu_burger", &self.ids.main_menu_burger),
            ("logout_button", &self.ids.logout_button),
            ("photo_gallery", &self.ids.photo_gallery),
            ("edit_photos_menu", &self.ids.edit_photos_menu),
            ("album_menu", &self.ids.album_menu),
            ("album_menu_trigger", &self.ids.album_menu_trigger),
            ("photos_count", &self.ids.photos_count),
            ("current_count_class", &self.ids.current_count_class),
            ("total_count_class", &self.ids.total_count_class),
        ];
        for (field, value) in ids {
            if value.is_empty() || value.contains(char::is_whitespace) {
                return Err(ClientError::Config(format!(
                    "ids.{field} must be a single non-empty token, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ids: ElementIds::default(),
            swap: SwapPolicy::default(),
            lightbox: LightboxOptions::default(),
            photo_deleted_event: PHOTO_DELETED_EVENT.to_string(),
        }
    }
}
