//! Video locators and platform names.

use serde_json::Value;

use crate::{IdRef, ViralAppError};

/// A fully resolved video: platform plus the platform's own video ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    /// Lowercase platform name, e.g. `tiktok`.
    pub platform: String,
    /// Platform video ID.
    pub video_id: String,
}

impl VideoRef {
    /// Resolves a video from a locator and a separately selected platform.
    ///
    /// The locator may be a plain ID, a locator object, or a composite
    /// `"platform:videoId"` string whose platform overrides `platform`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no video ID or no platform can be derived.
    pub fn resolve(
        selection: Option<&Value>,
        platform: Option<&str>,
    ) -> Result<Self, ViralAppError> {
        let selection = selection
            .and_then(IdRef::from_value)
            .and_then(|r| r.first_id())
            .unwrap_or_default();

        let (derived_platform, video_id) = match selection.split_once(':') {
            Some((platform_part, id_part)) => (
                Some(platform_part.trim().to_lowercase()).filter(|p| !p.is_empty()),
                id_part.trim().to_string(),
            ),
            None => (None, selection),
        };

        if video_id.is_empty() {
            return Err(ViralAppError::validation("Video ID is required."));
        }

        let platform = derived_platform
            .or_else(|| {
                platform
                    .map(|p| p.trim().to_lowercase())
                    .filter(|p| !p.is_empty())
            })
            .ok_or_else(|| ViralAppError::validation("Platform is required."))?;

        Ok(Self { platform, video_id })
    }

    /// Returns the API path of this video, `/videos/{platform}/{id}`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/videos/{}/{}", self.platform, self.video_id)
    }
}

impl std::fmt::Display for VideoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.platform, self.video_id)
    }
}

/// Returns the display name of a platform, or the input when it is unknown.
#[must_use]
pub fn platform_display_name(platform: &str) -> &str {
    match platform {
        "tiktok" => "TikTok",
        "instagram" => "Instagram",
        "youtube" => "YouTube",
        other => other,
    }
}
