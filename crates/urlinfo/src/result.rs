// ABOUTME: PageMetadata holding the preview fields of a page, and the UrlInfoResponse envelope.
// ABOUTME: Serialized with the wire names ogImage/title/description/favicon and status/msg/data.

use serde::{Deserialize, Serialize};

/// Envelope status for a successful lookup (including degraded empty results).
pub const STATUS_SUCCESS: u8 = 1;
/// Envelope status for a rejected request.
pub const STATUS_ERROR: u8 = 0;

/// Preview metadata extracted from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(rename = "ogImage", default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

impl PageMetadata {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.preview_image.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.favicon.is_none()
    }

    /// Returns true if a preview image was found.
    pub fn has_image(&self) -> bool {
        self.preview_image.as_ref().map_or(false, |u| !u.is_empty())
    }
}

/// JSON envelope returned by the urlInfo endpoint and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlInfoResponse {
    pub status: u8,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PageMetadata>,
}

impl UrlInfoResponse {
    pub fn success(data: PageMetadata) -> Self {
        Self {
            status: STATUS_SUCCESS,
            msg: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
