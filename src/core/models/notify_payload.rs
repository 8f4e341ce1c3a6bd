use serde::{Deserialize, Serialize};

use crate::core::models::UploadedImage;
use crate::global_constants;

/// Body posted to the coordinator's update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyPayload {
    #[serde(rename = "LatestImageURL")]
    pub latest_image_url: String,
}

impl NotifyPayload {
    pub fn for_image(image: &UploadedImage) -> Self {
        if image.media_url.trim().is_empty() {
            log::warn!(
                "[NOTIFY] upload of {} returned no media link, reporting placeholder",
                image.object_name
            );
            return Self::upload_failed();
        }

        Self {
            latest_image_url: image.media_url.clone(),
        }
    }

    pub fn upload_failed() -> Self {
        Self {
            latest_image_url: global_constants::UPLOAD_FAILED_PLACEHOLDER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_coordinator_field_name() {
        let payload = NotifyPayload {
            latest_image_url: "https://storage/x.jpg".to_string(),
        };

        let json = serde_json::to_string(&payload).unwrap();

        assert_eq!(json, r#"{"LatestImageURL":"https://storage/x.jpg"}"#);
    }

    #[test]
    fn test_for_image_uses_media_url() {
        let image = UploadedImage {
            object_name: "imgs/lot/a".to_string(),
            media_url: "https://storage/download/a".to_string(),
        };

        assert_eq!(
            NotifyPayload::for_image(&image).latest_image_url,
            "https://storage/download/a"
        );
    }

    #[test]
    fn test_for_image_without_media_url_reports_placeholder() {
        let image = UploadedImage {
            object_name: "imgs/lot/a".to_string(),
            media_url: String::new(),
        };

        assert_eq!(NotifyPayload::for_image(&image), NotifyPayload::upload_failed());
    }
}
