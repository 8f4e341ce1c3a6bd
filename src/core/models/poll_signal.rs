use serde::{Deserialize, Serialize};

/// Body of the coordinator's check endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSignal {
    #[serde(rename = "NewPicRequested", default)]
    pub new_pic_requested: bool,
}

impl PollSignal {
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
