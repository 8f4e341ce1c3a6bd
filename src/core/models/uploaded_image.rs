#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub object_name: String,
    pub media_url: String,
}
