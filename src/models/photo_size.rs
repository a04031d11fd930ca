use serde::{Deserialize, Serialize};

/// Named renditions of a photo. Every size is a square of fixed pixel
/// dimensions; the table is static and never measured from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhotoSize {
    Thumb,
    Small,
    Medium,
    Large,
    Original,
}

impl PhotoSize {
    /// Derivatives rendered for every submission, in render order.
    pub const DERIVATIVES: [PhotoSize; 4] = [
        PhotoSize::Thumb,
        PhotoSize::Small,
        PhotoSize::Medium,
        PhotoSize::Large,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "thumb" => Some(PhotoSize::Thumb),
            "small" => Some(PhotoSize::Small),
            "medium" => Some(PhotoSize::Medium),
            "large" => Some(PhotoSize::Large),
            "original" => Some(PhotoSize::Original),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PhotoSize::Thumb => "thumb",
            PhotoSize::Small => "small",
            PhotoSize::Medium => "medium",
            PhotoSize::Large => "large",
            PhotoSize::Original => "original",
        }
    }

    pub fn pixels(self) -> u32 {
        match self {
            PhotoSize::Thumb => 200,
            PhotoSize::Small => 400,
            PhotoSize::Medium => 800,
            PhotoSize::Large => 1200,
            PhotoSize::Original => 2000,
        }
    }
}

impl std::fmt::Display for PhotoSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
