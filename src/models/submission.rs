use serde::{Deserialize, Serialize};

pub const BIOGRAPHY_MIN_CHARS: usize = 250;
pub const BIOGRAPHY_MAX_CHARS: usize = 500;
pub const IMAGE_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// A file part taken from the multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: None,
            content_type: content_type.into(),
            data,
        }
    }

    /// File extension used on disk, derived from the declared content type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "application/pdf" => "pdf",
            "application/msword" => "doc",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
            _ => "bin",
        }
    }
}

/// Subject-release metadata carried by a contest entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EntryDetails {
    pub subject_name: String,
    pub subject_age: i32,
    pub subject_country: String,
    pub subject_origin: String,
    pub location: String,
    pub subject_biography: String,
}

impl EntryDetails {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("Subject name", &self.subject_name),
            ("Subject country", &self.subject_country),
            ("Subject origin", &self.subject_origin),
            ("Location", &self.location),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} is required", label));
            }
        }

        if !(1..=120).contains(&self.subject_age) {
            return Err("Subject age must be between 1 and 120".to_string());
        }

        let bio_len = self.subject_biography.trim().chars().count();
        if !(BIOGRAPHY_MIN_CHARS..=BIOGRAPHY_MAX_CHARS).contains(&bio_len) {
            return Err(format!(
                "Biography must be between {} and {} characters (got {})",
                BIOGRAPHY_MIN_CHARS, BIOGRAPHY_MAX_CHARS, bio_len
            ));
        }

        Ok(())
    }
}

/// Everything a participant sends when entering (or editing) a contest entry.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Present when editing an existing active entry in place.
    pub entry_id: Option<i32>,
    pub signature: String,
    pub details: EntryDetails,
    pub image: Option<UploadedFile>,
    pub release: Option<UploadedFile>,
}

/// The signature must reproduce the account's legal name exactly,
/// including case and surrounding whitespace.
pub fn check_signature(signature: &str, legal_name: &str) -> Result<(), String> {
    if signature != legal_name {
        return Err("Signature must match the name on your account".to_string());
    }
    Ok(())
}

pub fn check_image_type(content_type: &str) -> Result<(), String> {
    if !IMAGE_MIME_TYPES.contains(&content_type) {
        return Err(format!("Invalid photo content type: {}", content_type));
    }
    Ok(())
}

pub fn check_release_type(content_type: &str, allowed: &[String]) -> Result<(), String> {
    if !allowed.iter().any(|m| m == content_type) {
        return Err(format!("Invalid release document content type: {}", content_type));
    }
    Ok(())
}
