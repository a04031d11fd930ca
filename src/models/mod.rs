pub mod photo_size;
pub mod submission;
