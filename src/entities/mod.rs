pub mod contest;
pub mod contest_entry;
pub mod contest_photo_vote;
pub mod photo;
pub mod photo_file;
pub mod refresh_token;
pub mod user;
