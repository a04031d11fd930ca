pub mod entries;
pub mod media;
pub mod photos;
pub mod repository;
pub mod submission;
pub mod users;
pub mod withdrawal;

pub use repository::{Repository, StoreError};
