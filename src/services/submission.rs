use std::path::PathBuf;

use sea_orm::{DatabaseTransaction, DbErr};
use tracing::{error, info, warn};

use super::entries::NewContestEntry;
use super::media::MediaStore;
use super::photos::{NewPhoto, NewPhotoFile};
use super::repository::{Repository, StoreError};
use crate::entities::contest_entry::{self, EntryStatus};
use crate::entities::user;
use crate::models::photo_size::PhotoSize;
use crate::models::submission::{
    check_image_type, check_release_type, check_signature, EntryDetails, Submission, UploadedFile,
};
use crate::utils::image_processor::{self, DerivativeError};

/// Neither side of an uploaded original may exceed this many pixels.
pub const MAX_SOURCE_PIXELS: u32 = 2000;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(String),
    #[error("You already have {0} contest entries")]
    LimitReached(u64),
    #[error("Photo is {width}x{height} pixels; neither side may exceed {max}")]
    Oversize { width: u32, height: u32, max: u32 },
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("media write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Derivative(#[from] DerivativeError),
    #[error("image task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<StoreError> for SubmitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => SubmitError::NotFound,
            StoreError::Validation(msg) => SubmitError::Validation(msg),
            StoreError::Database(e) => SubmitError::Database(e),
            other => SubmitError::Store(other),
        }
    }
}

impl SubmitError {
    /// Whether the message may be shown to the participant as is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SubmitError::Validation(_)
                | SubmitError::LimitReached(_)
                | SubmitError::Oversize { .. }
                | SubmitError::NotFound
        )
    }
}

/// Turns a participant's upload into a contest entry: photo row, stored
/// original and release, size-table renditions. Release documents go to
/// their own store so they never share the public media tree.
///
/// A new submission is written
/// inside one transaction; on failure nothing is committed and the files
/// written so far are removed.
#[derive(Clone, Debug)]
pub struct SubmissionPipeline {
    repo: Repository,
    media: MediaStore,
    releases: MediaStore,
    release_mime_types: Vec<String>,
    entry_limit: u64,
    derivative_sizes: Vec<String>,
}

impl SubmissionPipeline {
    pub fn new(
        repo: Repository,
        media: MediaStore,
        releases: MediaStore,
        release_mime_types: Vec<String>,
        entry_limit: u64,
    ) -> Self {
        Self {
            repo,
            media,
            releases,
            release_mime_types,
            entry_limit,
            derivative_sizes: PhotoSize::DERIVATIVES.iter().map(|s| s.name().to_string()).collect(),
        }
    }

    /// Overrides the rendered sizes; each name must be in the size table.
    pub fn with_derivative_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derivative_sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    pub fn releases(&self) -> &MediaStore {
        &self.releases
    }

    pub async fn submit(
        &self,
        owner_id: i32,
        contest_id: i32,
        submission: Submission,
    ) -> Result<contest_entry::Model, SubmitError> {
        let owner = self.repo.user_by_id(owner_id).await?;
        check_signature(&submission.signature, &owner.name).map_err(SubmitError::Validation)?;
        submission.details.validate().map_err(SubmitError::Validation)?;
        self.repo.contest_by_id(contest_id).await?;

        if let Some(entry_id) = submission.entry_id {
            return self.edit(&owner, contest_id, entry_id, submission.details).await;
        }

        let image = submission
            .image
            .ok_or_else(|| SubmitError::Validation("A photo is required".to_string()))?;
        let release = submission
            .release
            .ok_or_else(|| SubmitError::Validation("A signed release document is required".to_string()))?;
        check_image_type(&image.content_type).map_err(SubmitError::Validation)?;
        check_release_type(&release.content_type, &self.release_mime_types).map_err(SubmitError::Validation)?;

        let mut written: Vec<PathBuf> = Vec::new();
        let txn = self.repo.begin().await?;
        let result = match self
            .write_submission(&txn, &owner, contest_id, submission.details, image, release, &mut written)
            .await
        {
            Ok(entry) => txn.commit().await.map(|_| entry).map_err(SubmitError::from),
            Err(e) => {
                if let Err(rb) = txn.rollback().await {
                    error!(owner_id, error = %rb, "submission rollback failed");
                }
                Err(e)
            }
        };

        match &result {
            Ok(entry) => info!(owner_id, contest_id, entry_id = entry.id, photo_id = %entry.photo_id, "submission accepted"),
            Err(e) => {
                warn!(owner_id, contest_id, error = %e, files = written.len(), "submission failed, discarding files");
                for path in &written {
                    self.media.remove(path).await;
                }
            }
        }
        result
    }

    async fn edit(
        &self,
        owner: &user::Model,
        contest_id: i32,
        entry_id: i32,
        details: EntryDetails,
    ) -> Result<contest_entry::Model, SubmitError> {
        let entry = self.repo.entry_by_id(entry_id).await?;
        let photo = self.repo.photo_by_id(entry.photo_id).await?;
        if photo.owner_id != owner.id || photo.deleted || entry.contest_id != contest_id {
            return Err(SubmitError::NotFound);
        }
        if entry.status != EntryStatus::Active {
            return Err(SubmitError::Validation("Only active entries can be edited".to_string()));
        }

        let updated = self.repo.fully_update_entry(entry_id, details, &owner.name).await?;
        info!(owner_id = owner.id, entry_id, "submission edited");
        Ok(updated)
    }

    #[allow(clippy::too_many_arguments)]
    async fn write_submission(
        &self,
        txn: &Repository<DatabaseTransaction>,
        owner: &user::Model,
        contest_id: i32,
        details: EntryDetails,
        image: UploadedFile,
        release: UploadedFile,
        written: &mut Vec<PathBuf>,
    ) -> Result<contest_entry::Model, SubmitError> {
        txn.lock_user(owner.id).await?;
        let active = txn.count_active_entries(owner.id).await?;
        if active >= self.entry_limit {
            return Err(SubmitError::LimitReached(active));
        }

        let title = details.subject_name.clone();
        let photo = txn
            .create_photo(NewPhoto {
                owner_id: owner.id,
                title,
                description: details.location.clone(),
                updated_by: owner.name.clone(),
            })
            .await?;

        let release_name = MediaStore::release_name(photo.id, release.extension());
        written.push(self.releases.resolve(&release_name));
        self.releases.put(&release_name, &release.data).await?;

        let entry = txn
            .create_contest_entry(NewContestEntry {
                contest_id,
                photo_id: photo.id,
                details,
                release_mime_type: release.content_type.clone(),
                status: EntryStatus::Active,
                updated_by: owner.name.clone(),
            })
            .await?;

        let original_name = MediaStore::original_name(photo.id, image.extension());
        let original_path = self.media.resolve(&original_name);
        written.push(original_path.clone());
        self.media.put(&original_name, &image.data).await?;
        txn.create_photo_file(NewPhotoFile {
            photo_id: photo.id,
            file_path: original_name,
            size: PhotoSize::Original.name().to_string(),
            updated_by: owner.name.clone(),
        })
        .await?;

        let stored = original_path.clone();
        let (width, height) = tokio::task::spawn_blocking(move || image_processor::image_dimensions(&stored)).await??;
        if width > MAX_SOURCE_PIXELS || height > MAX_SOURCE_PIXELS {
            return Err(SubmitError::Oversize {
                width,
                height,
                max: MAX_SOURCE_PIXELS,
            });
        }

        for size in &self.derivative_sizes {
            let target_name = MediaStore::derivative_name(photo.id, size);
            let file = txn
                .create_photo_file(NewPhotoFile {
                    photo_id: photo.id,
                    file_path: target_name.clone(),
                    size: size.clone(),
                    updated_by: owner.name.clone(),
                })
                .await?;

            let source = original_path.clone();
            let target = self.media.resolve(&target_name);
            written.push(target.clone());
            let pixels = file.width as u32;
            tokio::task::spawn_blocking(move || image_processor::make_derivative(&source, &target, pixels)).await??;
            info!(photo_id = %photo.id, size = %size, pixels, "derivative rendered");
        }

        Ok(entry)
    }
}
