use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::repository::{Repository, StoreError};
use crate::entities::{photo, photo_file};
use crate::models::photo_size::PhotoSize;

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub owner_id: i32,
    pub title: String,
    pub description: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePhoto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deleted: Option<bool>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPhotoFile {
    pub photo_id: Uuid,
    pub file_path: String,
    /// Must name an entry of the size table.
    pub size: String,
    pub updated_by: String,
}

impl<C: ConnectionTrait> Repository<C> {
    pub async fn create_photo(&self, np: NewPhoto) -> Result<photo::Model, StoreError> {
        let now = Utc::now().naive_utc();
        let model = photo::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(np.owner_id),
            title: Set(np.title),
            description: Set(np.description),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            updated_by: Set(np.updated_by),
        };

        let saved = model.insert(&self.db).await?;
        debug!(photo_id = %saved.id, owner_id = saved.owner_id, "photo.create");
        Ok(saved)
    }

    /// Applies only the fields that are set.
    pub async fn update_photo(&self, photo_id: Uuid, up: UpdatePhoto) -> Result<photo::Model, StoreError> {
        let existing = self.photo_by_id(photo_id).await?;

        let mut active: photo::ActiveModel = existing.into();
        if let Some(title) = up.title {
            active.title = Set(title);
        }
        if let Some(description) = up.description {
            active.description = Set(description);
        }
        if let Some(deleted) = up.deleted {
            active.deleted = Set(deleted);
        }
        if let Some(updated_by) = up.updated_by {
            active.updated_by = Set(updated_by);
        }
        active.updated_at = Set(Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        debug!(photo_id = %updated.id, deleted = updated.deleted, "photo.update");
        Ok(updated)
    }

    /// Soft-deletes the photo and hard-deletes its file rows.
    pub async fn delete_photo(&self, photo_id: Uuid) -> Result<u64, StoreError> {
        self.update_photo(
            photo_id,
            UpdatePhoto {
                deleted: Some(true),
                ..Default::default()
            },
        )
        .await?;

        let res = photo_file::Entity::delete_many()
            .filter(photo_file::Column::PhotoId.eq(photo_id))
            .exec(&self.db)
            .await?;
        debug!(photo_id = %photo_id, rows = res.rows_affected, "photo.delete purged photo_files");
        Ok(res.rows_affected)
    }

    pub async fn photo_by_id(&self, photo_id: Uuid) -> Result<photo::Model, StoreError> {
        photo::Entity::find_by_id(photo_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn photos_by_owner(&self, owner_id: i32) -> Result<Vec<photo::Model>, StoreError> {
        Ok(photo::Entity::find()
            .filter(photo::Column::OwnerId.eq(owner_id))
            .order_by_desc(photo::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Width and height come from the size table, not from the image itself.
    pub async fn create_photo_file(&self, nf: NewPhotoFile) -> Result<photo_file::Model, StoreError> {
        let size = PhotoSize::from_name(&nf.size).ok_or_else(|| StoreError::InvalidSize(nf.size.clone()))?;
        let pixels = size.pixels() as i32;
        let now = Utc::now().naive_utc();

        let model = photo_file::ActiveModel {
            id: Set(Uuid::new_v4()),
            photo_id: Set(nf.photo_id),
            file_path: Set(nf.file_path),
            size: Set(size.name().to_string()),
            width: Set(pixels),
            height: Set(pixels),
            created_at: Set(now),
            updated_at: Set(now),
            updated_by: Set(nf.updated_by),
        };

        let saved = model.insert(&self.db).await?;
        debug!(photo_id = %saved.photo_id, size = %saved.size, path = %saved.file_path, "photo.create_file");
        Ok(saved)
    }

    pub async fn photo_files(&self, photo_id: Uuid) -> Result<Vec<photo_file::Model>, StoreError> {
        Ok(photo_file::Entity::find()
            .filter(photo_file::Column::PhotoId.eq(photo_id))
            .order_by_asc(photo_file::Column::Width)
            .all(&self.db)
            .await?)
    }

    pub async fn photo_file(
        &self,
        photo_id: Uuid,
        size: PhotoSize,
    ) -> Result<Option<photo_file::Model>, StoreError> {
        Ok(photo_file::Entity::find()
            .filter(photo_file::Column::PhotoId.eq(photo_id))
            .filter(photo_file::Column::Size.eq(size.name()))
            .one(&self.db)
            .await?)
    }

    /// Paths of one size for many photos at once, keyed by photo.
    pub async fn photo_file_paths(
        &self,
        photo_ids: Vec<Uuid>,
        size: PhotoSize,
    ) -> Result<std::collections::HashMap<Uuid, String>, StoreError> {
        if photo_ids.is_empty() {
            return Ok(Default::default());
        }
        let files = photo_file::Entity::find()
            .filter(photo_file::Column::PhotoId.is_in(photo_ids))
            .filter(photo_file::Column::Size.eq(size.name()))
            .all(&self.db)
            .await?;
        Ok(files.into_iter().map(|f| (f.photo_id, f.file_path)).collect())
    }
}
