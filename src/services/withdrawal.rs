use sea_orm::ConnectionTrait;
use tracing::info;
use uuid::Uuid;

use super::entries::UpdateContestEntry;
use super::repository::{Repository, StoreError};
use crate::entities::contest_entry::{self, EntryStatus};

impl<C: ConnectionTrait> Repository<C> {
    /// Withdraws the entry of `photo_id` on behalf of its owner. A photo
    /// owned by someone else is reported exactly like a missing one. Files
    /// and file rows are kept.
    pub async fn withdraw(&self, photo_id: Uuid, user_id: i32) -> Result<contest_entry::Model, StoreError> {
        let photo = self.photo_by_id(photo_id).await?;
        if photo.owner_id != user_id {
            return Err(StoreError::NotFound);
        }

        let entry = self.entry_by_photo_id(photo_id).await?;
        let withdrawn_by = self.user_by_id(user_id).await?.name;
        let updated = self
            .update_entry(UpdateContestEntry {
                entry_id: entry.id,
                status: EntryStatus::Withdrawn,
                updated_by: withdrawn_by,
            })
            .await?;
        info!(photo_id = %photo_id, entry_id = updated.id, user_id, "entry withdrawn");
        Ok(updated)
    }
}
