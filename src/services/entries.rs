use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::{Alias, Condition, Expr, Func, Order, Query, SimpleExpr};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::repository::{Repository, StoreError};
use crate::entities::contest_entry::{self, EntryStatus};
use crate::entities::{contest, contest_photo_vote, photo, photo_file, user};
use crate::models::photo_size::PhotoSize;
use crate::models::submission::EntryDetails;
use crate::utils::slugify;

/// Votes are scored on this closed range.
pub const VOTE_SCORE_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

#[derive(Debug, Clone)]
pub struct NewContest {
    pub title: String,
    pub description: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub updated_by: String,
}

#[derive(Debug, Clone)]
pub struct NewContestEntry {
    pub contest_id: i32,
    pub photo_id: Uuid,
    pub details: EntryDetails,
    pub release_mime_type: String,
    pub status: EntryStatus,
    pub updated_by: String,
}

#[derive(Debug, Clone)]
pub struct UpdateContestEntry {
    pub entry_id: i32,
    pub status: EntryStatus,
    pub updated_by: String,
}

/// One row of the administrator review listing.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ScoredEntry {
    pub entry_id: i32,
    pub contest_id: i32,
    #[schema(value_type = String)]
    pub photo_id: Uuid,
    pub status: EntryStatus,
    pub subject_name: String,
    pub subject_age: i32,
    pub subject_country: String,
    pub subject_origin: String,
    pub location: String,
    pub subject_biography: String,
    pub release_mime_type: String,
    pub owner_id: i32,
    pub owner_name: String,
    pub owner_email: String,
    /// Path of the "small" rendition, if one exists.
    pub file_path: Option<String>,
    pub score: i64,
}

/// One tile of the public gallery.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct GalleryItem {
    pub entry_id: i32,
    #[schema(value_type = String)]
    pub photo_id: Uuid,
    pub status: EntryStatus,
    pub details: EntryDetails,
    pub release_mime_type: String,
    /// Path of the "thumb" rendition, if one exists.
    pub file_path: Option<String>,
}

/// A participant's own photo with its entry, if it has one.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct OwnedPhoto {
    #[schema(value_type = String)]
    pub photo_id: Uuid,
    pub title: String,
    pub entry_id: Option<i32>,
    pub contest_id: Option<i32>,
    pub status: Option<EntryStatus>,
    pub file_path: Option<String>,
}

impl<C: ConnectionTrait> Repository<C> {
    pub async fn create_contest(&self, nc: NewContest) -> Result<contest::Model, StoreError> {
        if nc.title.trim().is_empty() || nc.description.trim().is_empty() {
            return Err(StoreError::Validation("Title and description are required".to_string()));
        }
        if nc.end_date <= nc.start_date {
            return Err(StoreError::Validation("End date must be after start date".to_string()));
        }
        let slug = slugify(&nc.title);
        if slug.is_empty() {
            return Err(StoreError::Validation("Title must contain letters or digits".to_string()));
        }
        if self.contest_by_slug(&slug).await?.is_some() {
            return Err(StoreError::Conflict(format!("A contest with slug '{}' already exists", slug)));
        }

        let now = Utc::now().naive_utc();
        let model = contest::ActiveModel {
            slug: Set(slug),
            title: Set(nc.title.trim().to_string()),
            description: Set(nc.description),
            start_date: Set(nc.start_date),
            end_date: Set(nc.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            updated_by: Set(nc.updated_by),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await?;
        debug!(contest_id = saved.id, slug = %saved.slug, "contest.create");
        Ok(saved)
    }

    pub async fn contest_by_id(&self, contest_id: i32) -> Result<contest::Model, StoreError> {
        contest::Entity::find_by_id(contest_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn contest_by_slug(&self, slug: &str) -> Result<Option<contest::Model>, StoreError> {
        Ok(contest::Entity::find()
            .filter(contest::Column::Slug.eq(slug))
            .one(&self.db)
            .await?)
    }

    pub async fn create_contest_entry(&self, ne: NewContestEntry) -> Result<contest_entry::Model, StoreError> {
        let now = Utc::now().naive_utc();
        let d = ne.details;
        let model = contest_entry::ActiveModel {
            contest_id: Set(ne.contest_id),
            photo_id: Set(ne.photo_id),
            subject_name: Set(d.subject_name),
            subject_age: Set(d.subject_age),
            subject_country: Set(d.subject_country),
            subject_origin: Set(d.subject_origin),
            location: Set(d.location),
            subject_biography: Set(d.subject_biography),
            release_mime_type: Set(ne.release_mime_type),
            status: Set(ne.status),
            created_at: Set(now),
            updated_at: Set(now),
            updated_by: Set(ne.updated_by),
            ..Default::default()
        };
        let saved = model.insert(&self.db).await?;
        debug!(entry_id = saved.id, photo_id = %saved.photo_id, "contest.create_entry");
        Ok(saved)
    }

    /// Replaces every subject field of the entry; status is left alone.
    pub async fn fully_update_entry(
        &self,
        entry_id: i32,
        details: EntryDetails,
        updated_by: &str,
    ) -> Result<contest_entry::Model, StoreError> {
        let existing = self.entry_by_id(entry_id).await?;
        let mut active: contest_entry::ActiveModel = existing.into();
        active.subject_name = Set(details.subject_name);
        active.subject_age = Set(details.subject_age);
        active.subject_country = Set(details.subject_country);
        active.subject_origin = Set(details.subject_origin);
        active.location = Set(details.location);
        active.subject_biography = Set(details.subject_biography);
        active.updated_by = Set(updated_by.to_string());
        active.updated_at = Set(Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        debug!(entry_id = updated.id, "contest.fully_update_entry");
        Ok(updated)
    }

    /// Status-only update.
    pub async fn update_entry(&self, uce: UpdateContestEntry) -> Result<contest_entry::Model, StoreError> {
        let existing = self.entry_by_id(uce.entry_id).await?;
        let mut active: contest_entry::ActiveModel = existing.into();
        active.status = Set(uce.status);
        active.updated_by = Set(uce.updated_by);
        active.updated_at = Set(Utc::now().naive_utc());

        let updated = active.update(&self.db).await?;
        debug!(entry_id = updated.id, status = ?updated.status, "contest.update_entry");
        Ok(updated)
    }

    pub async fn entry_by_id(&self, entry_id: i32) -> Result<contest_entry::Model, StoreError> {
        contest_entry::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn entry_by_photo_id(&self, photo_id: Uuid) -> Result<contest_entry::Model, StoreError> {
        contest_entry::Entity::find()
            .filter(contest_entry::Column::PhotoId.eq(photo_id))
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Entries of the contest whose photo is not deleted, any status.
    pub async fn contest_entries(&self, contest_id: i32) -> Result<Vec<contest_entry::Model>, StoreError> {
        Ok(contest_entry::Entity::find()
            .join(JoinType::InnerJoin, contest_entry::Relation::Photo.def())
            .filter(contest_entry::Column::ContestId.eq(contest_id))
            .filter(photo::Column::Deleted.eq(false))
            .order_by_asc(contest_entry::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Entries of the owner that still count against the submission limit.
    pub async fn count_active_entries(&self, owner_id: i32) -> Result<u64, StoreError> {
        Ok(contest_entry::Entity::find()
            .join(JoinType::InnerJoin, contest_entry::Relation::Photo.def())
            .filter(photo::Column::OwnerId.eq(owner_id))
            .filter(photo::Column::Deleted.eq(false))
            .filter(contest_entry::Column::Status.ne(EntryStatus::Withdrawn.to_value()))
            .count(&self.db)
            .await?)
    }

    /// Review listing: every entry of the contest whose photo is not
    /// deleted, with its owner, the "small" file and the summed vote score.
    /// Files and votes are left-joined so entries without either still
    /// appear (score 0).
    pub async fn list_contest_photos_with_scores(&self, contest_id: i32) -> Result<Vec<ScoredEntry>, StoreError> {
        use contest_entry::Column as E;

        let entry_cols = [
            E::Id,
            E::ContestId,
            E::PhotoId,
            E::Status,
            E::SubjectName,
            E::SubjectAge,
            E::SubjectCountry,
            E::SubjectOrigin,
            E::Location,
            E::SubjectBiography,
            E::ReleaseMimeType,
        ];

        let summed: SimpleExpr =
            Func::sum(Expr::col((contest_photo_vote::Entity, contest_photo_vote::Column::Score))).into();
        let score: SimpleExpr = Func::coalesce([summed, Expr::val(0).into()]).into();

        let mut query = Query::select();
        query
            .expr_as(Expr::col((contest_entry::Entity, E::Id)), Alias::new("entry_id"))
            .columns(entry_cols[1..].iter().map(|c| (contest_entry::Entity, *c)))
            .expr_as(Expr::col((user::Entity, user::Column::Id)), Alias::new("owner_id"))
            .expr_as(Expr::col((user::Entity, user::Column::Name)), Alias::new("owner_name"))
            .expr_as(Expr::col((user::Entity, user::Column::Email)), Alias::new("owner_email"))
            .expr_as(
                Expr::col((photo_file::Entity, photo_file::Column::FilePath)),
                Alias::new("file_path"),
            )
            .expr_as(score, Alias::new("score"))
            .from(contest_entry::Entity)
            .inner_join(
                photo::Entity,
                Expr::col((photo::Entity, photo::Column::Id)).equals((contest_entry::Entity, E::PhotoId)),
            )
            .inner_join(
                user::Entity,
                Expr::col((user::Entity, user::Column::Id)).equals((photo::Entity, photo::Column::OwnerId)),
            )
            .left_join(
                photo_file::Entity,
                Condition::all()
                    .add(
                        Expr::col((photo_file::Entity, photo_file::Column::PhotoId))
                            .equals((photo::Entity, photo::Column::Id)),
                    )
                    .add(Expr::col((photo_file::Entity, photo_file::Column::Size)).eq(PhotoSize::Small.name())),
            )
            .left_join(
                contest_photo_vote::Entity,
                Expr::col((contest_photo_vote::Entity, contest_photo_vote::Column::EntryId))
                    .equals((contest_entry::Entity, E::Id)),
            )
            .and_where(Expr::col((contest_entry::Entity, E::ContestId)).eq(contest_id))
            .and_where(Expr::col((photo::Entity, photo::Column::Deleted)).eq(false))
            .group_by_columns(entry_cols.iter().map(|c| (contest_entry::Entity, *c)))
            .group_by_columns([
                (user::Entity, user::Column::Id),
                (user::Entity, user::Column::Name),
                (user::Entity, user::Column::Email),
            ])
            .group_by_col((photo_file::Entity, photo_file::Column::FilePath))
            .order_by((contest_entry::Entity, E::Id), Order::Asc);

        let backend = self.db.get_database_backend();
        let rows = ScoredEntry::find_by_statement(backend.build(&query))
            .all(&self.db)
            .await?;
        debug!(contest_id, rows = rows.len(), "contest.list_with_scores");
        Ok(rows)
    }

    /// Gallery view: withdrawn entries and deleted photos are never shown;
    /// `status` narrows the listing further.
    pub async fn gallery(
        &self,
        contest_id: i32,
        status: Option<EntryStatus>,
    ) -> Result<Vec<GalleryItem>, StoreError> {
        let visible: Vec<contest_entry::Model> = self
            .contest_entries(contest_id)
            .await?
            .into_iter()
            .filter(|e| e.status != EntryStatus::Withdrawn)
            .filter(|e| status.map_or(true, |s| e.status == s))
            .collect();

        let thumbs = self
            .photo_file_paths(visible.iter().map(|e| e.photo_id).collect(), PhotoSize::Thumb)
            .await?;

        Ok(visible
            .into_iter()
            .map(|e| GalleryItem {
                entry_id: e.id,
                photo_id: e.photo_id,
                status: e.status,
                file_path: thumbs.get(&e.photo_id).cloned(),
                release_mime_type: e.release_mime_type,
                details: EntryDetails {
                    subject_name: e.subject_name,
                    subject_age: e.subject_age,
                    subject_country: e.subject_country,
                    subject_origin: e.subject_origin,
                    location: e.location,
                    subject_biography: e.subject_biography,
                },
            })
            .collect())
    }

    /// Records a judge's score; a repeat vote by the same judge replaces
    /// the earlier score.
    pub async fn cast_vote(
        &self,
        entry_id: i32,
        voter_id: i32,
        score: i32,
    ) -> Result<contest_photo_vote::Model, StoreError> {
        if !VOTE_SCORE_RANGE.contains(&score) {
            return Err(StoreError::Validation(format!(
                "Score must be between {} and {}",
                VOTE_SCORE_RANGE.start(),
                VOTE_SCORE_RANGE.end()
            )));
        }
        self.entry_by_id(entry_id).await?;

        let now = Utc::now().naive_utc();
        let existing = contest_photo_vote::Entity::find()
            .filter(contest_photo_vote::Column::EntryId.eq(entry_id))
            .filter(contest_photo_vote::Column::VoterId.eq(voter_id))
            .one(&self.db)
            .await?;

        let saved = match existing {
            Some(vote) => {
                let mut active: contest_photo_vote::ActiveModel = vote.into();
                active.score = Set(score);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                contest_photo_vote::ActiveModel {
                    entry_id: Set(entry_id),
                    voter_id: Set(voter_id),
                    score: Set(score),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };
        debug!(entry_id, voter_id, score, "contest.cast_vote");
        Ok(saved)
    }

    /// The owner's non-deleted photos, newest first, with thumb path and
    /// entry status.
    pub async fn photos_with_entries(&self, owner_id: i32) -> Result<Vec<OwnedPhoto>, StoreError> {
        let rows: Vec<(photo::Model, Option<contest_entry::Model>)> = photo::Entity::find()
            .filter(photo::Column::OwnerId.eq(owner_id))
            .filter(photo::Column::Deleted.eq(false))
            .find_also_related(contest_entry::Entity)
            .order_by_desc(photo::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let thumbs = self
            .photo_file_paths(rows.iter().map(|(p, _)| p.id).collect(), PhotoSize::Thumb)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(p, e)| OwnedPhoto {
                file_path: thumbs.get(&p.id).cloned(),
                photo_id: p.id,
                title: p.title,
                entry_id: e.as_ref().map(|e| e.id),
                contest_id: e.as_ref().map(|e| e.contest_id),
                status: e.map(|e| e.status),
            })
            .collect())
    }
}
