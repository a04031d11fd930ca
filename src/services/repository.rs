use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("received invalid size: {0}")]
    InvalidSize(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("current password is incorrect")]
    WrongPassword,
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Data access for users, photos, contests and entries.
///
/// Built once at startup around the shared connection pool. `begin` hands
/// out a transactional copy exposing the same operations; its writes become
/// visible only on `commit`.
#[derive(Clone, Debug)]
pub struct Repository<C = DatabaseConnection> {
    pub(crate) db: C,
}

impl<C: ConnectionTrait> Repository<C> {
    pub fn new(db: C) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &C {
        &self.db
    }
}

impl Repository<DatabaseConnection> {
    pub async fn begin(&self) -> Result<Repository<DatabaseTransaction>, DbErr> {
        Ok(Repository {
            db: self.db.begin().await?,
        })
    }
}

impl Repository<DatabaseTransaction> {
    pub async fn commit(self) -> Result<(), DbErr> {
        self.db.commit().await
    }

    pub async fn rollback(self) -> Result<(), DbErr> {
        self.db.rollback().await
    }
}
