use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter, QuerySelect, Set,
};
use tracing::debug;

use super::repository::{Repository, StoreError};
use crate::entities::user::{self, Role};
use crate::utils::demographics;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub ethnicity: String,
    pub other_ethnicity: Option<String>,
    pub role: Role,
}

impl NewUser {
    fn profile(&self) -> UpdateUser {
        UpdateUser {
            name: self.name.clone(),
            email: self.email.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
            phone: self.phone.clone(),
            age: self.age,
            gender: self.gender.clone(),
            ethnicity: self.ethnicity.clone(),
            other_ethnicity: self.other_ethnicity.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.profile().validate()?;
        check_new_password(&self.password, &self.password_confirm)
    }
}

/// Editable profile fields; role and password have their own operations.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub age: i32,
    pub gender: String,
    pub ethnicity: String,
    pub other_ethnicity: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("Name", &self.name),
            ("Email", &self.email),
            ("Street", &self.street),
            ("City", &self.city),
            ("Zip", &self.zip),
            ("Phone", &self.phone),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} is required", label));
            }
        }
        if !self.email.contains('@') {
            return Err("Email is invalid".to_string());
        }
        if self.age <= 0 {
            return Err("Age is required".to_string());
        }
        if demographics::state_name(&self.state).is_none() {
            return Err(format!("Invalid state code: {}", self.state));
        }
        if demographics::gender_label(&self.gender).is_none() {
            return Err(format!("Invalid gender code: {}", self.gender));
        }
        if demographics::ethnicity_label(&self.ethnicity).is_none() {
            return Err(format!("Invalid ethnicity code: {}", self.ethnicity));
        }
        Ok(())
    }
}

fn check_new_password(password: &str, confirm: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password is required".to_string());
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unparsable");
            false
        }
    }
}

impl<C: ConnectionTrait> Repository<C> {
    pub async fn create_user(&self, nu: NewUser) -> Result<user::Model, StoreError> {
        nu.validate().map_err(StoreError::Validation)?;

        let email = nu.email.trim().to_lowercase();
        if self.user_by_email(&email).await?.is_some() {
            return Err(StoreError::Conflict("Email is already registered".to_string()));
        }

        let model = user::ActiveModel {
            name: Set(nu.name.trim().to_string()),
            email: Set(email),
            password: Set(hash_password(&nu.password)?),
            role: Set(nu.role),
            street: Set(nu.street),
            city: Set(nu.city),
            state: Set(nu.state),
            zip: Set(nu.zip),
            phone: Set(nu.phone),
            age: Set(nu.age),
            gender: Set(nu.gender),
            ethnicity: Set(nu.ethnicity),
            other_ethnicity: Set(nu.other_ethnicity.filter(|s| !s.trim().is_empty())),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        debug!(user_id = saved.id, "user.create");
        Ok(saved)
    }

    pub async fn user_by_id(&self, user_id: i32) -> Result<user::Model, StoreError> {
        user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await?)
    }

    /// Returns the user only when the password matches.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<user::Model>, StoreError> {
        let found = self.user_by_email(email).await?;
        Ok(found.filter(|u| verify_password(password, &u.password)))
    }

    /// Loads the user row with an exclusive row lock held until the
    /// surrounding transaction ends. SQLite has no row locks; its writers
    /// are serialised by the database itself.
    pub async fn lock_user(&self, user_id: i32) -> Result<user::Model, StoreError> {
        let mut select = user::Entity::find_by_id(user_id);
        if self.db.get_database_backend() != DbBackend::Sqlite {
            select = select.lock_exclusive();
        }
        select
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Replaces the profile fields. The email stays unique across accounts.
    pub async fn update_user(&self, user_id: i32, uu: UpdateUser) -> Result<user::Model, StoreError> {
        uu.validate().map_err(StoreError::Validation)?;

        let existing = self.user_by_id(user_id).await?;
        let email = uu.email.trim().to_lowercase();
        if let Some(other) = self.user_by_email(&email).await? {
            if other.id != user_id {
                return Err(StoreError::Conflict("Email is already registered".to_string()));
            }
        }

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(uu.name.trim().to_string());
        active.email = Set(email);
        active.street = Set(uu.street);
        active.city = Set(uu.city);
        active.state = Set(uu.state);
        active.zip = Set(uu.zip);
        active.phone = Set(uu.phone);
        active.age = Set(uu.age);
        active.gender = Set(uu.gender);
        active.ethnicity = Set(uu.ethnicity);
        active.other_ethnicity = Set(uu.other_ethnicity.filter(|s| !s.trim().is_empty()));
        let updated = active.update(&self.db).await?;
        debug!(user_id = updated.id, "user.update");
        Ok(updated)
    }

    /// Sets a new password after checking the current one.
    pub async fn update_password(
        &self,
        user_id: i32,
        current: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<user::Model, StoreError> {
        check_new_password(password, password_confirm).map_err(StoreError::Validation)?;

        let existing = self.user_by_id(user_id).await?;
        if !verify_password(current, &existing.password) {
            return Err(StoreError::WrongPassword);
        }

        let mut active: user::ActiveModel = existing.into();
        active.password = Set(hash_password(password)?);
        let updated = active.update(&self.db).await?;
        debug!(user_id = updated.id, "user.update_password");
        Ok(updated)
    }

    pub async fn set_role(&self, user_id: i32, role: Role) -> Result<user::Model, StoreError> {
        let existing = self.user_by_id(user_id).await?;
        let mut active: user::ActiveModel = existing.into();
        active.role = Set(role);
        let updated = active.update(&self.db).await?;
        debug!(user_id = updated.id, role = ?updated.role, "user.set_role");
        Ok(updated)
    }
}
