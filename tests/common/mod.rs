#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use chrono::{Duration, Utc};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use tempfile::TempDir;

use photo_contest::config::Config;
use photo_contest::entities::{contest, user};
use photo_contest::models::submission::{EntryDetails, Submission, UploadedFile};
use photo_contest::services::entries::NewContest;
use photo_contest::services::users::NewUser;
use photo_contest::services::Repository;
use photo_contest::AppState;

pub const SECRET: &str = "test-secret";

pub struct TestEnv {
    pub repo: Repository,
    pub state: AppState,
    /// Holds both the served media tree and the release store.
    pub media: TempDir,
}

pub async fn setup() -> TestEnv {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("migrate");

    let media = tempfile::tempdir().expect("tempdir");
    let mut config = Config::with_secret(SECRET);
    config.media_dir = media.path().join("media");
    config.release_dir = media.path().join("releases");

    let repo = Repository::new(db);
    let state = AppState::new(repo.clone(), config);
    TestEnv { repo, state, media }
}

pub async fn seed_user(repo: &Repository, name: &str, email: &str, role: user::Role) -> user::Model {
    repo.create_user(NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
        password_confirm: "correct horse".to_string(),
        street: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip: "62701".to_string(),
        phone: "555-0100".to_string(),
        age: 40,
        gender: "N".to_string(),
        ethnicity: "pn".to_string(),
        other_ethnicity: None,
        role,
    })
    .await
    .expect("seed user")
}

pub async fn seed_contest(repo: &Repository, title: &str) -> contest::Model {
    let start = Utc::now().naive_utc();
    repo.create_contest(NewContest {
        title: title.to_string(),
        description: "Portraits of people at work".to_string(),
        start_date: start,
        end_date: start + Duration::days(30),
        updated_by: "seed".to_string(),
    })
    .await
    .expect("seed contest")
}

pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([30, 120, 200]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .expect("encode test image");
    buf.into_inner()
}

pub fn biography() -> String {
    "A retired ferry captain who still walks the harbour every morning. ".repeat(5)
}

pub fn details() -> EntryDetails {
    EntryDetails {
        subject_name: "Marta Silva".to_string(),
        subject_age: 71,
        subject_country: "Portugal".to_string(),
        subject_origin: "Lisbon".to_string(),
        location: "Cais do Sodre".to_string(),
        subject_biography: biography(),
    }
}

pub fn submission(signature: &str, width: u32, height: u32) -> Submission {
    Submission {
        entry_id: None,
        signature: signature.to_string(),
        details: details(),
        image: Some(UploadedFile::new("image/png", image_bytes(width, height, ImageFormat::Png))),
        release: Some(UploadedFile::new("application/pdf", b"%PDF-1.4 signed release".to_vec())),
    }
}

/// Number of regular files anywhere under `dir`.
pub fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|e| {
            let path = e.path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}
