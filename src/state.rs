use std::sync::Arc;

use crate::config::Config;
use crate::services::media::MediaStore;
use crate::services::submission::SubmissionPipeline;
use crate::services::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub pipeline: SubmissionPipeline,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Repository, config: Config) -> Self {
        let pipeline = SubmissionPipeline::new(
            repo.clone(),
            MediaStore::new(config.media_dir.clone()),
            MediaStore::new(config.release_dir.clone()),
            config.release_mime_types.clone(),
            config.entry_limit,
        );
        Self {
            repo,
            pipeline,
            config: Arc::new(config),
        }
    }

    pub fn with_pipeline(mut self, pipeline: SubmissionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }
}
