use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::repositories::{RosterJobRepository, RosterResultRepository};
use shared::RedisPool;

#[derive(Clone)]
pub struct AppState {
    pub job_repo: Arc<dyn RosterJobRepository>,
    pub result_repo: Arc<dyn RosterResultRepository>,
    pub roster_sender: mpsc::Sender<Uuid>,
    pub redis_pool: RedisPool,
}

impl AppState {
    pub fn new(
        job_repo: Arc<dyn RosterJobRepository>,
        result_repo: Arc<dyn RosterResultRepository>,
        roster_sender: mpsc::Sender<Uuid>,
        redis_pool: RedisPool,
    ) -> Self {
        Self {
            job_repo,
            result_repo,
            roster_sender,
            redis_pool,
        }
    }
}
