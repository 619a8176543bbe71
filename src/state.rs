use crate::errors::AppError;
use crate::quest::QuestService;
use crate::storage::Persistence;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub quest: Arc<Mutex<QuestService>>,
}

impl AppState {
    pub fn new(store: Box<dyn Persistence>) -> Self {
        Self {
            quest: Arc::new(Mutex::new(QuestService::open(store))),
        }
    }

    /// Runs an intent against the service on the blocking pool. Intents write
    /// the document through the store, so they stay off the async workers.
    pub async fn run<F, T>(&self, intent: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut QuestService) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut quest = Arc::clone(&self.quest).lock_owned().await;
        tokio::task::spawn_blocking(move || intent(&mut quest))
            .await
            .map_err(AppError::internal)
    }
}
