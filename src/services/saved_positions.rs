//! Reading position use-cases

use std::sync::Arc;

use async_trait::async_trait;

use super::UseCase;
use crate::{
    error::AppResult,
    models::{
        saved_position::{SavePositionRequest, SavedPositionKey},
        SavedPosition,
    },
    repository::{Repository, SavedPositionRepository},
};

/// Creates or replaces the position of a user in a book
pub struct SavePositionUseCase {
    saved_positions: Arc<dyn SavedPositionRepository>,
}

impl SavePositionUseCase {
    pub fn new(saved_positions: Arc<dyn SavedPositionRepository>) -> Self {
        Self { saved_positions }
    }
}

#[async_trait]
impl UseCase<SavePositionRequest, SavedPosition> for SavePositionUseCase {
    async fn execute(&self, request: SavePositionRequest) -> AppResult<SavedPosition> {
        let position = SavedPosition::create(
            request.book_id,
            request.user_id,
            request.position,
            request.device_name,
            None,
            None,
        )?;

        let saved = self.saved_positions.upsert(&position).await?;
        tracing::debug!(
            book_id = %saved.book_id,
            user_id = %saved.user_id,
            device = %saved.device_name,
            "Reading position saved"
        );
        Ok(saved)
    }
}

pub struct GetSavedPositionUseCase {
    saved_positions: Arc<dyn SavedPositionRepository>,
}

impl GetSavedPositionUseCase {
    pub fn new(saved_positions: Arc<dyn SavedPositionRepository>) -> Self {
        Self { saved_positions }
    }
}

#[async_trait]
impl UseCase<SavedPositionKey, SavedPosition> for GetSavedPositionUseCase {
    async fn execute(&self, key: SavedPositionKey) -> AppResult<SavedPosition> {
        self.saved_positions
            .find_by_book_and_user(&key.book_id, &key.user_id)
            .await
    }
}

/// All positions of one user
pub struct GetSavedPositionsUseCase {
    saved_positions: Arc<dyn SavedPositionRepository>,
}

impl GetSavedPositionsUseCase {
    pub fn new(saved_positions: Arc<dyn SavedPositionRepository>) -> Self {
        Self { saved_positions }
    }
}

#[async_trait]
impl UseCase<String, Vec<SavedPosition>> for GetSavedPositionsUseCase {
    async fn execute(&self, user_id: String) -> AppResult<Vec<SavedPosition>> {
        self.saved_positions.find_all_by_user(&user_id).await
    }
}

pub struct DeleteSavedPositionUseCase {
    saved_positions: Arc<dyn SavedPositionRepository>,
}

impl DeleteSavedPositionUseCase {
    pub fn new(saved_positions: Arc<dyn SavedPositionRepository>) -> Self {
        Self { saved_positions }
    }
}

#[async_trait]
impl UseCase<SavedPositionKey, ()> for DeleteSavedPositionUseCase {
    async fn execute(&self, key: SavedPositionKey) -> AppResult<()> {
        self.saved_positions.delete(&key.book_id, &key.user_id).await
    }
}

#[derive(Clone)]
pub struct SavedPositionUseCases {
    pub save: Arc<SavePositionUseCase>,
    pub get: Arc<GetSavedPositionUseCase>,
    pub list: Arc<GetSavedPositionsUseCase>,
    pub delete: Arc<DeleteSavedPositionUseCase>,
}

impl SavedPositionUseCases {
    pub fn new(repository: &Repository) -> Self {
        let saved_positions = &repository.saved_positions;
        Self {
            save: Arc::new(SavePositionUseCase::new(saved_positions.clone())),
            get: Arc::new(GetSavedPositionUseCase::new(saved_positions.clone())),
            list: Arc::new(GetSavedPositionsUseCase::new(saved_positions.clone())),
            delete: Arc::new(DeleteSavedPositionUseCase::new(saved_positions.clone())),
        }
    }
}
