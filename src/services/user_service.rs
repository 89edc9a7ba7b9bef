use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{request::CreateUserRequest, response::UserDto},
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserDto> {
        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "User with username '{}' already exists",
                request.username
            )));
        }

        let user = User::new(
            &request.username,
            &request.email,
            &request.full_name,
            request.role,
        );
        let user = self.repository.create(user).await?;

        log::info!("User {} created", user.username);
        Ok(user.into())
    }

    pub async fn get_user(&self, username: &str) -> AppResult<UserDto> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with username '{}' not found", username))
            })?;

        Ok(user.into())
    }
}
