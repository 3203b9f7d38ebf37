use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::api::dtos::UserResponse;
use crate::domain::{Role, User};
use crate::error::AppResult;
use crate::infrastructure::repositories::UserRepository;

#[derive(Clone)]
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Returns the caller's profile, provisioning it from the validated
    /// token claims on first contact and keeping email/name in sync after.
    pub async fn get_or_provision(
        &self,
        user_id: Uuid,
        email: Option<String>,
        name: Option<String>,
    ) -> AppResult<UserResponse> {
        let now = Utc::now();

        let user = match self.user_repo.find_by_id(user_id).await? {
            Some(mut existing) => {
                let mut changed = false;
                if let Some(email) = email.filter(|email| *email != existing.email) {
                    existing.email = email;
                    changed = true;
                }
                if let Some(name) = name.filter(|name| *name != existing.name) {
                    existing.name = name;
                    changed = true;
                }
                if changed {
                    existing.updated_at = now;
                    self.user_repo.upsert(&existing).await?
                } else {
                    existing
                }
            }
            None => {
                let user = User {
                    id: user_id,
                    email: email.unwrap_or_else(|| format!("{user_id}@users.invalid")),
                    name: name.unwrap_or_else(|| "New user".to_string()),
                    role: Role::User,
                    created_at: now,
                    updated_at: now,
                };
                info!(user_id = %user_id, "provisioned user from token claims");
                self.user_repo.upsert(&user).await?
            }
        };

        Ok(UserResponse::from(user))
    }
}
