use std::sync::Arc;

use crate::db::{AccessRepository, RepositoryError};
use crate::models::access::AccessScope;

use super::converter;

/// Primary roles that may receive a scope document at all. Pure super users
/// (role 6) are not on the list; super user status is only reported as a flag
/// on one of these roles.
pub const ALLOWED_USER_TYPE_IDS: [i64; 5] = [1, 3, 4, 5, 7];

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("user not found")]
    NotFound,
    #[error("user not allowed")]
    NotAllowed { user_type_id: i64 },
    #[error("unable to fetch access data")]
    Upstream(#[from] RepositoryError),
}

pub struct AccessService {
    repository: Arc<dyn AccessRepository>,
}

impl AccessService {
    pub fn new(repository: Arc<dyn AccessRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &dyn AccessRepository {
        self.repository.as_ref()
    }

    /// Looks up the rows for `user_id` and folds them into a scope.
    ///
    /// The allow-list is checked against the first row's primary role before
    /// any folding happens.
    #[tracing::instrument(name = "Resolve access scope", skip(self))]
    pub async fn access(&self, user_id: i64) -> Result<AccessScope, AccessError> {
        let rows = self.repository.fetch_access_rows(user_id).await?;

        let user_type_id = rows
            .first()
            .and_then(|row| row.user_type_id)
            .ok_or(AccessError::NotFound)?;

        if !ALLOWED_USER_TYPE_IDS.contains(&user_type_id) {
            return Err(AccessError::NotAllowed { user_type_id });
        }

        Ok(converter::convert(&rows))
    }
}
