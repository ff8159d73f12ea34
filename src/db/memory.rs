use std::collections::HashMap;

use async_trait::async_trait;

use super::access::{AccessRepository, RepositoryError};
use crate::models::access::AccessRow;

/// Fixed rows per user, for tests that run without a database.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAccessRepository {
    rows: HashMap<i64, Vec<AccessRow>>,
}

impl InMemoryAccessRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, user_id: i64, rows: Vec<AccessRow>) -> Self {
        self.rows.insert(user_id, rows);
        self
    }
}

#[async_trait]
impl AccessRepository for InMemoryAccessRepository {
    async fn fetch_access_rows(&self, user_id: i64) -> Result<Vec<AccessRow>, RepositoryError> {
        Ok(self.rows.get(&user_id).cloned().unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
