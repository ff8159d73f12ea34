use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::models::access::AccessRow;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database call exceeded {0:?}")]
    Timeout(Duration),
}

/// Source of the role/association rows for a user.
///
/// An unknown user is an empty row set, never an error.
#[async_trait]
pub trait AccessRepository: Send + Sync {
    async fn fetch_access_rows(&self, user_id: i64) -> Result<Vec<AccessRow>, RepositoryError>;

    /// Connectivity check backing the health endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

pub struct MySqlAccessRepository {
    pool: MySqlPool,
}

impl MySqlAccessRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessRepository for MySqlAccessRepository {
    async fn fetch_access_rows(&self, user_id: i64) -> Result<Vec<AccessRow>, RepositoryError> {
        fetch_access_rows(&self.pool, user_id).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Bounds every call on the wrapped repository by `deadline`, so a stalled
/// database fails the request instead of holding it open.
pub struct DeadlineRepository<R> {
    inner: R,
    deadline: Duration,
}

impl<R: AccessRepository> DeadlineRepository<R> {
    pub fn new(inner: R, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    async fn within_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, RepositoryError>>,
    ) -> Result<T, RepositoryError> {
        tokio::time::timeout(self.deadline, call)
            .await
            .map_err(|_| RepositoryError::Timeout(self.deadline))?
    }
}

#[async_trait]
impl<R: AccessRepository> AccessRepository for DeadlineRepository<R> {
    async fn fetch_access_rows(&self, user_id: i64) -> Result<Vec<AccessRow>, RepositoryError> {
        self.within_deadline(self.inner.fetch_access_rows(user_id))
            .await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.within_deadline(self.inner.ping()).await
    }
}

// Team invitations only count once accepted (status 4). Entity links resolve
// site first, then program, then organization.
const ACCESS_ROWS_QUERY: &str = r#"
    SELECT
        CAST(u.UserTypeID AS SIGNED) AS user_type_id,
        CAST(u.AdminTypeID AS SIGNED) AS admin_type_id,
        CAST(u.FundSourceAdminTypeID AS SIGNED) AS fund_source_admin_type_id,
        CAST(u.SuperUserTypeID AS SIGNED) AS super_user_type_id,
        CAST(fsa.FundSourceID AS SIGNED) AS fund_source_id,
        CAST(COALESCE(es.EntityID, ep.EntityID, eo.EntityID) AS SIGNED) AS admin_entity_id,
        CAST(COALESCE(efs.EntityID, efp.EntityID, efo.EntityID) AS SIGNED) AS fs_admin_entity_id,
        CAST(ct.ClassID AS SIGNED) AS class_id,
        CAST(ct.TeacherTypeID AS SIGNED) AS teacher_type_id,
        CAST(tci.ChildID AS SIGNED) AS team_child_id
    FROM CC_Users u
    LEFT JOIN CC_UserAssoc ua ON ua.UserID = u.UserID
    LEFT JOIN CC_AdminFundSources fsa ON fsa.UserID = u.UserID
    LEFT JOIN CC_FSUserAssoc fsua ON fsua.UserID = u.UserID
    LEFT JOIN CC_TC_Invitations tci ON tci.UserID = u.UserID AND tci.InvitationStatusID = 4
    LEFT JOIN G2_EntityLink es ON ua.SiteID = es.SiteID
    LEFT JOIN G2_EntityLink ep ON ua.ProgramID = ep.ProgramID
    LEFT JOIN G2_EntityLink eo ON ua.OrganizationID = eo.OrganizationID
    LEFT JOIN G2_EntityLink efs ON fsua.SiteID = efs.SiteID
    LEFT JOIN G2_EntityLink efp ON fsua.ProgramID = efp.ProgramID
    LEFT JOIN G2_EntityLink efo ON fsua.OrganizationID = efo.OrganizationID
    LEFT JOIN CC_ClassesTeachers ct ON ct.TeacherID = u.UserID
    WHERE u.UserID = ?
"#;

#[tracing::instrument(name = "Fetch access rows", skip(pool))]
pub async fn fetch_access_rows(
    pool: &MySqlPool,
    user_id: i64,
) -> Result<Vec<AccessRow>, RepositoryError> {
    let rows = sqlx::query_as::<_, AccessRow>(ACCESS_ROWS_QUERY)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    tracing::debug!(row_count = rows.len(), "access rows fetched");
    Ok(rows)
}
