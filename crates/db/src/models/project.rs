use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("project '{0}' already exists")]
    DuplicateName(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
}

/// Project listing entry with the per-status counts shown in the UI
/// summary cards.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProjectWithTaskCounts {
    pub id: i64,
    pub name: String,
    pub task_count: i64,
    pub pending_count: i64,
    pub resolved_count: i64,
    pub partial_count: i64,
}

impl Project {
    /// All projects in creation order (surrogate keys are monotonic).
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>("SELECT id, name FROM projects ORDER BY id")
            .fetch_all(pool)
            .await
    }

    pub async fn find_all_with_task_counts(
        pool: &SqlitePool,
    ) -> Result<Vec<ProjectWithTaskCounts>, sqlx::Error> {
        sqlx::query_as::<_, ProjectWithTaskCounts>(
            r#"SELECT
                 p.id,
                 p.name,
                 COUNT(t.id)                              AS task_count,
                 COALESCE(SUM(t.status = 'Pending'), 0)   AS pending_count,
                 COALESCE(SUM(t.status = 'Resolved'), 0)  AS resolved_count,
                 COALESCE(SUM(t.status = 'Partial'), 0)   AS partial_count
               FROM projects p
               LEFT JOIN tasks t ON t.project_id = p.id
               GROUP BY p.id, p.name
               ORDER BY p.id"#,
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_name(
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>("SELECT id, name FROM projects WHERE name = ?1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Inserts a new project. The unique index on `name` is the source of
    /// truth for duplicates; callers may pre-check for a friendlier message
    /// but must tolerate a race losing here.
    pub async fn create(pool: &SqlitePool, data: &CreateProject) -> Result<Self, ProjectError> {
        sqlx::query_as::<_, Project>("INSERT INTO projects (name) VALUES (?1) RETURNING id, name")
            .bind(&data.name)
            .fetch_one(pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    ProjectError::DuplicateName(data.name.clone())
                }
                _ => ProjectError::Database(e),
            })
    }

    /// Deletes the project row; the foreign key cascades to its tasks.
    /// Returns the number of rows removed (0 when the name is unknown).
    pub async fn delete_by_name(pool: &SqlitePool, name: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE name = ?1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
