use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use strum_macros::EnumString;

use super::project::Project;

/// Closed status set with a fallback for values written by other clients.
/// Stored as TEXT in the canonical capitalized spelling; parsed
/// case-insensitively at this boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, EnumString)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum TaskStatus {
    #[default]
    Pending,
    Resolved,
    Partial,
    #[strum(default)]
    Other(String),
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::Resolved => write!(f, "Resolved"),
            TaskStatus::Partial => write!(f, "Partial"),
            TaskStatus::Other(value) => write!(f, "{}", value),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(TaskStatus::Other(value))
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.to_string()
    }
}

/// A task row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub sno: i64,
    pub task: String,
    pub comments: String,
    pub status: TaskStatus,
}

/// Caller-supplied record for replace-on-save. Surrogate `id` and
/// `project_id` are assigned by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub sno: i64,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(FromRow)]
struct TaskRow {
    id: i64,
    project_id: i64,
    sno: i64,
    task: String,
    comments: String,
    status: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            project_id: row.project_id,
            sno: row.sno,
            task: row.task,
            comments: row.comments,
            status: TaskStatus::from(row.status),
        }
    }
}

impl Task {
    /// Tasks for the named project ordered by `sno`. A project with no
    /// tasks, or an unknown name, yields an empty vec rather than an error.
    pub async fn load_for_project(
        pool: &SqlitePool,
        project_name: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let Some(project) = Project::find_by_name(pool, project_name).await? else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query_as::<_, TaskRow>(
            r#"SELECT id, project_id, sno, task, comments, status
               FROM tasks
               WHERE project_id = ?1
               ORDER BY sno"#,
        )
        .bind(project.id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    /// Whole-collection replace: delete all rows for the project, then
    /// insert `records`, in one transaction. Last writer wins; there is no
    /// row-level diffing. Unknown project name is a silent no-op.
    pub async fn replace_for_project(
        pool: &SqlitePool,
        project_name: &str,
        records: &[TaskRecord],
    ) -> Result<(), sqlx::Error> {
        let Some(project) = Project::find_by_name(pool, project_name).await? else {
            tracing::debug!("save for unknown project '{}' ignored", project_name);
            return Ok(());
        };

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM tasks WHERE project_id = ?1")
            .bind(project.id)
            .execute(&mut *tx)
            .await?;

        for record in records {
            sqlx::query(
                r#"INSERT INTO tasks (project_id, sno, task, comments, status)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
            )
            .bind(project.id)
            .bind(record.sno)
            .bind(&record.task)
            .bind(&record.comments)
            .bind(record.status.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DBService, models::project::CreateProject};

    async fn test_db_with_project(name: &str) -> DBService {
        let db = DBService::new_in_memory().await.unwrap();
        Project::create(
            &db.pool,
            &CreateProject {
                name: name.to_string(),
            },
        )
        .await
        .unwrap();
        db
    }

    fn record(sno: i64, task: &str, comments: &str, status: TaskStatus) -> TaskRecord {
        TaskRecord {
            sno,
            task: task.to_string(),
            comments: comments.to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_in_sno_order() {
        let db = test_db_with_project("Audit").await;
        let records = vec![
            record(2, "Patch CVE", "urgent", TaskStatus::Partial),
            record(1, "Review logs", "", TaskStatus::Pending),
        ];
        Task::replace_for_project(&db.pool, "Audit", &records)
            .await
            .unwrap();

        let loaded = Task::load_for_project(&db.pool, "Audit").await.unwrap();
        assert_eq!(loaded.len(), 2);

        // Ordered by sno regardless of insertion order.
        assert_eq!(loaded[0].sno, 1);
        assert_eq!(loaded[0].task, "Review logs");
        assert_eq!(loaded[0].status, TaskStatus::Pending);
        assert_eq!(loaded[1].sno, 2);
        assert_eq!(loaded[1].comments, "urgent");
        assert_eq!(loaded[1].status, TaskStatus::Partial);
    }

    #[tokio::test]
    async fn test_load_empty_or_unknown_project_is_empty() {
        let db = test_db_with_project("Empty").await;
        assert!(
            Task::load_for_project(&db.pool, "Empty")
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            Task::load_for_project(&db.pool, "no-such-project")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_save_for_unknown_project_is_silent_noop() {
        let db = test_db_with_project("Real").await;
        let records = vec![record(1, "orphan", "", TaskStatus::Pending)];
        Task::replace_for_project(&db.pool, "ghost", &records)
            .await
            .unwrap();

        assert!(
            Task::load_for_project(&db.pool, "Real")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_saving_empty_set_clears_tasks() {
        let db = test_db_with_project("Cleanup").await;
        let records = vec![record(1, "temp", "", TaskStatus::Pending)];
        Task::replace_for_project(&db.pool, "Cleanup", &records)
            .await
            .unwrap();
        assert_eq!(
            Task::load_for_project(&db.pool, "Cleanup").await.unwrap().len(),
            1
        );

        Task::replace_for_project(&db.pool, "Cleanup", &[])
            .await
            .unwrap();
        assert!(
            Task::load_for_project(&db.pool, "Cleanup")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_save_replaces_rather_than_appends() {
        let db = test_db_with_project("Replace").await;
        let first = vec![
            record(1, "one", "", TaskStatus::Pending),
            record(2, "two", "", TaskStatus::Pending),
        ];
        Task::replace_for_project(&db.pool, "Replace", &first)
            .await
            .unwrap();

        let second = vec![record(1, "only", "kept", TaskStatus::Resolved)];
        Task::replace_for_project(&db.pool, "Replace", &second)
            .await
            .unwrap();

        let loaded = Task::load_for_project(&db.pool, "Replace").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].task, "only");
        assert_eq!(loaded[0].status, TaskStatus::Resolved);
    }

    #[tokio::test]
    async fn test_project_delete_cascades_to_tasks() {
        let db = test_db_with_project("Doomed").await;
        let records = vec![
            record(1, "a", "", TaskStatus::Pending),
            record(2, "b", "", TaskStatus::Resolved),
        ];
        Task::replace_for_project(&db.pool, "Doomed", &records)
            .await
            .unwrap();

        let rows = Project::delete_by_name(&db.pool, "Doomed").await.unwrap();
        assert_eq!(rows, 1);

        // Cascade removed the rows themselves, not just the name lookup.
        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_unrecognized_status_survives_round_trip() {
        let db = test_db_with_project("Legacy").await;
        let records = vec![record(
            1,
            "imported",
            "",
            TaskStatus::Other("Blocked".to_string()),
        )];
        Task::replace_for_project(&db.pool, "Legacy", &records)
            .await
            .unwrap();

        let loaded = Task::load_for_project(&db.pool, "Legacy").await.unwrap();
        assert_eq!(loaded[0].status, TaskStatus::Other("Blocked".to_string()));
    }

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!(TaskStatus::from("pending".to_string()), TaskStatus::Pending);
        assert_eq!(
            TaskStatus::from("RESOLVED".to_string()),
            TaskStatus::Resolved
        );
        assert_eq!(TaskStatus::from("Partial".to_string()), TaskStatus::Partial);
        assert_eq!(
            TaskStatus::from("on hold".to_string()),
            TaskStatus::Other("on hold".to_string())
        );
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Pending).unwrap(),
            r#""Pending""#
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Other("Blocked".to_string())).unwrap(),
            r#""Blocked""#
        );
        let parsed: TaskStatus = serde_json::from_str(r#""Partial""#).unwrap();
        assert_eq!(parsed, TaskStatus::Partial);
    }

    #[test]
    fn test_record_defaults_fill_missing_fields() {
        let parsed: TaskRecord = serde_json::from_str(r#"{"sno": 3}"#).unwrap();
        assert_eq!(parsed.sno, 3);
        assert_eq!(parsed.task, "");
        assert_eq!(parsed.comments, "");
        assert_eq!(parsed.status, TaskStatus::Pending);
    }
}
