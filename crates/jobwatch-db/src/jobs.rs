//! Stored job postings.

use crate::error::{DatabaseError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use jobwatch_core::{JobCategory, JobRecord};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A job record as persisted, with its storage identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredJob {
    /// Unique identifier
    pub id: String,
    /// The persisted record
    #[serde(flatten)]
    pub record: JobRecord,
    /// When the row was inserted
    pub created_at: DateTime<Utc>,
}

/// Filter for [`search_jobs`]. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobQuery {
    /// Case-insensitive substring of title, company or description
    pub query: Option<String>,
    /// Exact employment type; `"all"` matches everything
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    /// Category filter
    pub category: Option<JobCategory>,
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: String,
    title: String,
    company: String,
    location: String,
    job_type: String,
    category: String,
    deadline: String,
    description: String,
    salary: String,
    created_at: String,
}

impl TryFrom<JobRow> for StoredJob {
    type Error = DatabaseError;

    fn try_from(row: JobRow) -> Result<Self> {
        let category = row
            .category
            .parse::<JobCategory>()
            .map_err(|e| DatabaseError::Decode(e.to_string()))?;
        let deadline = NaiveDate::parse_from_str(&row.deadline, DATE_FORMAT)
            .map_err(|e| DatabaseError::Decode(format!("deadline '{}': {e}", row.deadline)))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| DatabaseError::Decode(format!("created_at '{}': {e}", row.created_at)))?
            .with_timezone(&Utc);

        Ok(Self {
            id: row.id,
            record: JobRecord {
                title: row.title,
                company: row.company,
                location: row.location,
                job_type: row.job_type,
                category,
                deadline,
                description: row.description,
                salary: row.salary,
            },
            created_at,
        })
    }
}

/// Insert a job.
///
/// # Errors
/// Returns `DatabaseError::Duplicate` if a job with the same title, company
/// and deadline already exists, or another `DatabaseError` on failure.
pub async fn create_job(pool: &SqlitePool, record: &JobRecord) -> Result<StoredJob> {
    let id = uuid::Uuid::new_v4().to_string();
    let created_at = Utc::now();

    let result = sqlx::query(
        "INSERT INTO jobs (id, title, company, location, job_type, category, deadline, description, salary, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&record.title)
    .bind(&record.company)
    .bind(&record.location)
    .bind(&record.job_type)
    .bind(record.category.label())
    .bind(record.deadline.format(DATE_FORMAT).to_string())
    .bind(&record.description)
    .bind(&record.salary)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(StoredJob {
            id,
            record: record.clone(),
            created_at,
        }),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(DatabaseError::Duplicate {
                title: record.title.clone(),
                company: record.company.clone(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Search stored jobs, newest first.
///
/// # Errors
/// Returns error if the query fails or a row cannot be decoded.
pub async fn search_jobs(pool: &SqlitePool, filter: &JobQuery) -> Result<Vec<StoredJob>> {
    let needle = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q.to_lowercase()));

    let job_type = filter
        .job_type
        .as_deref()
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"));

    let category = filter.category.map(|c| c.label());

    let rows = sqlx::query_as::<_, JobRow>(
        "SELECT id, title, company, location, job_type, category, deadline, description, salary, created_at
         FROM jobs
         WHERE (?1 IS NULL OR lower(title) LIKE ?1 OR lower(company) LIKE ?1 OR lower(description) LIKE ?1)
           AND (?2 IS NULL OR job_type = ?2)
           AND (?3 IS NULL OR category = ?3)
         ORDER BY created_at DESC, rowid DESC",
    )
    .bind(needle)
    .bind(job_type)
    .bind(category)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StoredJob::try_from).collect()
}

/// Number of stored jobs.
///
/// # Errors
/// Returns error if the query fails.
pub async fn count_jobs(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;

    fn record(title: &str, company: &str, job_type: &str, category: JobCategory) -> JobRecord {
        JobRecord {
            title: title.to_string(),
            company: company.to_string(),
            location: "New Delhi".to_string(),
            job_type: job_type.to_string(),
            category,
            deadline: NaiveDate::from_ymd_opt(2026, 12, 31).expect("valid date"),
            description: format!("Jobs from {company}"),
            salary: "Varies".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_read_back_job() {
        let db = Database::in_memory().await.expect("open db");
        let job = record("Assistant", "UPSC", "Full-time", JobCategory::AdministrativeCivilServices);

        let stored = create_job(db.pool(), &job).await.expect("create job");
        let found = search_jobs(db.pool(), &JobQuery::default())
            .await
            .expect("search jobs");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record, job);
        assert_eq!(found[0].id, stored.id);
    }

    #[tokio::test]
    async fn test_duplicate_job_rejected() {
        let db = Database::in_memory().await.expect("open db");
        let job = record("Clerk", "SSC", "Full-time", JobCategory::CentralGovernment);

        create_job(db.pool(), &job).await.expect("first insert");
        let err = create_job(db.pool(), &job).await.unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(count_jobs(db.pool()).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_search_filters() {
        let db = Database::in_memory().await.expect("open db");
        for job in [
            record("Probationary Officer", "SBI", "Full-time", JobCategory::Banking),
            record("Grade B Officer", "RBI", "Full-time", JobCategory::Banking),
            record("Scientist B", "DRDO", "Contract", JobCategory::Defence),
        ] {
            create_job(db.pool(), &job).await.expect("insert");
        }

        let all = search_jobs(db.pool(), &JobQuery::default()).await.expect("search");
        assert_eq!(all.len(), 3);

        let officers = search_jobs(
            db.pool(),
            &JobQuery {
                query: Some("OFFICER".to_string()),
                ..JobQuery::default()
            },
        )
        .await
        .expect("search");
        assert_eq!(officers.len(), 2);

        let contract = search_jobs(
            db.pool(),
            &JobQuery {
                job_type: Some("Contract".to_string()),
                ..JobQuery::default()
            },
        )
        .await
        .expect("search");
        assert_eq!(contract.len(), 1);
        assert_eq!(contract[0].record.company, "DRDO");

        let banking_all_types = search_jobs(
            db.pool(),
            &JobQuery {
                query: Some("rbi".to_string()),
                job_type: Some("all".to_string()),
                category: Some(JobCategory::Banking),
            },
        )
        .await
        .expect("search");
        assert_eq!(banking_all_types.len(), 1);
        assert_eq!(banking_all_types[0].record.title, "Grade B Officer");
    }

    #[test]
    fn test_stored_job_serializes_flat() {
        let stored = StoredJob {
            id: "abc".to_string(),
            record: record("Clerk", "SSC", "Full-time", JobCategory::CentralGovernment),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&stored).expect("serialize");
        assert_eq!(json["id"], "abc");
        assert_eq!(json["title"], "Clerk");
        assert_eq!(json["type"], "Full-time");
        assert!(json.get("createdAt").is_some());
    }
}
