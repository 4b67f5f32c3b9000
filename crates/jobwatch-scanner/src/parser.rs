//! Validation of untrusted model output into job records.
//!
//! Every step is fail-soft: malformed output becomes a [`ParseOutcome`]
//! describing what went wrong, never an error or panic.

use chrono::{DateTime, Duration, NaiveDate};
use jobwatch_core::{JobCategory, JobRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Greedy match from the first `[` to the last `]`.
static JSON_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[\s\S]*\]").expect("JSON array regex is hardcoded and valid"));

const TITLE_MAX: usize = 100;
const COMPANY_MAX: usize = 100;
const LOCATION_MAX: usize = 100;
const TYPE_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 200;
const SALARY_MAX: usize = 100;
const DEFAULT_DEADLINE_DAYS: i64 = 60;

/// Limits and defaults applied while validating.
#[derive(Debug, Clone, Copy)]
pub struct ParseRules {
    /// Records kept per source
    pub max_jobs: usize,
    /// Days after `today` used for missing or unparseable deadlines
    pub default_deadline_days: i64,
}

impl Default for ParseRules {
    fn default() -> Self {
        Self {
            max_jobs: 5,
            default_deadline_days: DEFAULT_DEADLINE_DAYS,
        }
    }
}

/// Result of validating one model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// At least one valid record
    Jobs(Vec<JobRecord>),
    /// A well-formed array with no usable entries
    Empty,
    /// No array-shaped text in the response
    NoArray,
    /// The array text was not valid JSON
    InvalidJson(String),
}

impl ParseOutcome {
    /// Records extracted, empty for every non-`Jobs` outcome.
    #[must_use]
    pub fn into_jobs(self) -> Vec<JobRecord> {
        match self {
            Self::Jobs(jobs) => jobs,
            _ => Vec::new(),
        }
    }
}

/// Validate `response` into at most `rules.max_jobs` records for `source_name`.
#[must_use]
pub fn parse_jobs(
    response: &str,
    source_name: &str,
    category: JobCategory,
    rules: ParseRules,
    today: NaiveDate,
) -> ParseOutcome {
    let Some(found) = JSON_ARRAY.find(response) else {
        return ParseOutcome::NoArray;
    };

    let value: Value = match serde_json::from_str(found.as_str()) {
        Ok(value) => value,
        Err(e) => return ParseOutcome::InvalidJson(e.to_string()),
    };

    let Value::Array(entries) = value else {
        return ParseOutcome::InvalidJson("expected a JSON array".to_string());
    };

    let default_deadline = deadline_after(today, rules.default_deadline_days)
        .or_else(|| deadline_after(today, DEFAULT_DEADLINE_DAYS))
        .unwrap_or(today);

    let jobs: Vec<JobRecord> = entries
        .iter()
        .filter_map(|entry| to_record(entry, source_name, category, default_deadline))
        .take(rules.max_jobs)
        .collect();

    if jobs.is_empty() {
        ParseOutcome::Empty
    } else {
        ParseOutcome::Jobs(jobs)
    }
}

fn deadline_after(today: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|days| today.checked_add_signed(days))
}

fn to_record(
    entry: &Value,
    source_name: &str,
    category: JobCategory,
    default_deadline: NaiveDate,
) -> Option<JobRecord> {
    let field = |key: &str, max: usize| {
        entry
            .get(key)
            .and_then(coerce)
            .map(|s| cap(&s, max))
            .filter(|s| !s.is_empty())
    };

    let title = field("title", TITLE_MAX)?;
    let company = field("company", COMPANY_MAX)?;

    Some(JobRecord {
        title,
        company,
        location: field("location", LOCATION_MAX)
            .unwrap_or_else(|| cap(source_name, LOCATION_MAX)),
        job_type: field("type", TYPE_MAX).unwrap_or_else(|| "Full-time".to_string()),
        category,
        deadline: entry
            .get("deadline")
            .and_then(coerce)
            .and_then(|s| parse_deadline(&s))
            .unwrap_or(default_deadline),
        description: field("description", DESCRIPTION_MAX)
            .unwrap_or_else(|| cap(&format!("Jobs from {source_name}"), DESCRIPTION_MAX)),
        salary: field("salary", SALARY_MAX).unwrap_or_else(|| "Varies".to_string()),
    })
}

/// String form of a truthy JSON value; `None` for null, false, 0 and "".
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| coerce(v).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Trim and keep at most `max` characters.
fn cap(s: &str, max: usize) -> String {
    s.trim().chars().take(max).collect::<String>().trim_end().to_string()
}

/// Accept `YYYY-MM-DD` or an RFC 3339 timestamp (date part kept).
fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
