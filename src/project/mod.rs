//! Project records, the admin form draft, and listing rows.

mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use store::{JsonFileStore, ProjectStore, StoreError, featured};

/// Valid `day_number` values: one project a day for thirty days.
pub const DAY_RANGE: std::ops::RangeInclusive<u32> = 1..=30;

/// Tech stack entries shown in a listing row before the `+N` overflow.
pub const TECH_PREVIEW_LEN: usize = 3;

/// Length of the description excerpt in listing rows.
pub const EXCERPT_CHARS: usize = 120;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    /// Description markup, see [`crate::markup`].
    pub description: String,
    #[serde(default)]
    pub day_number: Option<u32>,
    #[serde(default)]
    pub project_date: Option<NaiveDate>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated project fields, ready to insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub day_number: Option<u32>,
    pub project_date: Option<NaiveDate>,
    pub tech_stack: Vec<String>,
    pub live_link: Option<String>,
    pub github_link: Option<String>,
    pub image_url: Option<String>,
}

impl NewProject {
    pub(crate) fn into_project(self, id: u64, created_at: DateTime<Utc>) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            day_number: self.day_number,
            project_date: self.project_date,
            tech_stack: self.tech_stack,
            live_link: self.live_link,
            github_link: self.github_link,
            image_url: self.image_url,
            created_at,
        }
    }
}

/// Why a draft cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("day number {0:?} is not a number")]
    InvalidDayNumber(String),
    #[error("day number {0} is outside 1-30")]
    DayOutOfRange(u32),
    #[error("project date {0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),
}

/// The admin form's raw fields.
///
/// Everything is a string as typed; [`ProjectDraft::validate`] turns it into
/// a [`NewProject`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub day_number: String,
    pub project_date: String,
    /// Comma-separated.
    pub tech_stack: String,
    pub live_link: String,
    pub github_link: String,
    pub image_url: String,
}

impl ProjectDraft {
    /// Fill the form from an existing project for editing.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            day_number: project.day_number.map(|d| d.to_string()).unwrap_or_default(),
            project_date: project
                .project_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            tech_stack: project.tech_stack.join(", "),
            live_link: project.live_link.clone().unwrap_or_default(),
            github_link: project.github_link.clone().unwrap_or_default(),
            image_url: project.image_url.clone().unwrap_or_default(),
        }
    }

    /// Check required fields and convert the optional ones.
    ///
    /// # Errors
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<NewProject, ProjectError> {
        let title = required("title", &self.title)?;
        let description = required("description", &self.description)?;

        let day_number = match self.day_number.trim() {
            "" => None,
            raw => {
                let day: u32 = raw
                    .parse()
                    .map_err(|_| ProjectError::InvalidDayNumber(raw.to_string()))?;
                if !DAY_RANGE.contains(&day) {
                    return Err(ProjectError::DayOutOfRange(day));
                }
                Some(day)
            }
        };

        let project_date = match self.project_date.trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, DATE_FORMAT)
                    .map_err(|_| ProjectError::InvalidDate(raw.to_string()))?,
            ),
        };

        let tech_stack = split_tech_stack(&self.tech_stack);
        if tech_stack.is_empty() {
            return Err(ProjectError::MissingField("tech stack"));
        }

        Ok(NewProject {
            title,
            description,
            day_number,
            project_date,
            tech_stack,
            live_link: optional(&self.live_link),
            github_link: optional(&self.github_link),
            image_url: optional(&self.image_url),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProjectError> {
    if value.trim().is_empty() {
        Err(ProjectError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Split a comma-separated tech stack, trimming entries and dropping empties.
pub fn split_tech_stack(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// One row of the project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub id: u64,
    pub title: String,
    pub day_number: Option<u32>,
    /// First [`TECH_PREVIEW_LEN`] tech stack entries.
    pub tech_preview: Vec<String>,
    /// How many entries did not fit in the preview.
    pub tech_overflow: usize,
    pub has_live_link: bool,
    pub has_github_link: bool,
    pub excerpt: String,
}

impl ProjectSummary {
    pub fn from_project(project: &Project) -> Self {
        let tech_preview: Vec<String> = project
            .tech_stack
            .iter()
            .take(TECH_PREVIEW_LEN)
            .cloned()
            .collect();
        Self {
            id: project.id,
            title: project.title.clone(),
            day_number: project.day_number,
            tech_overflow: project.tech_stack.len() - tech_preview.len(),
            tech_preview,
            has_live_link: project.live_link.is_some(),
            has_github_link: project.github_link.is_some(),
            excerpt: crate::markup::summary(&project.description, EXCERPT_CHARS),
        }
    }

    /// Tech stack as shown in the listing, e.g. `Rust, Axum, SQLx +2`.
    pub fn tech_label(&self) -> String {
        let preview = self.tech_preview.join(", ");
        if self.tech_overflow == 0 {
            preview
        } else {
            format!("{preview} +{}", self.tech_overflow)
        }
    }
}
