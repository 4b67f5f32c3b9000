//! Shared domain types used across the pipeline.

use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recruitment category a source (and every job extracted from it) belongs to.
///
/// Serialized as the human-readable label, e.g. `"Public Sector Undertaking (PSU)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum JobCategory {
    /// Central government ministries and commissions
    #[serde(rename = "Central Government")]
    CentralGovernment,
    /// State government departments and PSCs
    #[serde(rename = "State Government")]
    StateGovernment,
    /// Public sector undertakings
    #[serde(rename = "Public Sector Undertaking (PSU)")]
    PublicSectorUndertaking,
    /// Armed forces and defence research
    #[serde(rename = "Defence")]
    Defence,
    /// Railway recruitment boards
    #[serde(rename = "Railways")]
    Railways,
    /// Public sector banks and the central bank
    #[serde(rename = "Banking")]
    Banking,
    /// Police and paramilitary forces
    #[serde(rename = "Police")]
    Police,
    /// Courts and judicial services
    #[serde(rename = "Judiciary")]
    Judiciary,
    /// Teaching and education boards
    #[serde(rename = "Teaching / Education")]
    TeachingEducation,
    /// Hospitals and medical institutes
    #[serde(rename = "Health / Medical")]
    HealthMedical,
    /// Engineering and technical services
    #[serde(rename = "Engineering / Technical")]
    EngineeringTechnical,
    /// Civil services examinations
    #[serde(rename = "Administrative / Civil Services")]
    AdministrativeCivilServices,
    /// Apprenticeship schemes
    #[serde(rename = "Apprenticeship")]
    Apprenticeship,
    /// Contract and temporary posts
    #[serde(rename = "Contract / Temporary")]
    ContractTemporary,
    /// Internships and training programmes
    #[serde(rename = "Internship / Training")]
    InternshipTraining,
}

impl JobCategory {
    /// Every category, in display order.
    pub const ALL: [JobCategory; 15] = [
        Self::CentralGovernment,
        Self::StateGovernment,
        Self::PublicSectorUndertaking,
        Self::Defence,
        Self::Railways,
        Self::Banking,
        Self::Police,
        Self::Judiciary,
        Self::TeachingEducation,
        Self::HealthMedical,
        Self::EngineeringTechnical,
        Self::AdministrativeCivilServices,
        Self::Apprenticeship,
        Self::ContractTemporary,
        Self::InternshipTraining,
    ];

    /// Human-readable label for the category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CentralGovernment => "Central Government",
            Self::StateGovernment => "State Government",
            Self::PublicSectorUndertaking => "Public Sector Undertaking (PSU)",
            Self::Defence => "Defence",
            Self::Railways => "Railways",
            Self::Banking => "Banking",
            Self::Police => "Police",
            Self::Judiciary => "Judiciary",
            Self::TeachingEducation => "Teaching / Education",
            Self::HealthMedical => "Health / Medical",
            Self::EngineeringTechnical => "Engineering / Technical",
            Self::AdministrativeCivilServices => "Administrative / Civil Services",
            Self::Apprenticeship => "Apprenticeship",
            Self::ContractTemporary => "Contract / Temporary",
            Self::InternshipTraining => "Internship / Training",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobCategory {
    type Err = CoreError;

    /// Parse a category from its label, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| CoreError::Validation(format!("unknown job category: '{wanted}'")))
    }
}

/// A structured job posting produced by extraction.
///
/// Records are immutable once produced; re-scraping a source creates new
/// records rather than updating existing ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Job title (at most 100 characters)
    pub title: String,
    /// Hiring organisation (at most 100 characters)
    pub company: String,
    /// Work location (at most 100 characters)
    pub location: String,
    /// Employment type, e.g. "Full-time"
    #[serde(rename = "type")]
    pub job_type: String,
    /// Category of the source the job was found on
    pub category: JobCategory,
    /// Last date to apply
    pub deadline: NaiveDate,
    /// Short description (at most 200 characters)
    pub description: String,
    /// Salary range or "Varies"
    pub salary: String,
}
