//! Skill catalog records, skills assigned to an employee, and proficiency levels.

use serde::{Deserialize, Serialize};

use super::{lenient, RecordId};

/// An entry of the company skill catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    /// Number of employees holding this skill.
    #[serde(default, deserialize_with = "lenient::opt_count")]
    pub employee_count: Option<u64>,
}

/// Minimal reference to a catalog skill embedded in other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRef {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
}

/// A skill on an employee's profile with a 1–5 proficiency score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedSkill {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub skill: Option<SkillRef>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    pub proficiency_score: Option<u8>,
}

/// Body of `POST /employees/{id}/skills`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignment {
    pub skill_id: RecordId,
    pub proficiency_score: u8,
}

/// Body of `PUT /employees/{id}/skills/{skill_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProficiencyUpdate {
    pub proficiency_score: u8,
}

/// Named proficiency levels shown on skill cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    /// Case-insensitive parse of a level label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }

    /// Progress-bar fill for the level.
    pub fn percent(&self) -> u8 {
        match self {
            Self::Beginner => 25,
            Self::Intermediate => 50,
            Self::Advanced => 75,
            Self::Expert => 100,
        }
    }

    /// Progress-bar fill for a raw label; unknown labels are 0.
    pub fn percent_for(label: &str) -> u8 {
        Self::parse(label).map(|l| l.percent()).unwrap_or(0)
    }
}
