use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Organization,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Organization => "organization",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "organization" => Some(Self::Organization),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantType {
    Student,
    Organization,
    Mentor,
}


impl From<Role> for ParticipantType {
    fn from(role: Role) -> Self {
        match role {
            Role::Student => Self::Student,
            Role::Organization => Self::Organization,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    Remote,
    #[serde(rename = "On-site")]
    OnSite,
    Hybrid,
}

impl ProjectType {
    pub const ALL: [ProjectType; 3] = [Self::Remote, Self::OnSite, Self::Hybrid];

    pub fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::OnSite => "On-site",
            Self::Hybrid => "Hybrid",
        }
    }

    /// Unknown values fall back to `Remote` so one odd row never hides a project.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace(' ', "-").as_str() {
            "on-site" | "onsite" => Self::OnSite,
            "hybrid" => Self::Hybrid,
            _ => Self::Remote,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row ids come back as numbers or uuid strings depending on the table.
pub(crate) fn id_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(default = "default_duration", deserialize_with = "duration_lenient")]
    pub duration: String,
    #[serde(
        rename = "type",
        default = "default_project_type",
        deserialize_with = "project_type_lenient"
    )]
    pub project_type: ProjectType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub mentor: Option<String>,
    #[serde(default, alias = "applicants", deserialize_with = "null_as_default")]
    pub applications: u32,
    #[serde(
        rename = "postedDate",
        alias = "posted_date",
        default,
        deserialize_with = "null_as_default"
    )]
    pub posted_date: String,
}

/// PostgREST sends `null` for empty columns; treat it like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_duration() -> String {
    "4 weeks".to_string()
}

fn duration_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(default_duration))
}

fn default_project_type() -> ProjectType {
    ProjectType::Remote
}

fn project_type_lenient<'de, D>(deserializer: D) -> Result<ProjectType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(ProjectType::parse_lenient)
        .unwrap_or(ProjectType::Remote))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "Under Review")]
    UnderReview,
    Accepted,
    Rejected,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        Self::UnderReview,
        Self::Accepted,
        Self::Rejected,
        Self::InterviewScheduled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::UnderReview => "Under Review",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::InterviewScheduled => "Interview Scheduled",
        }
    }

    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::UnderReview;
        };
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw.trim()))
            .unwrap_or(Self::UnderReview)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    pub id: String,
    pub project_id: Option<String>,
    pub project: String,
    pub organization: String,
    pub status: ApplicationStatus,
    /// `YYYY-MM-DD`
    pub applied_date: String,
    pub skills: Vec<String>,
    pub project_type: ProjectType,
    pub duration: String,
    pub description: String,
    pub mentor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: u32,
    pub participant_id: String,
    pub participant_name: String,
    pub participant_type: ParticipantType,
    pub last_message: String,
    pub last_message_time: String,
    pub unread_count: u32,
    pub online: bool,
    pub project_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: u32,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_type: ParticipantType,
    pub content: String,
    pub timestamp: String,
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mentor {
    pub id: u32,
    pub name: String,
    pub title: String,
    pub location: String,
    pub experience: String,
    pub rating: f32,
    pub total_reviews: u32,
    pub total_mentees: u32,
    pub expertise: Vec<String>,
    pub bio: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Gold,
    Silver,
    Bronze,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub projects: u32,
    pub points: u32,
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaderboardPeriod {
    #[default]
    AllTime,
    Month,
    Week,
}

impl LeaderboardPeriod {
    pub const ALL: [LeaderboardPeriod; 3] = [Self::AllTime, Self::Month, Self::Week];

    pub fn label(self) -> &'static str {
        match self {
            Self::AllTime => "All-time",
            Self::Month => "This Month",
            Self::Week => "This Week",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reward {
    pub name: String,
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_row_tolerates_numeric_ids_and_missing_columns() {
        let project: Project = serde_json::from_value(json!({
            "id": 42,
            "title": "Build a dashboard",
            "type": "on-site",
            "description": null,
            "applications": null
        }))
        .expect("sparse row should decode");

        assert_eq!(project.id, "42");
        assert_eq!(project.project_type, ProjectType::OnSite);
        assert_eq!(project.duration, "4 weeks");
        assert!(project.skills.is_empty());
        assert_eq!(project.mentor, None);
        assert_eq!(project.description, "");
        assert_eq!(project.applications, 0);
    }

    #[test]
    fn application_status_falls_back_to_under_review() {
        assert_eq!(
            ApplicationStatus::parse_lenient(Some("interview scheduled")),
            ApplicationStatus::InterviewScheduled
        );
        assert_eq!(
            ApplicationStatus::parse_lenient(Some("withdrawn")),
            ApplicationStatus::UnderReview
        );
        assert_eq!(ApplicationStatus::parse_lenient(None), ApplicationStatus::UnderReview);
    }

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!(Role::parse(" Organization "), Some(Role::Organization));
        assert_eq!(Role::parse("mentor"), None);
    }
}
