//! Wire shapes for GoTrue and PostgREST responses and their conversion into
//! domain types. Everything here is lenient: a missing or null column becomes
//! a display default instead of failing the whole page.

use crate::backend::Applicant;
use crate::error::BackendError;
use crate::models::{id_from_any, null_as_default, Application, ApplicationStatus, ProjectType};
use crate::profile::ProfileRow;
use crate::session::{AuthSession, AuthUser};
use serde::Deserialize;
use serde_json::Value;

const MISSING_COLUMN_CODES: [&str; 2] = ["PGRST204", "42703"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectJoin {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(rename = "type", default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mentor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRow {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub project_id: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub applied_date: Option<String>,
    #[serde(default)]
    pub projects: Option<ProjectJoin>,
}

impl ApplicationRow {
    pub fn into_application(self) -> Application {
        let project = self.projects.unwrap_or_default();
        let text = |value: Option<String>, fallback: &str| {
            value
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };

        Application {
            id: self.id,
            project_id: self.project_id.and_then(|value| match value {
                Value::String(text) => Some(text),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            }),
            project: text(project.title, "Unknown Project"),
            organization: text(project.organization, "Unknown Organization"),
            status: ApplicationStatus::parse_lenient(self.status.as_deref()),
            applied_date: self
                .applied_date
                .as_deref()
                .map(calendar_date)
                .unwrap_or_default(),
            skills: project.skills,
            project_type: project
                .project_type
                .as_deref()
                .map(ProjectType::parse_lenient)
                .unwrap_or(ProjectType::Remote),
            duration: text(project.duration, "4 weeks"),
            description: text(project.description, "No description available"),
            mentor: project.mentor,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicantRow {
    #[serde(flatten)]
    pub application: ApplicationRow,
    #[serde(default)]
    pub profiles: Option<ProfileRow>,
}

impl ApplicantRow {
    pub fn into_applicant(self) -> Applicant {
        let (student_name, student_email) = match self.profiles {
            Some(profile) => {
                let name = format!(
                    "{} {}",
                    profile.first_name.unwrap_or_default(),
                    profile.last_name.unwrap_or_default()
                )
                .trim()
                .to_string();
                let name = if name.is_empty() {
                    profile
                        .email
                        .clone()
                        .unwrap_or_else(|| "Unnamed student".to_string())
                } else {
                    name
                };
                (name, profile.email)
            }
            None => ("Unnamed student".to_string(), None),
        };

        Applicant {
            application: self.application.into_application(),
            student_name,
            student_email,
        }
    }
}

/// Normalizes a timestamp or date to `YYYY-MM-DD`.
pub fn calendar_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(raw) {
        return timestamp.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(timestamp) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return timestamp.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.chars().take(10).collect()
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        let expires_at = self.expires_at.or_else(|| {
            self.expires_in
                .map(|seconds| chrono::Utc::now().timestamp() + seconds)
        });
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

pub fn parse_session(body: Value) -> Result<AuthSession, BackendError> {
    let token: TokenResponse = serde_json::from_value(body)?;
    Ok(token.into_session())
}

/// Sign-up answers with a full token response when auto-confirm is on,
/// and with the bare user object otherwise.
pub fn parse_sign_up(body: Value) -> Result<(AuthUser, Option<AuthSession>), BackendError> {
    if body.get("access_token").is_some() {
        let session = parse_session(body)?;
        return Ok((session.user.clone(), Some(session)));
    }
    if let Some(user) = body.get("user").filter(|user| user.is_object()) {
        let user: AuthUser = serde_json::from_value(user.clone())?;
        return Ok((user, None));
    }
    let user: AuthUser = serde_json::from_value(body)?;
    Ok((user, None))
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Auth,
    Rest,
}

/// Maps a non-2xx response onto the error taxonomy. Auth failures keep
/// GoTrue's wording so the form can show it verbatim.
pub fn error_from_response(endpoint: Endpoint, status: u16, body: &str) -> BackendError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed
        .code
        .as_ref()
        .map(|code| match code {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .or(parsed.error_code.clone());
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty());

    if let Some(code) = code.as_deref() {
        if MISSING_COLUMN_CODES.contains(&code) {
            return BackendError::MissingColumn(message.unwrap_or_else(|| code.to_string()));
        }
    }

    match endpoint {
        Endpoint::Auth => BackendError::Auth(
            message.unwrap_or_else(|| format!("Authentication failed (HTTP {status})")),
        ),
        Endpoint::Rest => BackendError::Api {
            code: code.unwrap_or_else(|| status.to_string()),
            message: message.unwrap_or_else(|| body.trim().to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn application_row_with_join_converts() {
        let row: ApplicationRow = serde_json::from_value(json!({
            "id": 7,
            "student_id": "user-1",
            "project_id": 3,
            "status": "Accepted",
            "applied_date": "2024-01-10T09:30:00+00:00",
            "projects": {
                "title": "Data Analysis for Environmental Impact Study",
                "organization": "Green Earth NGO",
                "skills": ["Python"],
                "type": "Hybrid",
                "duration": "2 months"
            }
        }))
        .expect("row should decode");

        let application = row.into_application();
        assert_eq!(application.id, "7");
        assert_eq!(application.project_id.as_deref(), Some("3"));
        assert_eq!(application.status, ApplicationStatus::Accepted);
        assert_eq!(application.applied_date, "2024-01-10");
        assert_eq!(application.project_type, ProjectType::Hybrid);
        assert_eq!(application.description, "No description available");
    }

    #[test]
    fn application_row_without_join_uses_placeholders() {
        let row: ApplicationRow = serde_json::from_value(json!({
            "id": "a1",
            "status": null,
            "projects": null
        }))
        .expect("sparse row should decode");

        let application = row.into_application();
        assert_eq!(application.project, "Unknown Project");
        assert_eq!(application.organization, "Unknown Organization");
        assert_eq!(application.status, ApplicationStatus::UnderReview);
        assert_eq!(application.duration, "4 weeks");
        assert!(application.skills.is_empty());
        assert_eq!(application.applied_date, "");
    }

    #[test]
    fn applicant_name_falls_back_to_email() {
        let row: ApplicantRow = serde_json::from_value(json!({
            "id": 1,
            "profiles": { "id": "user-2", "email": "sam@example.com" },
            "projects": { "title": "Website Redesign" }
        }))
        .expect("applicant row should decode");

        let applicant = row.into_applicant();
        assert_eq!(applicant.student_name, "sam@example.com");
        assert_eq!(applicant.application.project, "Website Redesign");
    }

    #[test]
    fn postgrest_missing_column_is_recognized() {
        let body = r#"{"code":"PGRST204","details":null,"hint":null,"message":"Could not find the 'bio' column of 'profiles' in the schema cache"}"#;
        let error = error_from_response(Endpoint::Rest, 400, body);
        assert!(error.is_missing_column());

        let body = r#"{"code":"42703","message":"column profiles.major does not exist"}"#;
        assert!(error_from_response(Endpoint::Rest, 400, body).is_missing_column());
    }

    #[test]
    fn gotrue_error_message_is_kept_verbatim() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            error_from_response(Endpoint::Auth, 400, body),
            BackendError::Auth("Invalid login credentials".to_string())
        );

        let body = r#"{"code":422,"msg":"User already registered"}"#;
        assert_eq!(
            error_from_response(Endpoint::Auth, 422, body),
            BackendError::Auth("User already registered".to_string())
        );
    }

    #[test]
    fn unparseable_rest_error_keeps_status_and_body() {
        let error = error_from_response(Endpoint::Rest, 502, "Bad Gateway");
        assert_eq!(
            error,
            BackendError::Api {
                code: "502".to_string(),
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn sign_up_without_session_returns_user_only() {
        let (user, session) = parse_sign_up(json!({
            "id": "user-3",
            "email": "new@example.com",
            "user_metadata": { "role": "student" }
        }))
        .expect("bare user should decode");

        assert_eq!(user.id, "user-3");
        assert_eq!(user.metadata.role.as_deref(), Some("student"));
        assert!(session.is_none());
    }

    #[test]
    fn token_response_computes_expiry_from_expires_in() {
        let session = parse_session(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": "user-1" }
        }))
        .expect("token response should decode");

        let expires_at = session.expires_at.expect("expiry should be derived");
        assert!(expires_at > chrono::Utc::now().timestamp());
        assert_eq!(session.user.metadata, Default::default());
    }

    #[test]
    fn calendar_date_handles_common_shapes() {
        assert_eq!(calendar_date("2024-01-15"), "2024-01-15");
        assert_eq!(calendar_date("2024-01-15T23:59:59.123456"), "2024-01-15");
        assert_eq!(calendar_date("2024-01-15T10:00:00Z"), "2024-01-15");
    }
}
