use crate::backend::Backend;
use crate::error::BackendResult;
use crate::models::{id_from_any, Role};
use crate::session::{AuthSession, AuthUser, UserAttributes, UserMetadata};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const INDUSTRIES: [&str; 5] = ["Technology", "Healthcare", "Education", "Non-profit", "Other"];

pub const MIN_PASSWORD_LEN: usize = 6;

pub const PROFILE_SAVED: &str = "Profile updated successfully!";
pub const PROFILE_SAVED_NEEDS_MIGRATION: &str =
    "Profile saved. Run the latest database migration to store all profile fields.";
pub const PASSWORD_UPDATED: &str = "Password updated successfully!";

/// A `profiles` row. Every column but `id` may be absent on older schemas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ProfileRow {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub major: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Row inserted on sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

/// Columns written by the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileChanges {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub updated_at: String,
}

/// Display model: row column when present and non-blank, else user metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Profile {
    pub email: String,
    pub role: Option<Role>,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub university: String,
    pub major: String,
    pub organization_name: String,
    pub industry: String,
}

impl Profile {
    pub fn resolve(row: Option<&ProfileRow>, user: &AuthUser) -> Self {
        let meta = &user.metadata;
        let pick = |column: Option<&Option<String>>, fallback: &Option<String>| {
            column
                .and_then(|value| value.as_deref())
                .filter(|value| !value.trim().is_empty())
                .or(fallback.as_deref())
                .unwrap_or_default()
                .to_string()
        };

        Self {
            email: pick(row.map(|row| &row.email), &user.email),
            role: row
                .and_then(|row| row.role.as_deref())
                .and_then(Role::parse)
                .or_else(|| meta.role()),
            first_name: pick(row.map(|row| &row.first_name), &meta.first_name),
            last_name: pick(row.map(|row| &row.last_name), &meta.last_name),
            bio: pick(row.map(|row| &row.bio), &meta.bio),
            university: pick(row.map(|row| &row.university), &meta.university),
            major: pick(row.map(|row| &row.major), &meta.major),
            organization_name: pick(
                row.map(|row| &row.organization_name),
                &meta.organization_name,
            ),
            industry: pick(row.map(|row| &row.industry), &meta.industry),
        }
    }

    pub fn display_name(&self) -> String {
        if !self.organization_name.is_empty() && self.role == Some(Role::Organization) {
            return self.organization_name.clone();
        }
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// Editable copy of the profile held by the settings page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub university: String,
    pub major: String,
    pub organization_name: String,
    pub industry: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            bio: profile.bio.clone(),
            university: profile.university.clone(),
            major: profile.major.clone(),
            organization_name: profile.organization_name.clone(),
            industry: if profile.industry.is_empty() {
                INDUSTRIES[0].to_string()
            } else {
                profile.industry.clone()
            },
        }
    }

    pub fn changes(&self, role: Option<Role>) -> ProfileChanges {
        let student = role == Some(Role::Student);
        let organization = role == Some(Role::Organization);
        let keep = |enabled: bool, value: &str| enabled.then(|| value.trim().to_string());

        ProfileChanges {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            bio: self.bio.trim().to_string(),
            university: keep(student, &self.university),
            major: keep(student, &self.major),
            organization_name: keep(organization, &self.organization_name),
            industry: keep(organization, &self.industry),
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Merges the form into existing metadata, leaving unrelated keys alone.
    pub fn metadata(&self, role: Option<Role>, existing: &UserMetadata) -> UserMetadata {
        let changes = self.changes(role);
        UserMetadata {
            first_name: Some(changes.first_name),
            last_name: Some(changes.last_name),
            bio: Some(changes.bio),
            university: changes.university.or_else(|| existing.university.clone()),
            major: changes.major.or_else(|| existing.major.clone()),
            organization_name: changes
                .organization_name
                .or_else(|| existing.organization_name.clone()),
            industry: changes.industry.or_else(|| existing.industry.clone()),
            role: existing.role.clone(),
        }
    }

    /// Copies what was just saved into the displayed profile.
    pub fn apply_to(&self, profile: &mut Profile, role: Option<Role>) {
        let changes = self.changes(role);
        profile.first_name = changes.first_name;
        profile.last_name = changes.last_name;
        profile.bio = changes.bio;
        if let Some(university) = changes.university {
            profile.university = university;
        }
        if let Some(major) = changes.major {
            profile.major = major;
        }
        if let Some(organization_name) = changes.organization_name {
            profile.organization_name = organization_name;
        }
        if let Some(industry) = changes.industry {
            profile.industry = industry;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSaveOutcome {
    Saved,
    /// The row update hit an unknown column; only user metadata was written.
    SavedToMetadataOnly,
}

/// Outcome plus the auth user as the server now has it, when metadata was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSaved {
    pub outcome: ProfileSaveOutcome,
    pub user: Option<AuthUser>,
}

impl ProfileSaveOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Saved => PROFILE_SAVED,
            Self::SavedToMetadataOnly => PROFILE_SAVED_NEEDS_MIGRATION,
        }
    }
}

pub async fn save_profile(
    backend: &dyn Backend,
    session: &AuthSession,
    role: Option<Role>,
    form: &ProfileForm,
) -> BackendResult<ProfileSaved> {
    let attributes = UserAttributes {
        data: Some(form.metadata(role, &session.user.metadata)),
        password: None,
    };

    match backend.update_profile(session, &form.changes(role)).await {
        Ok(()) => {
            let user = match backend.update_user(session, &attributes).await {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "profile row saved but metadata mirror failed");
                    None
                }
            };
            Ok(ProfileSaved {
                outcome: ProfileSaveOutcome::Saved,
                user,
            })
        }
        Err(err) if err.is_missing_column() => {
            warn!(error = %err, "profiles table is behind the schema, saving to user metadata");
            let user = backend.update_user(session, &attributes).await?;
            info!("profile saved to user metadata only");
            Ok(ProfileSaved {
                outcome: ProfileSaveOutcome::SavedToMetadataOnly,
                user: Some(user),
            })
        }
        Err(err) => Err(err),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordForm {
    /// Returns the password to submit, or the message to show.
    pub fn validate(&self) -> Result<String, String> {
        if self.new_password.is_empty() {
            return Err("Please enter a new password.".to_string());
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long."
            ));
        }
        if self.new_password != self.confirm_password {
            return Err("Passwords do not match.".to_string());
        }
        Ok(self.new_password.clone())
    }
}

pub async fn change_password(
    backend: &dyn Backend,
    session: &AuthSession,
    password: String,
) -> BackendResult<()> {
    let attributes = UserAttributes {
        data: None,
        password: Some(password),
    };
    backend.update_user(session, &attributes).await.map(|_| ())
}
