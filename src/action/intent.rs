use super::ActionKind;
use crate::models::Project;
use crate::profile::{PASSWORD_UPDATED, PROFILE_SAVED};

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// What the user asked for, carried through the async round-trip so the
/// completion knows which collection to touch and what to say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionIntent {
    Apply { project_id: String, title: String },
    Save { project_id: String, title: String },
    Unsave { project_id: String, title: String },
    ProfileSave,
    PasswordChange,
    PostProject { title: String },
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutput {
    Done,
    /// Replaces the default success message.
    Notice(String),
    Posted(Project),
}

impl ActionIntent {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Apply { .. } => ActionKind::Apply,
            Self::Save { .. } | Self::Unsave { .. } => ActionKind::Save,
            Self::ProfileSave => ActionKind::ProfileSave,
            Self::PasswordChange => ActionKind::PasswordChange,
            Self::PostProject { .. } => ActionKind::PostProject,
        }
    }

    pub fn subject(&self) -> Option<String> {
        match self {
            Self::Apply { project_id, .. }
            | Self::Save { project_id, .. }
            | Self::Unsave { project_id, .. } => Some(project_id.clone()),
            Self::ProfileSave | Self::PasswordChange | Self::PostProject { .. } => None,
        }
    }

    pub fn pending_message(&self) -> &'static str {
        match self {
            Self::Apply { .. } => "Submitting your application...",
            Self::Save { .. } => "Saving project...",
            Self::Unsave { .. } => "Removing from saved projects...",
            Self::ProfileSave => "Saving profile...",
            Self::PasswordChange => "Updating password...",
            Self::PostProject { .. } => "Posting project...",
        }
    }

    pub fn success_message(&self) -> String {
        match self {
            Self::Apply { title, .. } => {
                format!("Application submitted for \"{title}\"! The organization will review it soon.")
            }
            Self::Save { title, .. } => format!("\"{title}\" saved to your projects."),
            Self::Unsave { title, .. } => format!("\"{title}\" removed from saved projects."),
            Self::ProfileSave => PROFILE_SAVED.to_string(),
            Self::PasswordChange => PASSWORD_UPDATED.to_string(),
            Self::PostProject { title } => format!("\"{title}\" is now live."),
        }
    }

    pub fn message_for(&self, output: &ActionOutput) -> String {
        match output {
            ActionOutput::Notice(message) => message.clone(),
            ActionOutput::Done | ActionOutput::Posted(_) => self.success_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_unsave_share_one_status_slot() {
        let save = ActionIntent::Save {
            project_id: "2".to_string(),
            title: "Analyze Customer Feedback".to_string(),
        };
        let unsave = ActionIntent::Unsave {
            project_id: "2".to_string(),
            title: "Analyze Customer Feedback".to_string(),
        };
        assert_eq!(save.kind(), unsave.kind());
        assert_eq!(save.pending_message(), "Saving project...");
        assert_eq!(unsave.pending_message(), "Removing from saved projects...");
    }

    #[test]
    fn success_message_names_the_subject() {
        let apply = ActionIntent::Apply {
            project_id: "6".to_string(),
            title: "Website Redesign".to_string(),
        };
        assert!(apply.success_message().contains("Website Redesign"));
        assert_eq!(apply.subject().as_deref(), Some("6"));
        assert_eq!(ActionIntent::ProfileSave.subject(), None);
    }

    #[test]
    fn notice_overrides_the_default_message() {
        let notice = ActionOutput::Notice("Saved to metadata".to_string());
        assert_eq!(
            ActionIntent::ProfileSave.message_for(&notice),
            "Saved to metadata"
        );
        assert_eq!(
            ActionIntent::ProfileSave.message_for(&ActionOutput::Done),
            PROFILE_SAVED
        );
    }
}
