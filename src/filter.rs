//! Client-side list filtering. Everything here is a pure predicate over the
//! in-memory lists a page already holds; recomputed on every keystroke.

use crate::models::{Application, ApplicationStatus, Mentor, Project, ProjectType};
use std::collections::HashSet;

pub const SKILL_OPTIONS: [&str; 5] = [
    "Marketing",
    "Data Analysis",
    "Design",
    "Development",
    "Content Creation",
];

/// How duration strings are sorted into buckets.
///
/// `Legacy` keeps the historical substring heuristic, so "13 weeks" lands in
/// both week buckets. `Parsed` reads a `{value, unit}` pair instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationMatching {
    #[default]
    Legacy,
    Parsed,
}

impl DurationMatching {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "parsed" => Some(Self::Parsed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationBucket {
    OneToTwoWeeks,
    ThreeToFourWeeks,
    OneToTwoMonths,
    ThreePlusMonths,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 4] = [
        Self::OneToTwoWeeks,
        Self::ThreeToFourWeeks,
        Self::OneToTwoMonths,
        Self::ThreePlusMonths,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OneToTwoWeeks => "1-2 weeks",
            Self::ThreeToFourWeeks => "3-4 weeks",
            Self::OneToTwoMonths => "1-2 months",
            Self::ThreePlusMonths => "3+ months",
        }
    }

    pub fn matches(self, duration: &str, mode: DurationMatching) -> bool {
        match mode {
            DurationMatching::Legacy => self.matches_legacy(duration),
            DurationMatching::Parsed => {
                ParsedDuration::parse(duration).and_then(ParsedDuration::bucket) == Some(self)
            }
        }
    }

    /// Unit word plus any of the bucket's digits anywhere in the string.
    pub fn matches_legacy(self, duration: &str) -> bool {
        let duration = duration.to_lowercase();
        let has_any = |digits: &[char]| duration.chars().any(|c| digits.contains(&c));
        match self {
            Self::OneToTwoWeeks => duration.contains("week") && has_any(&['1', '2']),
            Self::ThreeToFourWeeks => duration.contains("week") && has_any(&['3', '4']),
            Self::OneToTwoMonths => duration.contains("month") && has_any(&['1', '2']),
            Self::ThreePlusMonths => {
                duration.contains("month") && has_any(&['3', '4', '5', '6', '7', '8', '9'])
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDuration {
    pub value: u32,
    pub unit: DurationUnit,
}

impl ParsedDuration {
    /// Reads strings like "6 weeks", "3-4 weeks" or "3+ months". Ranges keep
    /// their upper bound.
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        let unit = if lower.contains("month") {
            DurationUnit::Month
        } else if lower.contains("week") {
            DurationUnit::Week
        } else if lower.contains("day") {
            DurationUnit::Day
        } else {
            return None;
        };

        let value = lower
            .split(|c: char| !c.is_ascii_digit())
            .filter_map(|run| run.parse::<u32>().ok())
            .max()?;
        (value > 0).then_some(Self { value, unit })
    }

    pub fn bucket(self) -> Option<DurationBucket> {
        let weeks = match self.unit {
            DurationUnit::Day => self.value.div_ceil(7),
            DurationUnit::Week => self.value,
            DurationUnit::Month => return Some(Self::month_bucket(self.value)),
        };
        match weeks {
            0 => None,
            1..=2 => Some(DurationBucket::OneToTwoWeeks),
            3..=4 => Some(DurationBucket::ThreeToFourWeeks),
            more => Some(Self::month_bucket(more.div_ceil(4))),
        }
    }

    fn month_bucket(months: u32) -> DurationBucket {
        if months <= 2 {
            DurationBucket::OneToTwoMonths
        } else {
            DurationBucket::ThreePlusMonths
        }
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Project browser filter. Categories are AND'ed, selections within a
/// category are OR'ed, and an empty category lets everything through.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub query: String,
    pub skills: HashSet<String>,
    pub durations: HashSet<DurationBucket>,
    pub types: HashSet<ProjectType>,
}

fn toggle<T: Eq + std::hash::Hash>(set: &mut HashSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

impl ProjectFilter {
    pub fn toggle_skill(&mut self, skill: &str) {
        toggle(&mut self.skills, skill.to_string());
    }

    pub fn toggle_duration(&mut self, bucket: DurationBucket) {
        toggle(&mut self.durations, bucket);
    }

    pub fn toggle_type(&mut self, project_type: ProjectType) {
        toggle(&mut self.types, project_type);
    }

    pub fn has_category_filters(&self) -> bool {
        !(self.skills.is_empty() && self.durations.is_empty() && self.types.is_empty())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, project: &Project, mode: DurationMatching) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || contains_ci(&project.title, &query)
            || contains_ci(&project.organization, &query)
            || project.skills.iter().any(|skill| contains_ci(skill, &query));

        let matches_skills = self.skills.is_empty()
            || self.skills.iter().any(|selected| {
                let selected = selected.to_lowercase();
                project.skills.iter().any(|skill| {
                    let skill = skill.to_lowercase();
                    skill.contains(&selected) || selected.contains(&skill)
                })
            });

        let matches_duration = self.durations.is_empty()
            || self
                .durations
                .iter()
                .any(|bucket| bucket.matches(&project.duration, mode));

        let matches_type = self.types.is_empty() || self.types.contains(&project.project_type);

        matches_query && matches_skills && matches_duration && matches_type
    }

    pub fn apply<'a>(&self, projects: &'a [Project], mode: DurationMatching) -> Vec<&'a Project> {
        projects
            .iter()
            .filter(|project| self.matches(project, mode))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub query: String,
    /// `None` is "All Status".
    pub status: Option<ApplicationStatus>,
}

impl ApplicationFilter {
    pub fn matches(&self, application: &Application) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || contains_ci(&application.project, &query)
            || contains_ci(&application.organization, &query)
            || application
                .skills
                .iter()
                .any(|skill| contains_ci(skill, &query));
        let matches_status = self
            .status
            .map_or(true, |status| application.status == status);
        matches_query && matches_status
    }

    pub fn apply<'a>(&self, applications: &'a [Application]) -> Vec<&'a Application> {
        applications
            .iter()
            .filter(|application| self.matches(application))
            .collect()
    }
}

pub fn search_mentors<'a>(mentors: &'a [Mentor], query: &str) -> Vec<&'a Mentor> {
    let query = query.trim().to_lowercase();
    mentors
        .iter()
        .filter(|mentor| {
            query.is_empty()
                || contains_ci(&mentor.name, &query)
                || contains_ci(&mentor.title, &query)
                || mentor
                    .expertise
                    .iter()
                    .any(|area| contains_ci(area, &query))
        })
        .collect()
}
