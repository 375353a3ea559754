//! Backup definition model
//!
//! A definition says what to copy (origin, destination) and when
//! (trigger, start time, recurrence). Drafts carry the optional fields the
//! setup workflow may leave unset; `BackupDraft::resolve` fills them in.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ids::BackupId;

/// When a backup is initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    #[default]
    Never,
    Startup,
    Scheduled,
    UserLogon,
}

impl TriggerKind {
    /// Parse a trigger kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "never" => Some(Self::Never),
            "startup" => Some(Self::Startup),
            "scheduled" | "schedule" => Some(Self::Scheduled),
            "logon" | "user_logon" | "userlogon" => Some(Self::UserLogon),
            _ => None,
        }
    }

    /// Short upper-case label used in listings
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Never => "NEVER",
            Self::Startup => "STARTUP",
            Self::Scheduled => "SCHEDULE",
            Self::UserLogon => "LOGON",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "Never"),
            Self::Startup => write!(f, "At Startup"),
            Self::Scheduled => write!(f, "On a Schedule"),
            Self::UserLogon => write!(f, "At current user's Logon"),
        }
    }
}

/// Whether a backup repeats or runs once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Recurring,
    #[default]
    Single,
}

impl RecurrenceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "recurring" | "repeat" => Some(Self::Recurring),
            "single" | "once" => Some(Self::Single),
            _ => None,
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recurring => write!(f, "Recurring"),
            Self::Single => write!(f, "Single"),
        }
    }
}

/// Unit of the recurrence step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepUnit {
    #[default]
    Days,
    Weeks,
}

impl StepUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "day" | "days" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            _ => None,
        }
    }
}

impl fmt::Display for StepUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Days => write!(f, "Days"),
            Self::Weeks => write!(f, "Weeks"),
        }
    }
}

/// Day of the week, stored by its English name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Parse a weekday from its full or three-letter name
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|day| {
            let name = day.to_string().to_lowercase();
            name == lower || name[..3] == lower
        })
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

/// Unvalidated input from the setup workflow
///
/// Origin and destination are required; every other field has a documented
/// default applied by `resolve`.
#[derive(Debug, Clone, Default)]
pub struct BackupDraft {
    /// Display name (default: the configured default name)
    pub name: Option<String>,
    pub origin: String,
    pub destination: String,
    /// Default: `TriggerKind::Never`
    pub trigger: Option<TriggerKind>,
    /// Unix timestamp, 0 meaning as soon as possible (default: 0)
    pub start_time: Option<i64>,
    /// Default: `RecurrenceKind::Single`
    pub recurrence: Option<RecurrenceKind>,
    /// Default: `StepUnit::Days`
    pub step_unit: Option<StepUnit>,
    /// Default: 1
    pub step: Option<u32>,
    /// Default when empty: {Monday}
    pub weekdays: BTreeSet<Weekday>,
}

impl BackupDraft {
    /// Create a draft with only the required fields set
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            ..Default::default()
        }
    }

    /// Set the display name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build a plan from this draft, filling unset fields with their defaults
    ///
    /// Paths are taken as given; callers normalize and validate them first.
    pub fn resolve(
        self,
        default_name: &str,
        origin: PathBuf,
        destination: PathBuf,
    ) -> BackupPlan {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name.to_string());

        let mut weekdays = self.weekdays;
        if weekdays.is_empty() {
            weekdays.insert(Weekday::Monday);
        }

        BackupPlan {
            name,
            origin,
            destination,
            trigger: self.trigger.unwrap_or_default(),
            start_time: self.start_time.unwrap_or(0),
            recurrence: self.recurrence.unwrap_or_default(),
            step_unit: self.step_unit.unwrap_or_default(),
            step: self.step.filter(|s| *s > 0).unwrap_or(1),
            weekdays,
        }
    }
}

impl From<&BackupPlan> for BackupDraft {
    fn from(plan: &BackupPlan) -> Self {
        Self {
            name: Some(plan.name.clone()),
            origin: plan.origin.to_string_lossy().into_owned(),
            destination: plan.destination.to_string_lossy().into_owned(),
            trigger: Some(plan.trigger),
            start_time: Some(plan.start_time),
            recurrence: Some(plan.recurrence),
            step_unit: Some(plan.step_unit),
            step: Some(plan.step),
            weekdays: plan.weekdays.clone(),
        }
    }
}

/// A complete, validated definition that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupPlan {
    #[serde(rename = "friendly_name")]
    pub name: String,

    #[serde(rename = "origin_folder")]
    pub origin: PathBuf,

    #[serde(rename = "destination_folder")]
    pub destination: PathBuf,

    #[serde(rename = "initiation_type")]
    pub trigger: TriggerKind,

    /// Unix timestamp; 0 means as soon as possible
    pub start_time: i64,

    #[serde(rename = "recurrence_type")]
    pub recurrence: RecurrenceKind,

    #[serde(rename = "recurrence_step_unit")]
    pub step_unit: StepUnit,

    #[serde(rename = "recurrence_step")]
    pub step: u32,

    /// Only meaningful when `step_unit` is `Weeks`
    #[serde(rename = "weekly_init_days", default)]
    pub weekdays: BTreeSet<Weekday>,
}

impl BackupPlan {
    /// True when the start time means "as soon as possible"
    pub fn starts_asap(&self) -> bool {
        self.start_time == 0
    }
}

/// A stored backup definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDefinition {
    pub id: BackupId,

    #[serde(flatten)]
    pub plan: BackupPlan,
}

impl BackupDefinition {
    pub fn new(id: BackupId, plan: BackupPlan) -> Self {
        Self { id, plan }
    }
}

impl fmt::Display for BackupDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (#{}: {} -> {})",
            self.plan.name,
            self.id,
            self.plan.origin.display(),
            self.plan.destination.display()
        )
    }
}
