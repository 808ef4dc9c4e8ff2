//! Core domain types for the fitlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise kinds and the inputs each kind requires
//! - Activity records (one per logged exercise)
//! - User records (identifier, body weight, activity history)

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Exercise Types
// ============================================================================

/// Kind of exercise a user can log
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Sprints,
    Running,
    Walking,
    Crunches,
    Planks,
    Pushups,
    Pullups,
}

/// Shape of the inputs an exercise kind needs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputClass {
    /// Needs a duration in seconds
    Duration,
    /// Needs a duration in seconds and a distance
    DistanceDuration,
    /// Needs a repetition count
    Repetitions,
}

impl ExerciseKind {
    /// Every kind, in the order they are presented to users
    pub const ALL: [ExerciseKind; 7] = [
        ExerciseKind::Sprints,
        ExerciseKind::Running,
        ExerciseKind::Walking,
        ExerciseKind::Crunches,
        ExerciseKind::Planks,
        ExerciseKind::Pushups,
        ExerciseKind::Pullups,
    ];

    /// Canonical name, as stored in the users file
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Sprints => "sprints",
            ExerciseKind::Running => "running",
            ExerciseKind::Walking => "walking",
            ExerciseKind::Crunches => "crunches",
            ExerciseKind::Planks => "planks",
            ExerciseKind::Pushups => "pushups",
            ExerciseKind::Pullups => "pullups",
        }
    }

    pub fn input_class(&self) -> InputClass {
        match self {
            ExerciseKind::Sprints | ExerciseKind::Walking | ExerciseKind::Planks => {
                InputClass::Duration
            }
            ExerciseKind::Running => InputClass::DistanceDuration,
            ExerciseKind::Crunches | ExerciseKind::Pushups | ExerciseKind::Pullups => {
                InputClass::Repetitions
            }
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExerciseKind {
    type Err = Error;

    /// Parse an exercise name (case-insensitive, common spellings accepted)
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();

        match normalized.as_str() {
            "sprints" | "sprint" | "sprinting" => Ok(ExerciseKind::Sprints),
            "running" | "run" => Ok(ExerciseKind::Running),
            "walking" | "walk" => Ok(ExerciseKind::Walking),
            "crunches" | "crunch" => Ok(ExerciseKind::Crunches),
            "planks" | "plank" | "planking" => Ok(ExerciseKind::Planks),
            "pushups" | "pushup" => Ok(ExerciseKind::Pushups),
            "pullups" | "pullup" => Ok(ExerciseKind::Pullups),
            _ => Err(Error::UnknownExercise(s.to_string())),
        }
    }
}

/// Raw measurements submitted with an exercise
///
/// Which fields are required depends on the kind's [`InputClass`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExerciseInputs {
    /// Duration in seconds
    pub duration_secs: Option<f64>,
    pub distance: Option<f64>,
    /// Repetition count
    pub count: Option<f64>,
}

impl ExerciseInputs {
    pub fn duration(seconds: f64) -> Self {
        Self {
            duration_secs: Some(seconds),
            ..Self::default()
        }
    }

    pub fn count(reps: f64) -> Self {
        Self {
            count: Some(reps),
            ..Self::default()
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

// ============================================================================
// Activity and User Types
// ============================================================================

/// On-disk shape of an activity: `[date, exercise, energy]`
type ActivityTuple = (NaiveDate, ExerciseKind, f64);

/// One logged exercise in a user's history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActivityTuple", into = "ActivityTuple")]
pub struct ActivityRecord {
    date: NaiveDate,
    kind: ExerciseKind,
    energy_kcal: f64,
}

impl ActivityRecord {
    pub(crate) fn new(date: NaiveDate, kind: ExerciseKind, energy_kcal: f64) -> Self {
        Self {
            date,
            kind,
            energy_kcal,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    /// Energy burned in kilocalories (unrounded)
    pub fn energy_kcal(&self) -> f64 {
        self.energy_kcal
    }
}

impl From<ActivityTuple> for ActivityRecord {
    fn from((date, kind, energy_kcal): ActivityTuple) -> Self {
        Self::new(date, kind, energy_kcal)
    }
}

impl From<ActivityRecord> for ActivityTuple {
    fn from(record: ActivityRecord) -> Self {
        (record.date, record.kind, record.energy_kcal)
    }
}

/// A registered user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "username")]
    identifier: String,
    #[serde(rename = "weight")]
    body_weight: f64,
    #[serde(rename = "activities", default)]
    history: Vec<ActivityRecord>,
}

impl UserRecord {
    /// Create a user with an empty history
    ///
    /// Fails with [`Error::InvalidWeight`] unless `body_weight > 0`.
    pub fn new(identifier: impl Into<String>, body_weight: f64) -> Result<Self> {
        validate_weight(body_weight)?;
        Ok(Self {
            identifier: identifier.into(),
            body_weight,
            history: Vec::new(),
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Body weight in kilograms
    pub fn body_weight(&self) -> f64 {
        self.body_weight
    }

    /// Activity history, oldest first
    pub fn history(&self) -> &[ActivityRecord] {
        &self.history
    }

    /// Sum of energy over the whole history
    pub fn total_energy(&self) -> f64 {
        self.history.iter().map(ActivityRecord::energy_kcal).sum()
    }

    pub(crate) fn push_activity(&mut self, record: ActivityRecord) {
        self.history.push(record);
    }

    /// Remove activities with negative or non-finite energy, returning how many
    pub(crate) fn drop_invalid_activities(&mut self) -> usize {
        let before = self.history.len();
        self.history
            .retain(|activity| activity.energy_kcal.is_finite() && activity.energy_kcal >= 0.0);
        before - self.history.len()
    }

    /// Overwrite the weight, returning the previous value
    pub(crate) fn set_body_weight(&mut self, body_weight: f64) -> Result<f64> {
        validate_weight(body_weight)?;
        Ok(std::mem::replace(&mut self.body_weight, body_weight))
    }
}

/// Outcome of a weight change, kept so callers can compare old and new
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightChange {
    pub previous: f64,
    pub current: f64,
}

impl WeightChange {
    /// Positive when the user gained weight
    pub fn difference(&self) -> f64 {
        self.current - self.previous
    }
}

pub(crate) fn validate_weight(body_weight: f64) -> Result<()> {
    // NaN fails this comparison too
    if body_weight > 0.0 && body_weight.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidWeight(body_weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exercise_kinds() {
        assert_eq!("running".parse::<ExerciseKind>().unwrap(), ExerciseKind::Running);
        assert_eq!("PUSHUPS".parse::<ExerciseKind>().unwrap(), ExerciseKind::Pushups);
        assert_eq!("push-ups".parse::<ExerciseKind>().unwrap(), ExerciseKind::Pushups);
        assert_eq!("pull_ups".parse::<ExerciseKind>().unwrap(), ExerciseKind::Pullups);
        assert_eq!("planking".parse::<ExerciseKind>().unwrap(), ExerciseKind::Planks);
        assert_eq!("Sprinting".parse::<ExerciseKind>().unwrap(), ExerciseKind::Sprints);

        match "swimming".parse::<ExerciseKind>() {
            Err(Error::UnknownExercise(name)) => assert_eq!(name, "swimming"),
            other => panic!("Expected UnknownExercise, got {:?}", other),
        }
    }

    #[test]
    fn test_display_matches_parse() {
        for kind in ExerciseKind::ALL {
            assert_eq!(kind.to_string().parse::<ExerciseKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_input_classes() {
        assert_eq!(ExerciseKind::Walking.input_class(), InputClass::Duration);
        assert_eq!(ExerciseKind::Running.input_class(), InputClass::DistanceDuration);
        assert_eq!(ExerciseKind::Crunches.input_class(), InputClass::Repetitions);
    }

    #[test]
    fn test_new_user_rejects_bad_weight() {
        assert!(matches!(UserRecord::new("bob", 0.0), Err(Error::InvalidWeight(_))));
        assert!(matches!(UserRecord::new("bob", -5.0), Err(Error::InvalidWeight(_))));
        assert!(matches!(UserRecord::new("bob", f64::NAN), Err(Error::InvalidWeight(_))));

        let user = UserRecord::new("bob", 80.5).unwrap();
        assert_eq!(user.identifier(), "bob");
        assert_eq!(user.body_weight(), 80.5);
        assert!(user.history().is_empty());
    }

    #[test]
    fn test_user_json_shape() {
        let mut user = UserRecord::new("alice", 70.0).unwrap();
        user.push_activity(ActivityRecord::new(
            NaiveDate::from_ymd_opt(2021, 7, 27).unwrap(),
            ExerciseKind::Pushups,
            1.54,
        ));

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "username": "alice",
                "weight": 70.0,
                "activities": [["2021-07-27", "pushups", 1.54]]
            })
        );
    }

    #[test]
    fn test_total_energy() {
        let mut user = UserRecord::new("alice", 70.0).unwrap();
        let date = NaiveDate::from_ymd_opt(2021, 7, 27).unwrap();
        user.push_activity(ActivityRecord::new(date, ExerciseKind::Walking, 100.0));
        user.push_activity(ActivityRecord::new(date, ExerciseKind::Crunches, 2.5));
        assert!((user.total_energy() - 102.5).abs() < 1e-9);
    }
}
