//! Calorie estimation for logged exercises.
//!
//! Each exercise kind has a single coefficient. The formula depends on the
//! kind's input class:
//! - Duration: `coefficient * weight * seconds`
//! - Distance + duration (running): `weight * distance * seconds / coefficient`
//! - Repetitions: `coefficient * count * weight`
//!
//! The running formula divides rather than multiplies, and its output is on
//! a very different scale from the others. That is the historical behavior
//! of the stored data and is kept as is.

use crate::types::validate_weight;
use crate::{Error, ExerciseInputs, ExerciseKind, InputClass, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Built once and shared by every caller that doesn't supply its own table
static DEFAULT_COEFFICIENTS: Lazy<CoefficientTable> = Lazy::new(CoefficientTable::default);

/// Get a reference to the reference coefficient table
pub fn default_coefficients() -> &'static CoefficientTable {
    &DEFAULT_COEFFICIENTS
}

/// Estimate energy burned using the reference coefficients
pub fn estimate_energy(
    kind: ExerciseKind,
    body_weight: f64,
    inputs: &ExerciseInputs,
) -> Result<f64> {
    default_coefficients().estimate(kind, body_weight, inputs)
}

/// Per-exercise coefficients
///
/// Every field falls back to its reference value, so a config file only
/// needs to list the ones it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTable {
    #[serde(default = "default_sprints")]
    pub sprints: f64,

    /// Divisor, not multiplier
    #[serde(default = "default_running")]
    pub running: f64,

    #[serde(default = "default_walking")]
    pub walking: f64,

    #[serde(default = "default_crunches")]
    pub crunches: f64,

    #[serde(default = "default_planks")]
    pub planks: f64,

    #[serde(default = "default_pushups")]
    pub pushups: f64,

    #[serde(default = "default_pullups")]
    pub pullups: f64,
}

impl Default for CoefficientTable {
    fn default() -> Self {
        Self {
            sprints: default_sprints(),
            running: default_running(),
            walking: default_walking(),
            crunches: default_crunches(),
            planks: default_planks(),
            pushups: default_pushups(),
            pullups: default_pullups(),
        }
    }
}

// Default value functions
fn default_sprints() -> f64 {
    0.0025
}

fn default_running() -> f64 {
    9.7
}

fn default_walking() -> f64 {
    0.000875
}

fn default_crunches() -> f64 {
    0.0015
}

fn default_planks() -> f64 {
    0.000735
}

fn default_pushups() -> f64 {
    0.0011
}

// TODO: pull-ups were never given a real coefficient, so they log zero
// energy. Replace once a tuned value exists.
fn default_pullups() -> f64 {
    0.0
}

impl CoefficientTable {
    pub fn coefficient(&self, kind: ExerciseKind) -> f64 {
        match kind {
            ExerciseKind::Sprints => self.sprints,
            ExerciseKind::Running => self.running,
            ExerciseKind::Walking => self.walking,
            ExerciseKind::Crunches => self.crunches,
            ExerciseKind::Planks => self.planks,
            ExerciseKind::Pushups => self.pushups,
            ExerciseKind::Pullups => self.pullups,
        }
    }

    /// Check that every coefficient yields a non-negative, finite estimate
    ///
    /// Returns a list of problems (empty when valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for kind in ExerciseKind::ALL {
            let value = self.coefficient(kind);
            if !value.is_finite() || value < 0.0 {
                errors.push(format!(
                    "Coefficient for {} must be a non-negative number, got {}",
                    kind, value
                ));
            }
        }

        if self.running == 0.0 {
            errors.push("Coefficient for running is a divisor and cannot be zero".into());
        }

        errors
    }

    /// Estimate energy (kcal) for one exercise submission
    ///
    /// Fails with [`Error::MissingInput`] when the kind's required input is
    /// absent, [`Error::InvalidInput`] when it is negative or not finite, and
    /// [`Error::InvalidWeight`] unless `body_weight > 0`. Inputs the kind
    /// doesn't use are ignored. The result is not rounded.
    pub fn estimate(
        &self,
        kind: ExerciseKind,
        body_weight: f64,
        inputs: &ExerciseInputs,
    ) -> Result<f64> {
        validate_weight(body_weight)?;
        let coefficient = self.coefficient(kind);

        let energy = match kind.input_class() {
            InputClass::Duration => {
                let seconds = required(kind, "duration", inputs.duration_secs)?;
                coefficient * body_weight * seconds
            }
            InputClass::DistanceDuration => {
                let seconds = required(kind, "duration", inputs.duration_secs)?;
                let distance = required(kind, "distance", inputs.distance)?;
                (body_weight * distance * seconds) / coefficient
            }
            InputClass::Repetitions => {
                let count = required(kind, "count", inputs.count)?;
                coefficient * count * body_weight
            }
        };

        tracing::debug!(
            "Estimated {:.2} kcal for {} at {} kg",
            energy,
            kind,
            body_weight
        );
        Ok(energy)
    }
}

fn required(kind: ExerciseKind, field: &str, value: Option<f64>) -> Result<f64> {
    match value {
        None => Err(Error::missing(kind, field)),
        Some(v) if !v.is_finite() || v < 0.0 => Err(Error::invalid(kind, field)),
        Some(v) => Ok(v),
    }
}
