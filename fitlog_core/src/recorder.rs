//! Mutations on a single user: logging activities and changing weight.
//!
//! Both operations persist the whole registry after the change.

use crate::registry::UserRegistry;
use crate::store::UserStore;
use crate::{ActivityRecord, Error, ExerciseKind, Result, UserRecord, WeightChange};
use chrono::{Local, NaiveDate};

impl<S: UserStore> UserRegistry<S> {
    /// Append an activity dated today (local time) to a user's history
    pub fn record(
        &mut self,
        identifier: &str,
        kind: ExerciseKind,
        energy_kcal: f64,
    ) -> Result<&UserRecord> {
        let today = Local::now().date_naive();
        self.record_on(identifier, today, kind, energy_kcal)
    }

    /// Append an activity with an explicit date
    ///
    /// Energy must be a finite, non-negative number, which every
    /// estimator output is.
    pub fn record_on(
        &mut self,
        identifier: &str,
        date: NaiveDate,
        kind: ExerciseKind,
        energy_kcal: f64,
    ) -> Result<&UserRecord> {
        if !energy_kcal.is_finite() || energy_kcal < 0.0 {
            return Err(Error::invalid(kind, "energy"));
        }

        let user = self.find_user_mut(identifier)?;
        user.push_activity(ActivityRecord::new(date, kind, energy_kcal));
        tracing::debug!(
            "Recorded {} ({:.2} kcal) on {} for {:?}",
            kind,
            energy_kcal,
            date,
            identifier
        );

        self.persist()?;
        self.find_user(identifier)
    }

    /// Overwrite a user's body weight
    ///
    /// Returns the previous and new weight so the caller can tell the user
    /// how they are doing. Fails with [`Error::InvalidWeight`] (leaving the
    /// weight untouched) unless `new_weight > 0`.
    pub fn change_weight(&mut self, identifier: &str, new_weight: f64) -> Result<WeightChange> {
        let user = self.find_user_mut(identifier)?;
        let previous = user.set_body_weight(new_weight)?;

        tracing::info!(
            "Weight for {:?} changed from {} to {} kg",
            identifier,
            previous,
            new_weight
        );

        self.persist()?;
        Ok(WeightChange {
            previous,
            current: new_weight,
        })
    }
}
