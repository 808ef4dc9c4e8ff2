//! CSV export of a user's activity history.

use crate::{ActivityRecord, Result, UserRecord};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    exercise: &'static str,
    energy_kcal: f64,
}

impl From<&ActivityRecord> for CsvRow {
    fn from(activity: &ActivityRecord) -> Self {
        CsvRow {
            date: activity.date().to_string(),
            exercise: activity.kind().as_str(),
            energy_kcal: activity.energy_kcal(),
        }
    }
}

/// Write a user's whole history to `csv_path`, replacing any existing file
///
/// Returns the number of rows written. An empty history still produces a
/// header row.
pub fn export_history(user: &UserRecord, csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(csv_path)?;
    if user.history().is_empty() {
        writer.write_record(["date", "exercise", "energy_kcal"])?;
    }
    for activity in user.history() {
        writer.serialize(CsvRow::from(activity))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!(
        "Exported {} activities for {:?} to {:?}",
        user.history().len(),
        user.identifier(),
        csv_path
    );
    Ok(user.history().len())
}
