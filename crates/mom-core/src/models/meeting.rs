use serde::{Deserialize, Serialize};

use super::placeholder::{self, Replacements};
use crate::error::CoreError;

/// The values a user fills in to produce a set of minutes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingForm {
    pub department: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub agenda: String,
    /// Absent members, comma-separated.
    pub absent: String,
    /// Additional notes, one bullet point per line.
    pub notes: String,
}

impl MeetingForm {
    /// Every field must hold something other than whitespace.
    /// Reports the first blank field in form order.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("department", &self.department),
            ("date", &self.date),
            ("start_time", &self.start_time),
            ("end_time", &self.end_time),
            ("agenda", &self.agenda),
            ("absent", &self.absent),
            ("notes", &self.notes),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(CoreError::MissingField(name.to_string())),
            None => Ok(()),
        }
    }

    pub fn absent_members(&self) -> Vec<String> {
        self.absent
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn note_lines(&self) -> Vec<String> {
        self.notes
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validate the form and build the full placeholder mapping.
    pub fn into_replacements(self) -> Result<Replacements, CoreError> {
        self.validate()?;

        let absent = self.absent_members();
        let notes = self.note_lines();

        Ok(Replacements::new()
            .with(placeholder::DEPT, self.department)
            .with(placeholder::DATE, self.date)
            .with(placeholder::START_TIME, self.start_time)
            .with(placeholder::END_TIME, self.end_time)
            .with(placeholder::AGENDA, self.agenda)
            .with(placeholder::ABSENT, absent)
            .with(placeholder::NOTES, notes))
    }
}
