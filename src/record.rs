//! The child's record as entered, and the checks it must pass before it is
//! evaluated.
//!
//! Dates are entered as `dd/mm/yyyy` text. A blank entry means the dose has not
//! been given. Text that is not a valid date is an error for that field; it is
//! never treated as a missing dose.

use crate::{
    calendar::{format_date, parse_date, ChildAge},
    engine::{evaluate, Administered, EvaluationResult},
    schedule::SeriesKind,
};
use anyhow::Result;
use jiff::{civil::Date, Span};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// How far back a date of birth may go.
pub const MAX_AGE_DAYS: i32 = 365 * 20;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("{field}: '{input}' is not a valid date, expected dd/mm/yyyy")]
    Unparseable { field: String, input: String },

    #[error("Date of birth cannot be in the future.")]
    BirthInFuture { date: Date },

    #[error("Date of birth cannot be more than 20 years ago.")]
    BirthTooOld { date: Date },

    #[error("{series} - Dose {dose}: Vaccination date cannot be before the date of birth.")]
    DoseBeforeBirth { series: SeriesKind, dose: u8, date: Date },

    #[error("{series} - Dose {dose}: Vaccination date cannot be in the future.")]
    DoseInFuture { series: SeriesKind, dose: u8, date: Date },

    #[error("{series}: {given} doses entered but the schedule only has {expected}")]
    TooManyDoses { series: SeriesKind, given: usize, expected: usize },
}

/// The record form as typed in, before any parsing.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecordForm {
    date_of_birth: String,
    doses: BTreeMap<SeriesKind, Vec<Option<String>>>,
}

impl RecordForm {
    pub fn new(date_of_birth: &str) -> Self {
        Self {
            date_of_birth: date_of_birth.to_owned(),
            doses: BTreeMap::new(),
        }
    }

    /// A form with one empty slot for every dose in the schedule.
    pub fn blank(date_of_birth: &str) -> Self {
        let mut form = Self::new(date_of_birth);
        for series in SeriesKind::all() {
            form.doses
                .insert(*series, vec![None; series.vaccine().doses().len()]);
        }
        form
    }

    pub fn from_ron(data: &str) -> Result<Self> {
        Ok(ron::from_str(data)?)
    }

    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn set_dose(&mut self, series: SeriesKind, dose: u8, date: Option<&str>) {
        if dose == 0 {
            return;
        }
        let slots = self.doses.entry(series).or_default();
        let index = usize::from(dose) - 1;
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = date.map(str::to_owned);
    }

    /// Parse and check every field, collecting all problems rather than
    /// stopping at the first.
    pub fn validate(&self, today: Date) -> Result<ChildRecord, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let date_of_birth = match parse_date(&self.date_of_birth) {
            Ok(dob) => Some(dob),
            Err(_) => {
                errors.push(ValidationError::Unparseable {
                    field: "Date of birth".to_owned(),
                    input: self.date_of_birth.clone(),
                });
                None
            }
        };
        if let Some(dob) = date_of_birth {
            if dob > today {
                errors.push(ValidationError::BirthInFuture { date: dob });
            } else if today
                .checked_sub(Span::new().days(MAX_AGE_DAYS))
                .is_ok_and(|earliest| dob < earliest)
            {
                errors.push(ValidationError::BirthTooOld { date: dob });
            }
        }

        let mut administered = Administered::new();
        for (series, entries) in &self.doses {
            let expected = series.vaccine().doses().len();
            if entries.len() > expected {
                errors.push(ValidationError::TooManyDoses {
                    series: *series,
                    given: entries.len(),
                    expected,
                });
                continue;
            }
            // Only used when every entry is valid, so slots cannot shift.
            let mut dates = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                // Bounded by the schedule length above.
                let dose = (i + 1) as u8;
                let text = match entry.as_deref().map(str::trim) {
                    Some(text) if !text.is_empty() => text,
                    _ => {
                        dates.push(None);
                        continue;
                    }
                };
                match parse_date(text) {
                    Ok(date) if date_of_birth.is_some_and(|dob| date < dob) => {
                        errors.push(ValidationError::DoseBeforeBirth { series: *series, dose, date });
                    }
                    Ok(date) if date > today => {
                        errors.push(ValidationError::DoseInFuture { series: *series, dose, date });
                    }
                    Ok(date) => dates.push(Some(date)),
                    Err(_) => errors.push(ValidationError::Unparseable {
                        field: format!("{series} - Dose {dose}"),
                        input: text.to_owned(),
                    }),
                }
            }
            administered.set_series(*series, dates);
        }

        match date_of_birth {
            Some(date_of_birth) if errors.is_empty() => Ok(ChildRecord {
                date_of_birth,
                administered,
            }),
            _ => {
                log::debug!("record rejected with {} errors", errors.len());
                Err(errors)
            }
        }
    }
}

/// A validated record, ready to evaluate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChildRecord {
    date_of_birth: Date,
    administered: Administered,
}

impl ChildRecord {
    pub fn new(date_of_birth: Date, administered: Administered) -> Self {
        Self {
            date_of_birth,
            administered,
        }
    }

    pub fn date_of_birth(&self) -> Date {
        self.date_of_birth
    }

    pub fn administered(&self) -> &Administered {
        &self.administered
    }

    pub fn age(&self, today: Date) -> Result<ChildAge> {
        ChildAge::new(self.date_of_birth, today)
    }

    pub fn evaluate(&self, today: Date) -> Result<Vec<EvaluationResult>> {
        log::info!(
            "checking record for child born {} as of {}",
            format_date(self.date_of_birth),
            format_date(today)
        );
        evaluate(self.date_of_birth, today, &self.administered)
    }
}
