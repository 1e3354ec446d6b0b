use crate::{
    calendar::{add_weeks, weeks_between, YearsMonths},
    schedule::{ordinal, DoseSpec, SeriesKind, Vaccine},
};
use anyhow::Result;
use itertools::Itertools;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Correct,
    Early,
    Late,
    Due,
    Overdue,
}

impl DoseStatus {
    /// True for doses that were actually given.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Correct | Self::Early | Self::Late)
    }
}

impl Display for DoseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::Early => write!(f, "early"),
            Self::Late => write!(f, "late"),
            Self::Due => write!(f, "due"),
            Self::Overdue => write!(f, "overdue"),
        }
    }
}

/// Dates of administered doses, one slot per dose number. A `None` slot, or a
/// missing trailing slot, means the dose has not been given.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Administered {
    doses: HashMap<SeriesKind, Vec<Option<Date>>>,
}

impl Administered {
    pub fn new() -> Self {
        Self::default()
    }

    // Store the date (or absence) of a 1-based dose, padding earlier slots.
    pub fn record(&mut self, series: SeriesKind, dose: u8, date: Option<Date>) {
        if dose == 0 {
            return;
        }
        let slots = self.doses.entry(series).or_default();
        let index = usize::from(dose) - 1;
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = date;
    }

    pub fn set_series(&mut self, series: SeriesKind, dates: Vec<Option<Date>>) {
        self.doses.insert(series, dates);
    }

    pub fn doses(&self, series: SeriesKind) -> &[Option<Date>] {
        self.doses.get(&series).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dose(&self, series: SeriesKind, dose: u8) -> Option<Date> {
        let index = usize::from(dose).checked_sub(1)?;
        self.doses(series).get(index).copied().flatten()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct EvaluationResult {
    series: SeriesKind,
    dose: u8,
    status: DoseStatus,
    message: String,
}

impl EvaluationResult {
    pub fn series(&self) -> SeriesKind {
        self.series
    }

    pub fn dose(&self) -> u8 {
        self.dose
    }

    pub fn status(&self) -> DoseStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for EvaluationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.series, self.message)
    }
}

// A dose that should already have been given. These are held back until every
// series has been walked and reported together at the end.
#[derive(Clone, Debug)]
struct OverdueCandidate {
    series: SeriesKind,
    dose: u8,
    overdue_by: YearsMonths,
    min_interval: i32,
}

/// Classify every dose of every series against the schedule.
///
/// Results come in table order, one series after another, with given and due
/// doses in dose order. Overdue doses for all series follow at the end.
pub fn evaluate(
    date_of_birth: Date,
    today: Date,
    administered: &Administered,
) -> Result<Vec<EvaluationResult>> {
    let mut results = Vec::new();
    let mut overdue = Vec::new();

    for vaccine in Vaccine::all() {
        let given_dates = administered.doses(vaccine.kind());
        let mut prev_dose_date: Option<Date> = None;
        for spec in vaccine.doses() {
            let index = usize::from(spec.dose()) - 1;
            match given_dates.get(index).copied().flatten() {
                Some(given_date) => {
                    results.push(check_given_dose(
                        vaccine,
                        spec,
                        date_of_birth,
                        given_date,
                        prev_dose_date,
                        administered,
                    )?);
                    prev_dose_date = Some(given_date);
                }
                None => {
                    let expected = add_weeks(date_of_birth, spec.age_weeks())?;
                    if expected <= today {
                        log::debug!("{} dose {} expected {expected}, overdue", vaccine.name(), spec.dose());
                        overdue.push(OverdueCandidate {
                            series: vaccine.kind(),
                            dose: spec.dose(),
                            overdue_by: YearsMonths::between(expected, today),
                            min_interval: spec.min_interval(),
                        });
                    } else {
                        log::debug!("{} dose {} expected {expected}, due", vaccine.name(), spec.dose());
                        results.push(EvaluationResult {
                            series: vaccine.kind(),
                            dose: spec.dose(),
                            status: DoseStatus::Due,
                            message: format!(
                                "Dose {} is due at {} weeks old",
                                spec.dose(),
                                spec.age_weeks()
                            ),
                        });
                    }
                }
            }
        }
    }

    results.extend(flush_overdue(&overdue));
    Ok(results)
}

// Checks run in a fixed order: the hard cutoff, then the age window, then the
// interval since the previous dose, then any cross-series dependency. Each
// check that fires adds a message and overwrites the status, so the last one
// to fire decides the final status.
fn check_given_dose(
    vaccine: &Vaccine,
    spec: &DoseSpec,
    date_of_birth: Date,
    given_date: Date,
    prev_dose_date: Option<Date>,
    administered: &Administered,
) -> Result<EvaluationResult> {
    let given_age_weeks = weeks_between(date_of_birth, given_date)?;
    let mut status = DoseStatus::Correct;
    let mut messages = Vec::new();

    if let Some(cutoff) = spec.cutoff_weeks() {
        if given_age_weeks >= cutoff {
            status = DoseStatus::Late;
            messages.push(format!(
                "{} dose given at {given_age_weeks} weeks. Should be given before {cutoff} weeks.",
                ordinal(spec.dose())
            ));
        }
    }

    let target = add_weeks(date_of_birth, spec.age_weeks())?;
    if given_age_weeks < spec.age_weeks() {
        status = DoseStatus::Early;
        messages.push(format!("Given {} early", YearsMonths::between(given_date, target)));
    } else if given_age_weeks > spec.max_interval() {
        status = DoseStatus::Late;
        messages.push(format!("Given {} late", YearsMonths::between(target, given_date)));
    }

    if let Some(prev) = prev_dose_date {
        let weeks_since_prev = weeks_between(prev, given_date)?;
        if weeks_since_prev < spec.min_interval() {
            status = DoseStatus::Early;
            messages.push(format!(
                "Interval too short: {weeks_since_prev} weeks (min {})",
                spec.min_interval()
            ));
        }
    }

    if let Some(dependency) = vaccine.after() {
        if let Some(earlier) = administered.dose(dependency.series(), dependency.dose()) {
            let weeks_since = weeks_between(earlier, given_date)?;
            if weeks_since < dependency.min_weeks() {
                status = DoseStatus::Early;
                messages.push(format!(
                    "Given only {weeks_since} weeks after the {} dose of {}. Should be at least {}.",
                    ordinal(dependency.dose()).to_lowercase(),
                    dependency.series().vaccine().short_name(),
                    describe_weeks(dependency.min_weeks()),
                ));
            }
        }
    }

    let mut message = format!("Dose {} given at {given_age_weeks} weeks. ", spec.dose());
    if messages.is_empty() {
        message.push_str("Timing correct.");
    } else {
        message.push_str(&messages.iter().join(" "));
    }
    log::debug!("{} dose {}: {status}", vaccine.name(), spec.dose());

    Ok(EvaluationResult {
        series: vaccine.kind(),
        dose: spec.dose(),
        status,
        message,
    })
}

fn flush_overdue(candidates: &[OverdueCandidate]) -> Vec<EvaluationResult> {
    let mut results = Vec::with_capacity(candidates.len());
    for (series, group) in &candidates.iter().chunk_by(|c| c.series) {
        for (i, candidate) in group.enumerate() {
            let message = if i == 0 {
                format!(
                    "Dose {} is overdue by {}. Should be given immediately.",
                    candidate.dose,
                    candidate.overdue_by.full()
                )
            } else {
                format!(
                    "Dose {} is overdue. Should be given {} weeks after the previous dose.",
                    candidate.dose, candidate.min_interval
                )
            };
            results.push(EvaluationResult {
                series,
                dose: candidate.dose,
                status: DoseStatus::Overdue,
                message,
            });
        }
    }
    results
}

fn describe_weeks(weeks: i32) -> String {
    match weeks {
        52 => "1 year".to_owned(),
        w if w > 0 && w % 52 == 0 => format!("{} years", w / 52),
        w => format!("{w} weeks"),
    }
}
