#![warn(clippy::all, rust_2018_idioms)]

mod calendar;
mod engine;
mod record;
mod report;
mod schedule;

pub use calendar::{add_weeks, format_date, parse_date, weeks_between, ChildAge, YearsMonths};
pub use engine::{evaluate, Administered, DoseStatus, EvaluationResult};
pub use record::{ChildRecord, RecordForm, ValidationError};
pub use report::{Report, GENERAL_ADVICE};
pub use schedule::{Dependency, DoseSpec, SeriesKind, Vaccine};
