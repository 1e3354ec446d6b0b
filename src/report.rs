use crate::engine::{DoseStatus, EvaluationResult};
use std::fmt::{self, Display, Formatter};

pub const GENERAL_ADVICE: &[&str] = &[
    "Always consult with your healthcare provider for personalized advice.",
    "Catch-up on any missed vaccinations as soon as possible.",
    "Keep your vaccination records up to date.",
    "Visit the NHS Vaccinations page for more information: https://www.nhs.uk/conditions/vaccinations/",
];

/// Evaluation results grouped the way they are shown: overdue first, then
/// upcoming, then everything already given. Engine order is kept within each
/// group.
#[derive(Debug, Default)]
pub struct Report<'a> {
    overdue: Vec<&'a EvaluationResult>,
    due: Vec<&'a EvaluationResult>,
    completed: Vec<&'a EvaluationResult>,
}

impl<'a> Report<'a> {
    pub fn new(results: &'a [EvaluationResult]) -> Self {
        let mut report = Self::default();
        for result in results {
            match result.status() {
                DoseStatus::Overdue => report.overdue.push(result),
                DoseStatus::Due => report.due.push(result),
                DoseStatus::Correct | DoseStatus::Early | DoseStatus::Late => {
                    report.completed.push(result)
                }
            }
        }
        report
    }

    pub fn overdue(&self) -> &[&'a EvaluationResult] {
        &self.overdue
    }

    pub fn due(&self) -> &[&'a EvaluationResult] {
        &self.due
    }

    pub fn completed(&self) -> &[&'a EvaluationResult] {
        &self.completed
    }

    pub fn is_up_to_date(&self) -> bool {
        self.overdue.is_empty()
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vaccination Status")?;
        if !self.overdue.is_empty() {
            writeln!(f, "\nOverdue Vaccinations")?;
            for result in &self.overdue {
                writeln!(f, "  ! {result}")?;
            }
        }
        if !self.due.is_empty() {
            writeln!(f, "\nUpcoming Vaccinations")?;
            for result in &self.due {
                writeln!(f, "    {result}")?;
            }
        }
        if !self.completed.is_empty() {
            writeln!(f, "\nCompleted Vaccinations")?;
            for result in &self.completed {
                let marker = match result.status() {
                    DoseStatus::Correct => "ok",
                    DoseStatus::Early => "early",
                    _ => "late",
                };
                writeln!(f, "  [{marker}] {result}")?;
            }
        }
        writeln!(f, "\nGeneral Advice")?;
        for line in GENERAL_ADVICE {
            writeln!(f, "  - {line}")?;
        }
        Ok(())
    }
}
