use anyhow::Result;
use jiff::{civil::Date, Span};
use std::fmt::{self, Display, Formatter};

pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a UK style `dd/mm/yyyy` date.
pub fn parse_date(text: &str) -> Result<Date> {
    Ok(Date::strptime(DATE_FORMAT, text.trim())?)
}

pub fn format_date(date: Date) -> String {
    date.strftime(DATE_FORMAT).to_string()
}

// Whole weeks from `from` to `to`, rounding towards negative infinity.
pub fn weeks_between(from: Date, to: Date) -> Result<i32> {
    let days = to.since(from)?.get_days();
    Ok(days.div_euclid(7))
}

pub fn add_weeks(date: Date, weeks: i32) -> Result<Date> {
    Ok(date.checked_add(Span::new().weeks(weeks))?)
}

/// A difference between two dates in whole calendar years and months.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct YearsMonths {
    years: i32,
    months: i32,
}

impl YearsMonths {
    pub fn new(years: i32, months: i32) -> Self {
        Self { years, months }
    }

    // Compare calendar fields rather than counting days: a month is only
    // complete once the day of the month has been reached again.
    pub fn between(from: Date, to: Date) -> Self {
        let mut years = i32::from(to.year()) - i32::from(from.year());
        let mut months = i32::from(to.month()) - i32::from(from.month());
        if to.day() < from.day() {
            months -= 1;
        }
        if months < 0 {
            years -= 1;
            months += 12;
        }
        Self { years, months }
    }

    pub fn years(&self) -> i32 {
        self.years
    }

    pub fn months(&self) -> i32 {
        self.months
    }

    /// Always spell out both units, e.g. "0 years and 3 months".
    pub fn full(&self) -> String {
        format!("{} and {}", plural(self.years, "year"), plural(self.months, "month"))
    }
}

impl Display for YearsMonths {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.years > 0 {
            write!(f, "{}", self.full())
        } else {
            write!(f, "{}", plural(self.months, "month"))
        }
    }
}

fn plural(n: i32, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChildAge {
    years: i32,
    weeks: i32,
}

impl ChildAge {
    pub fn new(date_of_birth: Date, today: Date) -> Result<Self> {
        let birthday_pending = (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day());
        let years = i32::from(today.year()) - i32::from(date_of_birth.year()) - i32::from(birthday_pending);
        Ok(Self {
            years,
            weeks: weeks_between(date_of_birth, today)?,
        })
    }

    pub fn years(&self) -> i32 {
        self.years
    }

    pub fn weeks(&self) -> i32 {
        self.weeks
    }
}

impl Display for ChildAge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} years ({} weeks)", self.years, self.weeks)
    }
}
