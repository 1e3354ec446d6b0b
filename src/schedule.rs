use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Display, Formatter},
    sync::OnceLock,
};

// The series of the UK routine childhood schedule, in table order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum SeriesKind {
    SixInOne,
    Pneumococcal,
    Rotavirus,
    MenB,
    HibMenC,
    Mmr,
    PreSchoolBooster,
    TeenageBooster,
    MenAcwy,
}

impl SeriesKind {
    pub fn all() -> &'static [SeriesKind] {
        &[
            Self::SixInOne,
            Self::Pneumococcal,
            Self::Rotavirus,
            Self::MenB,
            Self::HibMenC,
            Self::Mmr,
            Self::PreSchoolBooster,
            Self::TeenageBooster,
            Self::MenAcwy,
        ]
    }

    pub fn vaccine(&self) -> &'static Vaccine {
        Vaccine::get(*self)
    }
}

impl Display for SeriesKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vaccine().name())
    }
}

/// One dose of a series. All offsets are in whole weeks since birth, except
/// `min_interval`, which is measured from the previous dose (or from birth for
/// the first dose).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DoseSpec {
    dose: u8,
    age_weeks: i32,
    min_interval: i32,
    max_interval: i32,
    cutoff_weeks: Option<i32>,
}

impl DoseSpec {
    fn new(dose: u8, age_weeks: i32, min_interval: i32, max_interval: i32) -> Self {
        Self {
            dose,
            age_weeks,
            min_interval,
            max_interval,
            cutoff_weeks: None,
        }
    }

    // A hard age limit; a dose given at or after it is always late.
    fn with_cutoff(mut self, weeks: i32) -> Self {
        self.cutoff_weeks = Some(weeks);
        self
    }

    pub fn dose(&self) -> u8 {
        self.dose
    }

    pub fn age_weeks(&self) -> i32 {
        self.age_weeks
    }

    pub fn min_interval(&self) -> i32 {
        self.min_interval
    }

    /// Latest acceptable age in weeks since birth (not since the previous dose).
    pub fn max_interval(&self) -> i32 {
        self.max_interval
    }

    pub fn cutoff_weeks(&self) -> Option<i32> {
        self.cutoff_weeks
    }
}

impl Display for DoseSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dose {} at {} weeks (window {}-{} weeks",
            self.dose, self.age_weeks, self.age_weeks, self.max_interval
        )?;
        if self.min_interval > 0 {
            write!(f, ", at least {} weeks after the previous dose", self.min_interval)?;
        }
        if let Some(cutoff) = self.cutoff_weeks {
            write!(f, ", before {cutoff} weeks")?;
        }
        write!(f, ")")
    }
}

/// A dose of this series must come a minimum number of weeks after a dose of
/// another series.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Dependency {
    series: SeriesKind,
    dose: u8,
    min_weeks: i32,
}

impl Dependency {
    pub fn series(&self) -> SeriesKind {
        self.series
    }

    pub fn dose(&self) -> u8 {
        self.dose
    }

    pub fn min_weeks(&self) -> i32 {
        self.min_weeks
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Vaccine {
    kind: SeriesKind,
    name: &'static str,
    short_name: &'static str,
    protects: &'static str,
    doses: Vec<DoseSpec>,
    after: Option<Dependency>,
}

impl Vaccine {
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short_name(&self) -> &'static str {
        self.short_name
    }

    pub fn protects(&self) -> &'static str {
        self.protects
    }

    pub fn doses(&self) -> &[DoseSpec] {
        &self.doses
    }

    pub fn dose(&self, number: u8) -> Option<&DoseSpec> {
        self.doses.iter().find(|spec| spec.dose == number)
    }

    pub fn after(&self) -> Option<&Dependency> {
        self.after.as_ref()
    }

    pub fn get(kind: SeriesKind) -> &'static Vaccine {
        &Self::all()[kind as usize]
    }

    pub fn by_name(name: &str) -> Option<&'static Vaccine> {
        Self::all().iter().find(|v| v.name == name)
    }

    pub fn all() -> &'static [Vaccine] {
        static VACCINES: OnceLock<Vec<Vaccine>> = OnceLock::new();
        VACCINES.get_or_init(|| vec![
            Vaccine {
                kind: SeriesKind::SixInOne,
                name: "DTaP/IPV/Hib/HepB (6-in-1)",
                short_name: "DTaP/IPV/Hib/HepB",
                protects: "Protects against diphtheria, tetanus, pertussis, polio, Haemophilus influenzae type b and hepatitis B.",
                doses: vec![DoseSpec::new(1, 8, 0, 12), DoseSpec::new(2, 12, 4, 16), DoseSpec::new(3, 16, 4, 24)],
                after: None,
            },
            Vaccine {
                kind: SeriesKind::Pneumococcal,
                name: "PCV (Pneumococcal)",
                short_name: "PCV",
                protects: "Protects against pneumococcal infections.",
                doses: vec![DoseSpec::new(1, 12, 0, 16), DoseSpec::new(2, 52, 40, 60)],
                after: None,
            },
            Vaccine {
                kind: SeriesKind::Rotavirus,
                name: "Rotavirus",
                short_name: "Rotavirus",
                protects: "Protects against rotavirus infection, a common cause of childhood diarrhea.",
                doses: vec![
                    DoseSpec::new(1, 8, 0, 15).with_cutoff(15),
                    DoseSpec::new(2, 12, 4, 24).with_cutoff(24),
                ],
                after: None,
            },
            Vaccine {
                kind: SeriesKind::MenB,
                name: "MenB",
                short_name: "MenB",
                protects: "Protects against meningococcal group B bacteria, a major cause of meningitis and septicemia.",
                doses: vec![DoseSpec::new(1, 8, 0, 12), DoseSpec::new(2, 16, 8, 24), DoseSpec::new(3, 52, 36, 60)],
                after: None,
            },
            Vaccine {
                kind: SeriesKind::HibMenC,
                name: "Hib/MenC",
                short_name: "Hib/MenC",
                protects: "Protects against Haemophilus influenzae type b and meningococcal group C bacteria.",
                doses: vec![DoseSpec::new(1, 52, 0, 60)],
                after: None,
            },
            Vaccine {
                kind: SeriesKind::Mmr,
                name: "MMR",
                short_name: "MMR",
                protects: "Protects against measles, mumps, and rubella.",
                doses: vec![DoseSpec::new(1, 52, 0, 60), DoseSpec::new(2, 156, 104, 208)],
                after: None,
            },
            Vaccine {
                kind: SeriesKind::PreSchoolBooster,
                name: "DTaP/IPV (4-in-1 pre-school booster)",
                short_name: "DTaP/IPV",
                protects: "Booster for diphtheria, tetanus, pertussis, and polio.",
                doses: vec![DoseSpec::new(1, 156, 52, 208)],
                after: Some(Dependency { series: SeriesKind::SixInOne, dose: 3, min_weeks: 52 }),
            },
            // 13-14 years
            Vaccine {
                kind: SeriesKind::TeenageBooster,
                name: "Td/IPV (Teenage booster)",
                short_name: "Td/IPV",
                protects: "Teenage booster for tetanus, diphtheria, and polio.",
                doses: vec![DoseSpec::new(1, 702, 0, 780)],
                after: None,
            },
            Vaccine {
                kind: SeriesKind::MenAcwy,
                name: "MenACWY",
                short_name: "MenACWY",
                protects: "Protects against meningococcal groups A, C, W, and Y.",
                doses: vec![DoseSpec::new(1, 702, 0, 780)],
                after: None,
            },
        ])
    }
}

impl Display for Vaccine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.protects)
    }
}

// Spell out dose numbers for messages: "First dose", "the third dose".
pub fn ordinal(dose: u8) -> &'static str {
    match dose {
        1 => "First",
        2 => "Second",
        3 => "Third",
        4 => "Fourth",
        _ => "Later",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_kinds() {
        for (i, kind) in SeriesKind::all().iter().enumerate() {
            assert_eq!(*kind, Vaccine::all()[i].kind());
            assert_eq!(*kind, Vaccine::get(*kind).kind());
        }
        assert_eq!(SeriesKind::all().len(), Vaccine::all().len());
    }

    #[test]
    fn test_doses_are_contiguous_and_ordered() {
        for vaccine in Vaccine::all() {
            for (i, spec) in vaccine.doses().iter().enumerate() {
                assert_eq!(i + 1, usize::from(spec.dose()), "{}", vaccine.name());
                assert!(spec.age_weeks() <= spec.max_interval(), "{}", vaccine.name());
            }
            assert!(vaccine
                .doses()
                .windows(2)
                .all(|w| w[0].age_weeks() < w[1].age_weeks()));
        }
    }

    #[test]
    fn test_lookup() {
        let mmr = Vaccine::by_name("MMR").unwrap();
        assert_eq!(SeriesKind::Mmr, mmr.kind());
        assert_eq!(156, mmr.dose(2).unwrap().age_weeks());
        assert_eq!(104, mmr.dose(2).unwrap().min_interval());
        assert!(mmr.dose(3).is_none());
        assert!(Vaccine::by_name("Smallpox").is_none());
    }

    #[test]
    fn test_special_rules() {
        let rota = SeriesKind::Rotavirus.vaccine();
        assert_eq!(Some(15), rota.dose(1).unwrap().cutoff_weeks());
        assert_eq!(Some(24), rota.dose(2).unwrap().cutoff_weeks());

        let booster = SeriesKind::PreSchoolBooster.vaccine().after().unwrap();
        assert_eq!(SeriesKind::SixInOne, booster.series());
        assert_eq!(3, booster.dose());
        assert_eq!(52, booster.min_weeks());
        assert!(SeriesKind::all()
            .iter()
            .filter(|k| **k != SeriesKind::PreSchoolBooster)
            .all(|k| k.vaccine().after().is_none()));
    }

    #[test]
    fn test_display() {
        assert_eq!("MenB", SeriesKind::MenB.to_string());
        assert_eq!(
            "Dose 2 at 16 weeks (window 16-24 weeks, at least 8 weeks after the previous dose)",
            SeriesKind::MenB.vaccine().dose(2).unwrap().to_string()
        );
        assert_eq!(
            "Dose 1 at 8 weeks (window 8-15 weeks, before 15 weeks)",
            SeriesKind::Rotavirus.vaccine().dose(1).unwrap().to_string()
        );
    }
}
