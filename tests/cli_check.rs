use std::{fs, process::Command};

use tempfile::tempdir;
use vaccine_checker::{DoseStatus, EvaluationResult, SeriesKind};

const RECORD: &str = r#"(
    date_of_birth: "01/01/2023",
    doses: {
        SixInOne: [Some("01/03/2023"), Some("01/04/2023")],
        Rotavirus: [Some("01/05/2023")],
    },
)"#;

#[test]
fn test_check_ron_output() {
    let dir = tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_vaccine_checker");
    let record = dir.path().join("child.ron");
    fs::write(&record, RECORD).unwrap();

    let output = Command::new(bin)
        .arg("check")
        .arg(&record)
        .args(["--today", "01/06/2025", "--ron"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let results: Vec<EvaluationResult> = ron::from_str(&stdout).unwrap();
    let status = |series, dose| {
        results
            .iter()
            .find(|r| r.series() == series && r.dose() == dose)
            .map(|r| r.status())
    };
    assert_eq!(Some(DoseStatus::Correct), status(SeriesKind::SixInOne, 1));
    assert_eq!(Some(DoseStatus::Correct), status(SeriesKind::SixInOne, 2));
    assert_eq!(Some(DoseStatus::Overdue), status(SeriesKind::SixInOne, 3));
    // Given at 17 weeks, past the 15 week limit.
    assert_eq!(Some(DoseStatus::Late), status(SeriesKind::Rotavirus, 1));
    assert_eq!(Some(DoseStatus::Due), status(SeriesKind::Mmr, 2));
    assert!(!stdout.contains("General Advice"));
}

#[test]
fn test_check_rejects_bad_record() {
    let dir = tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_vaccine_checker");
    let record = dir.path().join("child.ron");
    fs::write(
        &record,
        r#"(
            date_of_birth: "01/01/2023",
            doses: {
                MenB: [Some("31/12/2022"), Some("not a date")],
            },
        )"#,
    )
    .unwrap();

    let output = Command::new(bin)
        .arg("check")
        .arg(&record)
        .args(["--today", "01/06/2025"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("MenB - Dose 1: Vaccination date cannot be before the date of birth."),
        "got:\n{}",
        stderr
    );
    assert!(stderr.contains("MenB - Dose 2: 'not a date' is not a valid date, expected dd/mm/yyyy"));
    assert!(stderr.contains("2 problems found"));
}

#[test]
fn test_check_missing_file() {
    let dir = tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_vaccine_checker");

    let output = Command::new(bin)
        .arg("check")
        .arg(dir.path().join("missing.ron"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "got:\n{}", stderr);
}
