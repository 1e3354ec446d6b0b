use std::{fs, process::Command};

use tempfile::tempdir;
use vaccine_checker::{RecordForm, SeriesKind};

#[test]
fn test_template_fill_and_check() {
    let dir = tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_vaccine_checker");

    let output = Command::new(bin)
        .args(["template", "--dob", "01/01/2023"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.ends_with(")\n"), "template should end with a newline; got:\n{}", stdout);

    let mut form = RecordForm::from_ron(&stdout).unwrap();
    form.set_dose(SeriesKind::SixInOne, 1, Some("01/03/2023"));
    let record = dir.path().join("child.ron");
    fs::write(&record, form.to_ron().unwrap()).unwrap();

    let output = Command::new(bin)
        .arg("check")
        .arg(&record)
        .args(["--today", "01/06/2025"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Child's age: 2 years (126 weeks)"), "got:\n{}", stdout);
    assert!(stdout.contains("Overdue Vaccinations"));
    assert!(stdout.contains("Upcoming Vaccinations"));
    assert!(stdout.contains(
        "[ok] DTaP/IPV/Hib/HepB (6-in-1) - Dose 1 given at 8 weeks. Timing correct."
    ));
    assert!(stdout.contains(
        "MMR - Dose 1 is overdue by 1 year and 5 months. Should be given immediately."
    ));
}

#[test]
fn test_template_rejects_bad_date_of_birth() {
    let bin = env!("CARGO_BIN_EXE_vaccine_checker");

    let output = Command::new(bin)
        .args(["template", "--dob", "2023-01-01"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid date of birth '2023-01-01'"), "got:\n{}", stderr);
}
