use std::process::Command;

use vaccine_checker::Vaccine;

#[test]
fn test_schedule_lists_every_series() {
    let bin = env!("CARGO_BIN_EXE_vaccine_checker");

    let output = Command::new(bin).arg("schedule").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for vaccine in Vaccine::all() {
        assert!(
            stdout.contains(&format!("{} - {}", vaccine.name(), vaccine.protects())),
            "schedule should list {}; got:\n{}",
            vaccine.name(),
            stdout
        );
    }
    assert!(stdout.contains("Dose 1 at 8 weeks (window 8-15 weeks, before 15 weeks)"));
    assert!(stdout.contains("At least 52 weeks after dose 3 of DTaP/IPV/Hib/HepB (6-in-1)"));
}
