#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jiff::{civil::Date, Zoned};
use std::{
    fs,
    path::{Path, PathBuf},
};
use vaccine_checker::{parse_date, RecordForm, Report, Vaccine};

/// Check a child's vaccinations against the UK immunisation schedule
#[derive(Parser, Debug)]
#[command(name = "vaccine_checker")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate and evaluate a record file
    Check {
        /// RON record file
        record: PathBuf,

        /// Evaluate as of this date (dd/mm/yyyy) instead of today
        #[arg(long)]
        today: Option<String>,

        /// Print the raw results as RON
        #[arg(long)]
        ron: bool,
    },

    /// Print the schedule
    Schedule,

    /// Print an empty record file to fill in
    Template {
        /// Date of birth (dd/mm/yyyy)
        #[arg(long)]
        dob: String,
    },
}

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { record, today, ron } => check(&record, today.as_deref(), ron),
        Commands::Schedule => {
            print_schedule();
            Ok(())
        }
        Commands::Template { dob } => {
            parse_date(&dob).with_context(|| format!("invalid date of birth '{dob}'"))?;
            println!("{}", RecordForm::blank(&dob).to_ron()?);
            Ok(())
        }
    }
}

fn check(path: &Path, today: Option<&str>, ron: bool) -> Result<()> {
    let today: Date = match today {
        Some(text) => parse_date(text).with_context(|| format!("invalid --today '{text}'"))?,
        None => Zoned::now().date(),
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let form = RecordForm::from_ron(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let record = match form.validate(today) {
        Ok(record) => record,
        Err(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!("{} problems found in {}", errors.len(), path.display());
        }
    };

    let results = record.evaluate(today)?;
    if ron {
        println!(
            "{}",
            ron::ser::to_string_pretty(&results, ron::ser::PrettyConfig::default())?
        );
        return Ok(());
    }

    println!("Child's age: {}", record.age(today)?);
    println!();
    print!("{}", Report::new(&results));
    Ok(())
}

fn print_schedule() {
    for vaccine in Vaccine::all() {
        println!("{vaccine}");
        for dose in vaccine.doses() {
            println!("    {dose}");
        }
        if let Some(after) = vaccine.after() {
            println!(
                "    At least {} weeks after dose {} of {}",
                after.min_weeks(),
                after.dose(),
                after.series()
            );
        }
    }
}
