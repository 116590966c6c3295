mod cli;

use chrono::{Datelike, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use fertiplan::config::Config;
use fertiplan::engine::{load_field, Balance};
use fertiplan::error::{FertiplanError, Result};
use fertiplan::report::{report_rows, ReportFilter};
use fertiplan::store::{MemoryStore, PlanFile};
use fertiplan::utils::round_to_nearest;
use fertiplan::{guidelines, validation};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config)?;

    match cli.command {
        Commands::Check => check(&config),
        Commands::Balance {
            parcel,
            sub_suffix,
            year,
        } => balance(&config, parcel, sub_suffix, year),
        Commands::Report { year } => report(&config, year),
    }
}

fn load_store(config: &Config) -> Result<MemoryStore> {
    let plan_file = config.plan_file.as_ref().ok_or_else(|| {
        FertiplanError::Config("no plan_file configured".to_string())
    })?;
    PlanFile::load(plan_file)?.into_store()
}

fn check(config: &Config) -> Result<()> {
    let guidelines = guidelines::shared(&config.guidelines_dir)?;
    println!(
        "Guideline tables in {} load cleanly.",
        config.guidelines_dir.display()
    );

    let Some(plan_file) = config.plan_file.as_ref() else {
        println!("No plan document configured, nothing else to check.");
        return Ok(());
    };
    let plan = PlanFile::load(plan_file)?;
    let store = plan.clone().into_store()?;

    let mut errors = 0usize;
    for fertilization in &plan.fertilizations {
        let validation = validation::validate_fertilization(
            &store,
            &guidelines,
            config.user_id,
            fertilization,
        );
        for error in &validation.errors {
            errors += 1;
            println!(
                "fertilization {:?}: {}: {}",
                fertilization.id, error.field, error.message
            );
        }
    }
    for modifier in &plan.modifiers {
        let validation = validation::validate_modifier(modifier);
        for error in &validation.errors {
            errors += 1;
            println!("modifier {:?}: {}: {}", modifier.id, error.field, error.message);
        }
    }
    if errors == 0 {
        println!(
            "Plan document {} is consistent ({} fertilizations).",
            plan_file.display(),
            plan.fertilizations.len()
        );
    }
    Ok(())
}

fn balance(config: &Config, parcel: i64, sub_suffix: i64, year: Option<i32>) -> Result<()> {
    let guidelines = guidelines::shared(&config.guidelines_dir)?;
    let store = load_store(config)?;
    let year = year.unwrap_or_else(|| Utc::now().year());

    let Some(field) = load_field(&store, &guidelines, parcel, sub_suffix, year) else {
        return Err(FertiplanError::NotFound(format!(
            "field for parcel {parcel} in {year}"
        )));
    };

    println!(
        "{} ({}, {} ha, {})",
        field.parcel.label(),
        year,
        round_to_nearest(field.area, 2),
        field.field_type
    );
    println!();
    print_header();
    for balance in field.crop_balances() {
        print_balance(&balance);
    }
    for balance in field.category_balances() {
        print_balance(&balance);
    }
    print_balance(&field.total_balance());
    Ok(())
}

fn report(config: &Config, year: Option<i32>) -> Result<()> {
    let store = load_store(config)?;
    let filter = ReportFilter {
        year,
        ..Default::default()
    };
    for row in report_rows(&store, &filter) {
        println!(
            "{:02}-{} {:<20} {:<24} {:<16} {:<12} {:>8}",
            row.parcel_prefix,
            row.parcel_suffix,
            row.parcel_name,
            row.crop_name,
            row.fertilizer_name,
            row.measure.to_string(),
            round_to_nearest(row.amount, 1),
        );
    }
    Ok(())
}

fn print_header() {
    println!(
        "{:<24} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "", "N", "P2O5", "K2O", "MgO", "S", "CaO", "NH4-N"
    );
}

fn print_balance(balance: &Balance) {
    println!(
        "{:<24} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        balance.title,
        round_to_nearest(balance.n, 1),
        round_to_nearest(balance.p2o5, 1),
        round_to_nearest(balance.k2o, 1),
        round_to_nearest(balance.mgo, 1),
        round_to_nearest(balance.s, 1),
        round_to_nearest(balance.cao, 1),
        round_to_nearest(balance.nh4, 1),
    );
}
