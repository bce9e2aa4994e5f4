use crate::infra::open_repository;
use clap::Args;
use enrollment::config::AppConfig;
use enrollment::error::AppError;
use enrollment::intake::{write_csv, EnrollmentRecord, EnrollmentRepository};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Maximum number of enrollments to show, newest first
    #[arg(long, default_value_t = 20)]
    pub(crate) limit: usize,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Maximum number of enrollments to export, newest first
    #[arg(long, default_value_t = 1000)]
    pub(crate) limit: usize,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    let repository = open_repository(&mut config, args.database)?;
    let records = repository.list(args.limit)?;
    let total = repository.count()?;

    let stdout = io::stdout();
    render_listing(&records, total, &mut stdout.lock())?;
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    let repository = open_repository(&mut config, args.database)?;
    let records = repository.list(args.limit)?;

    match args.output {
        Some(path) => write_csv(&records, File::create(path)?)?,
        None => write_csv(&records, io::stdout().lock())?,
    }
    Ok(())
}

pub(crate) fn render_listing<W: Write>(
    records: &[EnrollmentRecord],
    total: u64,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Enrollments ({} of {total})", records.len())?;
    if records.is_empty() {
        writeln!(out, "  (none)")?;
        return Ok(());
    }

    for record in records {
        writeln!(
            out,
            "  #{id} {created} | {child} (age {age}, born {dob}) | parent {parent} <{email}> {phone}",
            id = record.id,
            created = record.created_at.format("%Y-%m-%d %H:%M"),
            child = record.child_name,
            age = record.age,
            dob = record.dob,
            parent = record.parent_name,
            email = record.email,
            phone = record.phone_number,
        )?;
        if let Some(message) = &record.message {
            writeln!(out, "      note: {}", message.replace('\n', " "))?;
        }
    }
    Ok(())
}
