//! Command-line entry point for quick checks against a tracker database.
//!
//! # Responsibility
//! - Verify `tracker_core` linkage (`ping`, `version`).
//! - Print per-project progress and status without starting the server.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracker_core::db::open_db;
use tracker_core::{DashboardService, ProjectSummary};

#[derive(Parser)]
#[command(name = "tracker", version, about = "Project tracker utilities")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the core health-check reply
    Ping,

    /// Print the core crate version
    Version,

    /// Show progress and schedule status for every project
    Status {
        /// SQLite database file
        #[arg(long, env = "TRACKER_DB_PATH", default_value = "projectManagementDB.db")]
        db: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Ping => writeln!(out, "tracker_core ping={}", tracker_core::ping())?,
        Commands::Version => writeln!(out, "tracker_core version={}", tracker_core::core_version())?,
        Commands::Status { db, json } => {
            let rows = load_summaries(&db)?;
            if json {
                serde_json::to_writer_pretty(&mut out, &rows)?;
                writeln!(out)?;
            } else {
                write_table(&mut out, &rows)?;
            }
        }
    }
    Ok(())
}

fn load_summaries(db: &Path) -> Result<Vec<ProjectSummary>> {
    // open_db creates missing files; status only reads existing stores.
    if !db.exists() {
        bail!("database {} does not exist", db.display());
    }
    let conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
    let rows = DashboardService::new(&conn)
        .dashboard()
        .context("failed to compute project summaries")?;
    Ok(rows)
}

fn write_table(out: &mut impl Write, rows: &[ProjectSummary]) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No projects.");
    }

    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    writeln!(
        out,
        "{:>4}  {:<name_width$}  {:>8}  {:>8}  STATUS",
        "ID", "NAME", "PROGRESS", "EXPECTED"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:>4}  {:<name_width$}  {:>7}%  {:>7}%  {}",
            row.project_id, row.name, row.progress, row.expected_progress, row.status
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_summaries, write_table, Cli, Commands};
    use clap::Parser;
    use tracker_core::db::open_db;
    use tracker_core::{EntityRepository, ProjectInput, SqliteProjectRepository};

    #[test]
    fn status_accepts_db_and_json_flags() {
        let cli = Cli::try_parse_from(["tracker", "status", "--db", "/tmp/x.db", "--json"]).unwrap();
        match cli.command {
            Commands::Status { db, json } => {
                assert_eq!(db.to_str(), Some("/tmp/x.db"));
                assert!(json);
            }
            _ => panic!("expected status command"),
        }
    }

    #[test]
    fn missing_database_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_summaries(&dir.path().join("absent.db")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn table_lists_each_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.db");
        let conn = open_db(&path).unwrap();
        SqliteProjectRepository::new(&conn)
            .create(&ProjectInput {
                name: "Apollo".to_string(),
                start_date: "2024-01-01".to_string(),
                end_date: "2024-12-31".to_string(),
                owner: "pmo".to_string(),
                description: None,
            })
            .unwrap();
        drop(conn);

        let rows = load_summaries(&path).unwrap();
        let mut out = Vec::new();
        write_table(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("  ID  NAME"));
        assert!(text.contains("Apollo"));
        assert!(text.contains("No data"));
    }

    #[test]
    fn empty_store_prints_placeholder() {
        let mut out = Vec::new();
        write_table(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No projects.\n");
    }
}
