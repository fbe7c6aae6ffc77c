mod db;
mod parser;
mod rooms;
mod table;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use parser::assemble::Assembly;

#[derive(Parser)]
#[command(name = "class_schedule", about = "Course-offering extractor for registration result pages")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "SCHEDULE_DB", default_value = db::DEFAULT_DB_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,
    /// Extract saved result pages (one page per program) into the database
    Import {
        /// HTML result pages; the file stem is the program code (COMP.html → COMP)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Program code override (single file only)
        #[arg(short, long)]
        program: Option<String>,
        /// Academic term code stored with every record (e.g. 202520)
        #[arg(short, long)]
        term: Option<String>,
    },
    /// Write stored records as CSV or JSON
    Export {
        /// Only this program
        #[arg(short, long)]
        program: Option<String>,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show extraction statistics
    Stats,
    /// List rooms with no class at a given date and time
    EmptyRooms {
        /// Date, e.g. 2024-09-09 or "Sep 09, 2024"
        #[arg(short, long)]
        date: String,
        /// Time, e.g. 10:30
        #[arg(short, long)]
        time: String,
        /// Only buildings whose name contains this text
        #[arg(short, long)]
        building: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            println!("Database ready at {}", cli.db.display());
            Ok(())
        }
        Commands::Import { files, program, term } => {
            if program.is_some() && files.len() > 1 {
                bail!("--program can only be used with a single file");
            }
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let counts = import_pages(&conn, &files, program.as_deref(), term.as_deref())?;
            counts.print();
            Ok(())
        }
        Commands::Export { program, format, output } => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let records = db::fetch_records(&conn, program.as_deref())?;
            let out: Box<dyn Write> = match &output {
                Some(path) => Box::new(
                    std::fs::File::create(path)
                        .with_context(|| format!("Failed to create {}", path.display()))?,
                ),
                None => Box::new(std::io::stdout().lock()),
            };
            write_records(out, &records, format)?;
            info!("Exported {} records", records.len());
            Ok(())
        }
        Commands::Stats => {
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Programs:  {}", s.programs);
            println!("Sections:  {}", s.sections);
            println!("Meetings:  {}", s.records);
            println!("Rejected:  {}", s.rejected);
            println!("With room: {}", s.located);
            Ok(())
        }
        Commands::EmptyRooms { date, time, building } => {
            let day = rooms::parse_date(&date)
                .with_context(|| format!("Unrecognized date: {}", date))?;
            let at = rooms::parse_time(&time)
                .with_context(|| format!("Unrecognized time: {}", time))?;
            let conn = db::connect(&cli.db)?;
            db::init_schema(&conn)?;
            let slots = db::fetch_room_slots(&conn, building.as_deref())?;
            let free = rooms::empty_rooms(&slots, day, at);
            if free.is_empty() {
                println!("No empty rooms found.");
                return Ok(());
            }
            for r in &free {
                println!("{:<32} {}", truncate(&r.building, 32), r.room);
            }
            println!("\n{} empty rooms", free.len());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

#[derive(Default)]
struct ImportCounts {
    programs: usize,
    empty: usize,
    headers: usize,
    classes: usize,
    without_meetings: usize,
    rejected: usize,
    orphans: usize,
    records: usize,
}

impl ImportCounts {
    fn print(&self) {
        println!(
            "Imported {} programs ({} without results): {} class rows, {} classes, {} meetings.",
            self.programs, self.empty, self.headers, self.classes, self.records,
        );
        println!(
            "Skipped: {} rejected rows, {} classes without meetings, {} stray rows.",
            self.rejected, self.without_meetings, self.orphans,
        );
    }
}

struct PageResult {
    program: String,
    source: String,
    assembly: Assembly,
}

/// Each page gets its own state machine, so pages are extracted in parallel;
/// saving stays on this thread.
fn import_pages(
    conn: &rusqlite::Connection,
    files: &[PathBuf],
    program: Option<&str>,
    term: Option<&str>,
) -> anyhow::Result<ImportCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = ImportCounts::default();

    for chunk in files.chunks(64) {
        let results: Vec<anyhow::Result<PageResult>> =
            chunk.par_iter().map(|path| extract_page(path, program)).collect();

        for result in results {
            let page = result?;
            let report = &page.assembly.report;
            if page.assembly.records.is_empty() {
                warn!(program = %page.program, rows = report.rows, "No classes found");
                counts.empty += 1;
            }
            counts.programs += 1;
            counts.headers += report.headers;
            counts.classes += report.classes;
            counts.without_meetings += report.without_meetings;
            counts.rejected += report.rejected_classes + report.malformed_rows;
            counts.orphans += report.orphan_rows;
            counts.records += db::save_program(
                conn,
                &db::ProgramImport {
                    program_code: &page.program,
                    term,
                    source: &page.source,
                    report,
                    records: &page.assembly.records,
                },
            )?;
            info!(
                program = %page.program,
                classes = report.classes,
                records = page.assembly.records.len(),
                "Saved program"
            );
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn extract_page(path: &Path, program: Option<&str>) -> anyhow::Result<PageResult> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let program = match program {
        Some(p) => p.to_string(),
        None => program_from_path(path)?,
    };
    let rows = table::rows_from_html(&html);
    let assembly = parser::process_rows(&program, &rows);
    Ok(PageResult {
        program,
        source: path.display().to_string(),
        assembly,
    })
}

fn program_from_path(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase())
        .with_context(|| format!("Cannot derive a program code from {}", path.display()))
}

fn write_records(
    out: Box<dyn Write>,
    records: &[parser::expand::NormalizedRecord],
    format: Format,
) -> anyhow::Result<()> {
    match format {
        Format::Csv => {
            let mut w = csv::Writer::from_writer(out);
            for r in records {
                w.serialize(r)?;
            }
            w.flush()?;
        }
        Format::Json => {
            let mut out = out;
            serde_json::to_writer_pretty(&mut out, records)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_code_from_file_stem() {
        assert_eq!(program_from_path(Path::new("pages/comp.html")).unwrap(), "COMP");
        assert_eq!(program_from_path(Path::new("MATH")).unwrap(), "MATH");
    }

    #[test]
    fn fixture_page_extracts_with_stem() {
        let page = extract_page(Path::new("tests/fixtures/comp.html"), None).unwrap();
        assert_eq!(page.program, "COMP");
        assert_eq!(page.assembly.records.len(), 4);
    }

    #[test]
    fn import_then_export_csv() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        let files = vec![
            PathBuf::from("tests/fixtures/comp.html"),
            PathBuf::from("tests/fixtures/no_results.html"),
        ];
        let counts = import_pages(&conn, &files, None, Some("202520")).unwrap();
        assert_eq!(counts.programs, 2);
        assert_eq!(counts.empty, 1);
        assert_eq!(counts.records, 4);
        assert_eq!(counts.rejected, 1);
        assert_eq!(counts.headers, 5);
        assert_eq!(counts.classes, 3);
        assert_eq!(counts.without_meetings, 1);

        let records = db::fetch_records(&conn, Some("COMP")).unwrap();
        let mut buf = Vec::new();
        {
            let mut w = csv::Writer::from_writer(&mut buf);
            for r in &records {
                w.serialize(r).unwrap();
            }
            w.flush().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "crn,status,course_code,section,title,credits,class_type,hybrid,online,instructor,\
             start_date,end_date,days,start_time,end_time,building,room,section_info,program_code"
        );
        assert_eq!(lines.count(), 4);
    }
}
