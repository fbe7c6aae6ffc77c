use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::parser::assemble::AssemblyReport;
use crate::parser::expand::NormalizedRecord;
use crate::rooms;

pub const DEFAULT_DB_PATH: &str = "data/schedule.sqlite";

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS imports (
            program_code  TEXT PRIMARY KEY,
            term          TEXT,
            source        TEXT NOT NULL,
            rows          INTEGER NOT NULL,
            classes       INTEGER NOT NULL,
            rejected      INTEGER NOT NULL,
            records       INTEGER NOT NULL,
            imported_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS meetings (
            id            INTEGER PRIMARY KEY,
            program_code  TEXT NOT NULL REFERENCES imports(program_code) ON DELETE CASCADE,
            term          TEXT,
            crn           TEXT NOT NULL,
            status        TEXT NOT NULL,
            course_code   TEXT NOT NULL,
            section       TEXT NOT NULL,
            title         TEXT NOT NULL,
            credits       TEXT NOT NULL,
            class_type    TEXT NOT NULL,
            hybrid        BOOLEAN,
            online        BOOLEAN,
            instructor    TEXT NOT NULL,
            start_date    TEXT NOT NULL,
            end_date      TEXT NOT NULL,
            days          TEXT NOT NULL,
            start_time    TEXT NOT NULL,
            end_time      TEXT NOT NULL,
            building      TEXT NOT NULL,
            room          TEXT NOT NULL,
            section_info  TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_meetings_program ON meetings(program_code);
        CREATE INDEX IF NOT EXISTS idx_meetings_room ON meetings(building, room);
        ",
    )?;
    Ok(())
}

// ── Import ──

pub struct ProgramImport<'a> {
    pub program_code: &'a str,
    pub term: Option<&'a str>,
    pub source: &'a str,
    pub report: &'a AssemblyReport,
    pub records: &'a [NormalizedRecord],
}

/// Replace everything stored for one program with a fresh extraction.
pub fn save_program(conn: &Connection, import: &ProgramImport) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        tx.execute(
            "DELETE FROM imports WHERE program_code = ?1",
            [import.program_code],
        )?;
        tx.execute(
            "INSERT INTO imports (program_code, term, source, rows, classes, rejected, records)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                import.program_code,
                import.term,
                import.source,
                import.report.rows,
                import.report.classes,
                import.report.rejected_classes + import.report.malformed_rows,
                import.records.len(),
            ],
        )?;

        let mut stmt = tx.prepare(
            "INSERT INTO meetings
             (program_code, term, crn, status, course_code, section, title, credits,
              class_type, hybrid, online, instructor, start_date, end_date, days,
              start_time, end_time, building, room, section_info)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20)",
        )?;
        for r in import.records {
            count += stmt.execute(rusqlite::params![
                import.program_code, import.term, r.crn, r.status, r.course_code, r.section,
                r.title, r.credits, r.class_type, r.hybrid, r.online, r.instructor,
                r.start_date, r.end_date, r.days, r.start_time, r.end_time, r.building,
                r.room, r.section_info,
            ])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Export ──

pub fn fetch_records(conn: &Connection, program: Option<&str>) -> Result<Vec<NormalizedRecord>> {
    let mut stmt = conn.prepare(
        "SELECT crn, status, course_code, section, title, credits, class_type, hybrid,
                online, instructor, start_date, end_date, days, start_time, end_time,
                building, room, section_info, program_code
         FROM meetings
         WHERE ?1 IS NULL OR program_code = ?1
         ORDER BY program_code, id",
    )?;
    let rows = stmt
        .query_map([program], |row| {
            Ok(NormalizedRecord {
                crn: row.get(0)?,
                status: row.get(1)?,
                course_code: row.get(2)?,
                section: row.get(3)?,
                title: row.get(4)?,
                credits: row.get(5)?,
                class_type: row.get(6)?,
                hybrid: row.get(7)?,
                online: row.get(8)?,
                instructor: row.get(9)?,
                start_date: row.get(10)?,
                end_date: row.get(11)?,
                days: row.get(12)?,
                start_time: row.get(13)?,
                end_time: row.get(14)?,
                building: row.get(15)?,
                room: row.get(16)?,
                section_info: row.get(17)?,
                program_code: row.get(18)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Rooms ──

/// One booked meeting of a physical room.
pub struct RoomSlot {
    pub building: String,
    pub room: String,
    pub start_date: String,
    pub end_date: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
}

/// All meetings with a non-empty building and room, optionally restricted to
/// buildings whose name contains `building`.
pub fn fetch_room_slots(conn: &Connection, building: Option<&str>) -> Result<Vec<RoomSlot>> {
    let mut stmt = conn.prepare(
        "SELECT building, room, start_date, end_date, days, start_time, end_time
         FROM meetings
         WHERE building != '' AND room != ''
           AND (?1 IS NULL OR instr(building, ?1) > 0)
         ORDER BY building, room",
    )?;
    let rows = stmt
        .query_map([building], |row| {
            Ok(RoomSlot {
                building: row.get(0)?,
                room: row.get(1)?,
                start_date: row.get(2)?,
                end_date: row.get(3)?,
                days: row.get(4)?,
                start_time: row.get(5)?,
                end_time: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub programs: usize,
    pub sections: usize,
    pub records: usize,
    pub rejected: usize,
    pub located: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let programs: usize = conn.query_row("SELECT COUNT(*) FROM imports", [], |r| r.get(0))?;
    let rejected: usize =
        conn.query_row("SELECT COALESCE(SUM(rejected), 0) FROM imports", [], |r| r.get(0))?;
    let records: usize = conn.query_row("SELECT COUNT(*) FROM meetings", [], |r| r.get(0))?;
    let sections: usize = conn.query_row(
        "SELECT COUNT(DISTINCT program_code || '/' || crn) FROM meetings",
        [],
        |r| r.get(0),
    )?;
    let mut stmt = conn.prepare("SELECT building, room FROM meetings")?;
    let mut located = 0;
    for pair in stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))? {
        let (building, room) = pair?;
        if rooms::is_physical(&building, &room) {
            located += 1;
        }
    }
    Ok(Stats {
        programs,
        sections,
        records,
        rejected,
        located,
    })
}

// ── Tests ──
