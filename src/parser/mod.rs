pub mod assemble;
pub mod expand;
pub mod extract;
pub mod rows;

use assemble::Assembly;
use rows::RawRow;

/// Three-stage pipeline for one program's table:
/// rows → classified rows → assembled classes → flat records.
pub fn process_rows(program_code: &str, rows: &[RawRow]) -> Assembly {
    let mut out = assemble::assemble(rows);
    for rec in &mut out.records {
        rec.program_code = program_code.to_string();
    }
    out
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::rows_from_html;

    fn parse(fixture: &str, program: &str) -> Assembly {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
        process_rows(program, &rows_from_html(&html))
    }

    #[test]
    fn comp_fixture_records() {
        let out = parse("comp", "COMP");
        assert!(out.records.iter().all(|r| r.program_code == "COMP"));

        let crns: Vec<&str> = out.records.iter().map(|r| r.crn.as_str()).collect();
        assert_eq!(crns, ["10234", "10234", "10250", "10261"]);

        let lecture = &out.records[0];
        assert_eq!(lecture.course_code, "COMP 1405");
        assert_eq!(lecture.title, "Intro to Computer Science I");
        assert_eq!(lecture.days, "Mon Wed");
        assert_eq!(lecture.start_time, "10:05");
        assert_eq!(lecture.building, "Herzberg Laboratories");
        assert_eq!(lecture.room, "2115");
        assert_eq!(lecture.instructor, "Ada Lovelace");
        assert_eq!(out.records[1].days, "Fri");

        let online = &out.records[2];
        assert_eq!(online.building, "ONLINE");
        assert_eq!(online.instructor, "TBD");
        assert_eq!(online.online, Some(true));

        let in_person = &out.records[3];
        assert_eq!(in_person.days, "Tue Thu");
        assert_eq!(in_person.building, "see instructor");
        assert_eq!(in_person.room, "see instructor");
    }

    #[test]
    fn comp_fixture_report() {
        let out = parse("comp", "COMP");
        // 10240 has no meeting rows, 10270 lost its course link
        assert_eq!(out.report.headers, 5);
        assert_eq!(out.report.classes, 3);
        assert_eq!(out.report.without_meetings, 1);
        assert_eq!(out.report.rejected_classes, 1);
    }

    #[test]
    fn page_without_results() {
        let out = parse("no_results", "ZZZZ");
        assert!(out.records.is_empty());
        assert_eq!(out.report.rows, 0);
    }
}
