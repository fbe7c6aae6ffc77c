use super::ExtractError;
use crate::parser::rows::{RawCell, RawRow};

pub const INSTRUCTOR_TBD: &str = "TBD";

/// Smallest header row that still carries course code, section and title.
pub const MIN_HEADER_CELLS: usize = 6;

const COL_CONTROL: usize = 0;
const COL_STATUS: usize = 1;
const COL_COURSE: usize = 3;
const COL_SECTION: usize = 4;
const COL_TITLE: usize = 5;
const COL_CREDITS: usize = 6;
const COL_TYPE: usize = 7;
const COL_HYBRID: usize = 8;
const COL_ONLINE: usize = 9;
const COL_INSTRUCTOR: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttributes {
    pub crn: String,
    pub status: String,
    pub course_code: String,
    pub section: String,
    pub title: String,
    pub credits: String,
    pub class_type: String,
    pub hybrid: Option<bool>,
    pub online: Option<bool>,
    pub instructor: String,
}

pub fn extract(row: &RawRow) -> Result<ClassAttributes, ExtractError> {
    let cells = &row.cells;
    if cells.len() < MIN_HEADER_CELLS {
        return Err(ExtractError::RowShape {
            expected: MIN_HEADER_CELLS,
            found: cells.len(),
        });
    }

    let control = cells[COL_CONTROL]
        .control
        .as_ref()
        .ok_or(ExtractError::MissingControl)?;
    let crn = control
        .value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ExtractError::MissingIdentifier)?
        .to_string();

    let course_code = anchor_text(&cells[COL_COURSE], COL_COURSE, "course code")?;
    let title = anchor_text(&cells[COL_TITLE], COL_TITLE, "title")?;

    let instructor = cells
        .get(COL_INSTRUCTOR)
        .map(|c| c.text.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(INSTRUCTOR_TBD)
        .to_string();

    Ok(ClassAttributes {
        crn,
        status: cells[COL_STATUS].text.trim().to_string(),
        course_code,
        section: cells[COL_SECTION].text.trim().to_string(),
        title,
        credits: optional_text(cells, COL_CREDITS),
        class_type: optional_text(cells, COL_TYPE),
        hybrid: yes_no_flag(cells.get(COL_HYBRID)),
        online: yes_no_flag(cells.get(COL_ONLINE)),
        instructor,
    })
}

/// Course code and title come from the link label; the raw cell text may
/// carry decorative markup around it.
fn anchor_text(cell: &RawCell, column: usize, field: &'static str) -> Result<String, ExtractError> {
    cell.anchor
        .as_deref()
        .map(|a| a.trim().to_string())
        .ok_or(ExtractError::MissingAnchor { column, field })
}

fn optional_text(cells: &[RawCell], idx: usize) -> String {
    cells
        .get(idx)
        .map(|c| c.text.trim().to_string())
        .unwrap_or_default()
}

/// A column only counts as a flag when it actually reads Yes/No; some table
/// variants put other data at the same offset.
fn yes_no_flag(cell: Option<&RawCell>) -> Option<bool> {
    let text = cell?.text.as_str();
    if text.contains("Yes") {
        Some(true)
    } else if text.contains("No") {
        Some(false)
    } else {
        None
    }
}

// ── Tests ──
