use tracing::{debug, warn};

use super::expand::{expand, NormalizedRecord};
use super::extract::class::{self, ClassAttributes};
use super::extract::{location, meeting, meeting::MeetingTime};
use super::rows::{classify, RawRow, RowCategory};

/// A class whose rows are still being read.
#[derive(Debug)]
struct Pending {
    class: ClassAttributes,
    meetings: Vec<MeetingTime>,
    section_info: String,
}

#[derive(Debug)]
enum State {
    Idle,
    Accumulating(Pending),
}

/// Counters describing what happened to the header rows of one table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssemblyReport {
    pub rows: usize,
    pub headers: usize,
    /// Classes flushed with at least one meeting.
    pub classes: usize,
    /// Classes dropped because no meeting row followed them.
    pub without_meetings: usize,
    /// Header rows skipped for having too few cells.
    pub malformed_rows: usize,
    /// Header rows whose class could not be extracted.
    pub rejected_classes: usize,
    pub orphan_rows: usize,
}

#[derive(Debug, Default)]
pub struct Assembly {
    pub records: Vec<NormalizedRecord>,
    pub report: AssemblyReport,
}

/// Row-stream state machine: one in-progress class at most, flushed at
/// every boundary and at end of input.
#[derive(Debug)]
pub struct Assembler {
    state: State,
    out: Assembly,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    pub fn new() -> Self {
        Assembler {
            state: State::Idle,
            out: Assembly::default(),
        }
    }

    pub fn push(&mut self, idx: usize, row: &RawRow) {
        self.out.report.rows += 1;
        let category = classify(row);
        debug!(row = idx, ?category, "classified");

        match category {
            RowCategory::Spacer => self.flush(),
            RowCategory::ClassHeader => {
                self.flush();
                self.out.report.headers += 1;
                self.start(idx, row);
            }
            RowCategory::MeetingDate => match &mut self.state {
                State::Accumulating(p) => {
                    p.meetings.push(meeting::extract(row.label_text().unwrap_or_default()))
                }
                State::Idle => self.orphan(idx, category),
            },
            RowCategory::SectionInfo => match &mut self.state {
                State::Accumulating(p) => {
                    p.section_info = row.label_text().unwrap_or_default().trim().to_string()
                }
                State::Idle => self.orphan(idx, category),
            },
            RowCategory::Unknown => {}
        }
    }

    /// Flush whatever is still accumulating and hand back the records.
    pub fn finish(mut self) -> Assembly {
        self.flush();
        self.out
    }

    fn start(&mut self, idx: usize, row: &RawRow) {
        match class::extract(row) {
            Ok(class) => {
                self.state = State::Accumulating(Pending {
                    class,
                    meetings: Vec::new(),
                    section_info: String::new(),
                });
            }
            Err(e) if e.is_row_shape() => {
                warn!(row = idx, error = %e, "Skipping malformed class row");
                self.out.report.malformed_rows += 1;
            }
            Err(e) => {
                warn!(row = idx, error = %e, "Discarding class");
                self.out.report.rejected_classes += 1;
            }
        }
    }

    fn flush(&mut self) {
        let State::Accumulating(mut p) = std::mem::replace(&mut self.state, State::Idle) else {
            return;
        };
        if p.meetings.is_empty() {
            debug!(crn = %p.class.crn, "Class has no meeting times, dropped");
            self.out.report.without_meetings += 1;
            return;
        }
        location::backfill(&mut p.meetings, &p.section_info);
        self.out.report.classes += 1;
        self.out
            .records
            .extend(expand(&p.class, p.meetings, &p.section_info));
    }

    fn orphan(&mut self, idx: usize, category: RowCategory) {
        debug!(row = idx, ?category, "Row outside any class, ignored");
        self.out.report.orphan_rows += 1;
    }
}

/// Run one fresh state machine over a full row sequence.
pub fn assemble(rows: &[RawRow]) -> Assembly {
    let mut asm = Assembler::new();
    for (i, row) in rows.iter().enumerate() {
        asm.push(i, row);
    }
    asm.finish()
}

// ── Tests ──
