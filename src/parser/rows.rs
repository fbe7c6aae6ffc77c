/// One `<td>` of a results-table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// Rendered text, whitespace collapsed.
    pub text: String,
    /// Text of the first anchor inside the cell, if any.
    pub anchor: Option<String>,
    /// Embedded selectable control (checkbox) and its `value` attribute.
    pub control: Option<Control>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Control {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCategory {
    Spacer,
    ClassHeader,
    MeetingDate,
    SectionInfo,
    Unknown,
}

pub const MEETING_LABEL: &str = "Meeting Date:";
pub const SECTION_INFO_LABEL: &str = "Section Information:";

#[cfg(test)]
impl RawCell {
    pub fn text(text: &str) -> Self {
        RawCell {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn anchor(text: &str) -> Self {
        RawCell {
            text: text.to_string(),
            anchor: Some(text.to_string()),
            control: None,
        }
    }

    pub fn checkbox(value: &str) -> Self {
        RawCell {
            text: String::new(),
            anchor: None,
            control: Some(Control {
                value: Some(value.to_string()),
            }),
        }
    }
}

impl RawRow {
    #[cfg(test)]
    pub fn new(cells: Vec<RawCell>) -> Self {
        RawRow { cells }
    }

    /// Text of the second cell, where the label of every annotation row sits.
    pub fn label_text(&self) -> Option<&str> {
        self.cells.get(1).map(|c| c.text.as_str())
    }
}

/// Assign a category to one raw row. Pure: depends on row content only.
pub fn classify(row: &RawRow) -> RowCategory {
    let cells = &row.cells;

    // ── Spacer: no second cell, or a blank one (`&nbsp;` decodes to whitespace) ──
    if cells.len() <= 1 || cells[1].text.trim().is_empty() {
        return RowCategory::Spacer;
    }

    // ── Class header: checkbox in the first cell ──
    if cells.len() > 2 && cells[0].control.is_some() {
        return RowCategory::ClassHeader;
    }

    let label = cells[1].text.as_str();
    if label.contains(MEETING_LABEL) {
        RowCategory::MeetingDate
    } else if label.contains(SECTION_INFO_LABEL) {
        RowCategory::SectionInfo
    } else {
        RowCategory::Unknown
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn header_row() -> RawRow {
        RawRow::new(vec![
            RawCell::checkbox("10234"),
            RawCell::text("Open"),
            RawCell::text("CRN"),
            RawCell::anchor("COMP 1405"),
            RawCell::text("A"),
            RawCell::anchor("Intro Programming"),
        ])
    }

    fn labelled(text: &str) -> RawRow {
        RawRow::new(vec![RawCell::text(""), RawCell::text(text)])
    }

    #[test]
    fn empty_and_single_cell_rows_are_spacers() {
        assert_eq!(classify(&RawRow::default()), RowCategory::Spacer);
        assert_eq!(
            classify(&RawRow::new(vec![RawCell::text("anything")])),
            RowCategory::Spacer
        );
    }

    #[test]
    fn nbsp_second_cell_is_spacer() {
        assert_eq!(classify(&labelled("\u{a0}")), RowCategory::Spacer);
        assert_eq!(classify(&labelled("   ")), RowCategory::Spacer);
    }

    #[test]
    fn checkbox_row_is_header() {
        assert_eq!(classify(&header_row()), RowCategory::ClassHeader);
    }

    #[test]
    fn checkbox_needs_three_cells() {
        let row = RawRow::new(vec![RawCell::checkbox("1"), RawCell::text("Open")]);
        assert_eq!(classify(&row), RowCategory::Unknown);
    }

    #[test]
    fn header_content_without_checkbox_is_not_header() {
        let mut row = header_row();
        row.cells[0].control = None;
        assert_eq!(classify(&row), RowCategory::Unknown);
    }

    #[test]
    fn meeting_and_section_labels() {
        assert_eq!(
            classify(&labelled("Meeting Date: 05/06 to 08/15 Days: MWF")),
            RowCategory::MeetingDate
        );
        assert_eq!(
            classify(&labelled("Section Information: ONLINE")),
            RowCategory::SectionInfo
        );
        assert_eq!(classify(&labelled("Also Register in: COMP 1405 A1")), RowCategory::Unknown);
    }

    #[test]
    fn classification_is_repeatable() {
        let rows = [header_row(), labelled("Meeting Date: x to y Days: M"), labelled(" ")];
        for row in &rows {
            assert_eq!(classify(row), classify(row));
        }
    }
}
