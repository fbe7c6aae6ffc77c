use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info};

use crate::parser::rows::{Control, RawCell, RawRow, MEETING_LABEL};

static RESULTS_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div[style*='overflow:auto'] > table").unwrap());
static ANY_TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static INPUT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("input").unwrap());

/// Turn a saved results page into the raw row sequence of its results table.
/// A page without a results table yields no rows.
pub fn rows_from_html(html: &str) -> Vec<RawRow> {
    let doc = Html::parse_document(html);

    let table = doc.select(&RESULTS_TABLE).next().or_else(|| {
        // Some saved pages lose the scroll wrapper; fall back to the table
        // holding meeting rows.
        doc.select(&ANY_TABLE)
            .filter(|t| t.text().any(|s| s.contains(MEETING_LABEL)))
            .last()
    });

    let Some(table) = table else {
        info!("No results table found");
        return Vec::new();
    };

    let rows: Vec<RawRow> = table_rows(table).map(read_row).collect();
    debug!(rows = rows.len(), "Read results table");
    rows
}

/// `<tr>` children of the table, looking through `<thead>`/`<tbody>`/`<tfoot>`
/// but not into nested tables.
fn table_rows(table: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    table
        .children()
        .filter_map(ElementRef::wrap)
        .flat_map(|el| match el.value().name() {
            "tr" => vec![el],
            "thead" | "tbody" | "tfoot" => el
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|c| c.value().name() == "tr")
                .collect(),
            _ => Vec::new(),
        })
}

fn read_row(tr: ElementRef<'_>) -> RawRow {
    let cells = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|c| c.value().name() == "td")
        .map(read_cell)
        .collect();
    RawRow { cells }
}

fn read_cell(td: ElementRef<'_>) -> RawCell {
    let anchor = td.select(&ANCHOR).next().map(element_text);
    let control = td.select(&INPUT).next().map(|input| Control {
        value: input.value().attr("value").map(str::to_string),
    });
    RawCell {
        text: element_text(td),
        anchor,
        control,
    }
}

/// Rendered text with `<br>` as a space and whitespace (including `&nbsp;`) collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(t) => raw.push_str(t),
            Node::Element(e) if e.name() == "br" => raw.push(' '),
            _ => {}
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::rows::{classify, RowCategory};

    #[test]
    fn comp_fixture_rows() {
        let html = std::fs::read_to_string("tests/fixtures/comp.html").unwrap();
        let rows = rows_from_html(&html);
        assert!(!rows.is_empty());

        let header = rows.iter().find(|r| classify(r) == RowCategory::ClassHeader).unwrap();
        assert_eq!(header.cells.len(), 11);
        assert_eq!(
            header.cells[0].control,
            Some(Control { value: Some("10234".to_string()) })
        );
        assert_eq!(header.cells[3].anchor.as_deref(), Some("COMP 1405"));

        let meeting = rows.iter().find(|r| classify(r) == RowCategory::MeetingDate).unwrap();
        assert!(meeting.cells[1].text.starts_with("Meeting Date: Sep 04, 2024 to Dec 06, 2024 Days:"));
    }

    #[test]
    fn nbsp_cells_are_blank() {
        let html = r#"<div style="overflow:auto"><table>
            <tr><td>&nbsp;</td><td>&nbsp;</td></tr>
        </table></div>"#;
        let rows = rows_from_html(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells[1].text, "");
        assert_eq!(classify(&rows[0]), RowCategory::Spacer);
    }

    #[test]
    fn br_separates_words() {
        let html = r#"<div style="overflow:auto"><table>
            <tr><td></td><td><b>Meeting Date:</b> 05/06 to 08/15<br>Days: MWF</td></tr>
        </table></div>"#;
        let rows = rows_from_html(html);
        assert_eq!(rows[0].cells[1].text, "Meeting Date: 05/06 to 08/15 Days: MWF");
    }

    #[test]
    fn fallback_to_meeting_table() {
        let html = r#"<table><tr><td>nav</td></tr></table>
            <table><tr><td></td><td>Meeting Date: 05/06 to 08/15</td></tr></table>"#;
        let rows = rows_from_html(html);
        assert_eq!(rows.len(), 1);
        assert_eq!(classify(&rows[0]), RowCategory::MeetingDate);
    }

    #[test]
    fn no_table() {
        assert!(rows_from_html("<html><body><p>No classes found.</p></body></html>").is_empty());
    }
}
