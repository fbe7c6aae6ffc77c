use std::sync::LazyLock;

use regex::Regex;

// Every field value runs lazily up to the next known label or the end of the
// text. Surrounding whitespace belongs to the terminator, so a bare label
// captures nothing.
static DATES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Meeting Date:\s*(.*?)\s*(?:Days:|Time:|Building:|Room:|$)").unwrap()
});
static DAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Days:\s*(.*?)\s*(?:Time:|Building:|Room:|$)").unwrap()
});
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Time:\s*(.*?)\s*(?:Building:|Room:|$)").unwrap());
static BUILDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Building:\s*(.*?)\s*(?:Room:|$)").unwrap());
static ROOM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Room:\s*(.*?)\s*$").unwrap());

const DATE_SEPARATOR: &str = " to ";
const TIME_SEPARATOR: &str = " - ";

/// One weekly meeting pattern. Unmatched fields are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingTime {
    pub start_date: String,
    pub end_date: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub building: String,
    pub room: String,
}

/// Parse a `Meeting Date: … to … Days: … Time: … Building: … Room: …` blob.
/// Partial text yields partial data, never an error.
pub fn extract(text: &str) -> MeetingTime {
    let text = text.trim();

    let (start_date, end_date) = split_range(&capture(&DATES_RE, text), DATE_SEPARATOR);
    let (start_time, end_time) = split_range(&capture(&TIME_RE, text), TIME_SEPARATOR);

    MeetingTime {
        start_date,
        end_date,
        days: capture(&DAYS_RE, text),
        start_time,
        end_time,
        building: capture(&BUILDING_RE, text),
        room: capture(&ROOM_RE, text),
    }
}

fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default()
}

fn split_range(range: &str, separator: &str) -> (String, String) {
    match range.split_once(separator) {
        Some((start, end)) => (start.trim().to_string(), end.trim().to_string()),
        None => (String::new(), String::new()),
    }
}

// ── Tests ──
