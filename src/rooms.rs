use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::db::RoomSlot;
use crate::parser::extract::location::is_placeholder;

const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%m/%d/%Y", "%Y-%m-%d"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p", "%I:%M%p"];

/// Room values that never name a bookable room.
const PSEUDO_ROOMS: &[&str] = &["LINE", "ON"];

const DAY_LETTERS: &str = "MTWRFSU";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Room {
    pub building: String,
    pub room: String,
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(s, f).ok())
}

/// Registration-system day letters.
fn day_letter(day: Weekday) -> char {
    match day {
        Weekday::Mon => 'M',
        Weekday::Tue => 'T',
        Weekday::Wed => 'W',
        Weekday::Thu => 'R',
        Weekday::Fri => 'F',
        Weekday::Sat => 'S',
        Weekday::Sun => 'U',
    }
}

/// Day codes come either as letters (`MWF`) or abbreviations (`Mon Wed`).
fn meets_on(days: &str, day: Weekday) -> bool {
    let abbrev = match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    };
    if days.contains(abbrev) {
        return true;
    }
    let letters = days.trim();
    !letters.contains(' ')
        && letters.chars().all(|c| DAY_LETTERS.contains(c))
        && letters.contains(day_letter(day))
}

/// Whether a stored building/room pair names a real room rather than a
/// backfill sentinel or an online pseudo-location.
pub fn is_physical(building: &str, room: &str) -> bool {
    [building, room]
        .into_iter()
        .all(|v| !v.is_empty() && !is_placeholder(v) && !PSEUDO_ROOMS.contains(&v))
}

/// Whether this meeting occupies its room at `date` `time`. Unparseable date
/// bounds are open; unparseable times never occupy.
fn occupies(slot: &RoomSlot, date: NaiveDate, time: NaiveTime) -> bool {
    if parse_date(&slot.start_date).is_some_and(|start| date < start) {
        return false;
    }
    if parse_date(&slot.end_date).is_some_and(|end| date > end) {
        return false;
    }
    if !meets_on(&slot.days, date.weekday()) {
        return false;
    }
    match (parse_time(&slot.start_time), parse_time(&slot.end_time)) {
        (Some(start), Some(end)) => start <= time && time <= end,
        _ => false,
    }
}

/// Distinct physical rooms with no meeting at `date` `time`.
pub fn empty_rooms(slots: &[RoomSlot], date: NaiveDate, time: NaiveTime) -> Vec<Room> {
    let physical: Vec<&RoomSlot> = slots
        .iter()
        .filter(|s| is_physical(&s.building, &s.room))
        .collect();

    let busy: BTreeSet<(&str, &str)> = physical
        .iter()
        .filter(|s| occupies(s, date, time))
        .map(|s| (s.building.as_str(), s.room.as_str()))
        .collect();

    physical
        .iter()
        .map(|s| (s.building.as_str(), s.room.as_str()))
        .filter(|key| !busy.contains(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|(building, room)| Room {
            building: building.to_string(),
            room: room.to_string(),
        })
        .collect()
}

// ── Tests ──
