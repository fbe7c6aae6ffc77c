use serde::Serialize;

use super::extract::class::ClassAttributes;
use super::extract::meeting::MeetingTime;

/// One (section × meeting time) pair, flattened. Field order is the export
/// column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
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
    pub start_date: String,
    pub end_date: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub building: String,
    pub room: String,
    pub section_info: String,
    pub program_code: String,
}

impl NormalizedRecord {
    fn new(class: &ClassAttributes, meeting: MeetingTime, section_info: &str) -> Self {
        NormalizedRecord {
            crn: class.crn.clone(),
            status: class.status.clone(),
            course_code: class.course_code.clone(),
            section: class.section.clone(),
            title: class.title.clone(),
            credits: class.credits.clone(),
            class_type: class.class_type.clone(),
            hybrid: class.hybrid,
            online: class.online,
            instructor: class.instructor.clone(),
            start_date: meeting.start_date,
            end_date: meeting.end_date,
            days: meeting.days,
            start_time: meeting.start_time,
            end_time: meeting.end_time,
            building: meeting.building,
            room: meeting.room,
            section_info: section_info.to_string(),
            program_code: String::new(),
        }
    }
}

/// Cross-join a finished class with its meetings: one record per meeting,
/// in meeting order. No meetings, no records.
pub fn expand(
    class: &ClassAttributes,
    meetings: Vec<MeetingTime>,
    section_info: &str,
) -> Vec<NormalizedRecord> {
    meetings
        .into_iter()
        .map(|m| NormalizedRecord::new(class, m, section_info))
        .collect()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn class() -> ClassAttributes {
        ClassAttributes {
            crn: "10234".into(),
            status: "Open".into(),
            course_code: "COMP 1405".into(),
            section: "A".into(),
            title: "Intro Programming".into(),
            credits: "0.500".into(),
            class_type: "Lecture".into(),
            hybrid: None,
            online: Some(false),
            instructor: "TBD".into(),
        }
    }

    fn meeting(days: &str) -> MeetingTime {
        MeetingTime {
            days: days.into(),
            ..Default::default()
        }
    }

    #[test]
    fn one_record_per_meeting() {
        let recs = expand(&class(), vec![meeting("M"), meeting("W"), meeting("F")], "info");
        assert_eq!(recs.len(), 3);
        let days: Vec<&str> = recs.iter().map(|r| r.days.as_str()).collect();
        assert_eq!(days, ["M", "W", "F"]);
        assert!(recs.iter().all(|r| r.crn == "10234" && r.title == "Intro Programming"));
        assert!(recs.iter().all(|r| r.section_info == "info"));
    }

    #[test]
    fn no_meetings_no_records() {
        assert!(expand(&class(), Vec::new(), "Section Information: ONLINE").is_empty());
    }
}
