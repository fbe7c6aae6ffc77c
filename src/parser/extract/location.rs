use super::meeting::MeetingTime;

pub const SEE_INSTRUCTOR: &str = "see instructor";
pub const ONLINE: &str = "ONLINE";
pub const NOT_APPLICABLE: &str = "N/A";

const IN_PERSON_MARKER: &str = "IN-PERSON";
const ONLINE_MARKER: &str = "ONLINE";

/// Placeholder location implied by the section annotation.
pub fn location_hint(section_info: &str) -> &'static str {
    if section_info.to_uppercase().contains(IN_PERSON_MARKER) {
        SEE_INSTRUCTOR
    } else if section_info.contains(ONLINE_MARKER) {
        ONLINE
    } else {
        NOT_APPLICABLE
    }
}

/// Fill empty building/room fields from the section annotation.
/// Values read from the meeting row itself are never replaced.
pub fn backfill(meetings: &mut [MeetingTime], section_info: &str) {
    let hint = location_hint(section_info);
    for m in meetings.iter_mut() {
        if m.building.is_empty() {
            m.building = hint.to_string();
        }
        if m.room.is_empty() {
            m.room = hint.to_string();
        }
    }
}

/// True for placeholder values that do not name a physical room.
pub fn is_placeholder(value: &str) -> bool {
    matches!(value, SEE_INSTRUCTOR | ONLINE | NOT_APPLICABLE)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> MeetingTime {
        MeetingTime {
            days: "MWF".into(),
            ..Default::default()
        }
    }

    #[test]
    fn hint_priority() {
        assert_eq!(location_hint("Section Information: in-person, ONLINE exam"), SEE_INSTRUCTOR);
        assert_eq!(location_hint("Section Information: ONLINE - asynchronous"), ONLINE);
        assert_eq!(location_hint("Section Information: Lab"), NOT_APPLICABLE);
        assert_eq!(location_hint(""), NOT_APPLICABLE);
    }

    #[test]
    fn online_backfill() {
        let mut ms = vec![bare(), bare()];
        backfill(&mut ms, "Section Information: This section is ONLINE");
        assert!(ms.iter().all(|m| m.building == ONLINE && m.room == ONLINE));
    }

    #[test]
    fn explicit_location_kept() {
        let mut ms = vec![
            MeetingTime {
                building: "HP".into(),
                room: "115".into(),
                ..bare()
            },
            bare(),
        ];
        backfill(&mut ms, "Section Information: IN-PERSON");
        assert_eq!(ms[0].building, "HP");
        assert_eq!(ms[0].room, "115");
        assert_eq!(ms[1].building, SEE_INSTRUCTOR);
        assert_eq!(ms[1].room, SEE_INSTRUCTOR);
    }

    #[test]
    fn placeholders() {
        assert!(is_placeholder(ONLINE));
        assert!(is_placeholder(NOT_APPLICABLE));
        assert!(!is_placeholder("HP"));
    }
}
