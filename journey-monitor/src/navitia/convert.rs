//! Conversion from Navitia DTOs to the normalized domain type.

use crate::domain::{
    NormalizedJourney, delay_minutes, duration_minutes, parse_navitia_datetime,
};

use super::types::{RawJourney, Section};

/// Normalize one raw journey.
///
/// Returns `None` for journeys that are not direct (anything other than
/// exactly one section): transfers are not supported, and such journeys are
/// excluded from the result set entirely rather than partially represented.
///
/// Everything else degrades instead of failing: unparseable timestamps
/// become unknown, a missing train number becomes the empty string, and an
/// unknown delay is reported as zero.
pub fn normalize(raw: &RawJourney) -> Option<NormalizedJourney> {
    let [section] = raw.sections.as_slice() else {
        return None;
    };

    let departure = parse_opt(raw.departure_date_time.as_deref());
    let arrival = parse_opt(raw.arrival_date_time.as_deref());
    let scheduled_departure = parse_opt(section.base_departure_date_time.as_deref());
    let scheduled_arrival = parse_opt(section.base_arrival_date_time.as_deref());

    let info = section.display_informations.as_ref();

    Some(NormalizedJourney {
        departure,
        arrival,
        scheduled_departure,
        scheduled_arrival,
        delay_minutes: delay_minutes(arrival, scheduled_arrival),
        duration_minutes: duration_minutes(departure, arrival),
        train_number: train_number(raw, section),
        direction: info.and_then(|i| i.direction.clone()).unwrap_or_default(),
        physical_mode: info
            .and_then(|i| i.physical_mode.clone())
            .unwrap_or_default(),
        commercial_mode: info
            .and_then(|i| i.commercial_mode.clone())
            .unwrap_or_default(),
        cancelled: raw.status.as_deref() == Some("cancelled"),
        section_id: section.id.clone(),
        origin_name: section.origin.as_ref().and_then(|p| p.name.clone()),
    })
}

/// Extract the commercial train number.
///
/// Preference order: journey-level `trip_short_name`, then the section's
/// display `trip_short_name`, then its `num`. Empty strings count as absent
/// at each step except the last.
fn train_number(raw: &RawJourney, section: &Section) -> String {
    if let Some(num) = raw.trip_short_name.as_deref().filter(|s| !s.is_empty()) {
        return num.to_string();
    }

    let Some(info) = section.display_informations.as_ref() else {
        return String::new();
    };

    info.trip_short_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(info.num.as_deref())
        .unwrap_or_default()
        .to_string()
}

fn parse_opt(s: Option<&str>) -> Option<chrono::NaiveDateTime> {
    s.and_then(parse_navitia_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navitia::types::{DisplayInformations, Place};

    fn direct_journey() -> RawJourney {
        RawJourney {
            departure_date_time: Some("20260315T070500".to_string()),
            arrival_date_time: Some("20260315T084200".to_string()),
            trip_short_name: Some("6607".to_string()),
            status: None,
            sections: vec![Section {
                id: Some("section_0".to_string()),
                base_departure_date_time: Some("20260315T070000".to_string()),
                base_arrival_date_time: Some("20260315T083000".to_string()),
                display_informations: Some(DisplayInformations {
                    direction: Some("Marseille St-Charles".to_string()),
                    physical_mode: Some("TGV".to_string()),
                    commercial_mode: Some("TGV INOUI".to_string()),
                    trip_short_name: Some("6607".to_string()),
                    num: Some("6607".to_string()),
                    headsign: None,
                }),
                origin: Some(Place {
                    id: Some("stop_area:SNCF:87686006".to_string()),
                    name: Some("Paris Gare de Lyon".to_string()),
                }),
            }],
        }
    }

    #[test]
    fn normalize_direct_journey() {
        let journey = normalize(&direct_journey()).unwrap();

        assert_eq!(journey.train_number, "6607");
        assert_eq!(journey.direction, "Marseille St-Charles");
        assert_eq!(journey.physical_mode, "TGV");
        assert_eq!(journey.commercial_mode, "TGV INOUI");
        // 08:42 real vs 08:30 base
        assert_eq!(journey.delay_minutes, 12);
        assert!(journey.has_delay());
        // 07:05 -> 08:42
        assert_eq!(journey.duration_minutes, 97);
        assert!(!journey.cancelled);
        assert_eq!(journey.section_id.as_deref(), Some("section_0"));
        assert_eq!(journey.origin_name.as_deref(), Some("Paris Gare de Lyon"));
    }

    #[test]
    fn journey_with_transfer_is_excluded() {
        let mut raw = direct_journey();
        raw.sections.push(Section::default());

        assert!(normalize(&raw).is_none());
    }

    #[test]
    fn journey_without_sections_is_excluded() {
        let mut raw = direct_journey();
        raw.sections.clear();

        assert!(normalize(&raw).is_none());
    }

    #[test]
    fn early_arrival_reports_no_delay() {
        let mut raw = direct_journey();
        raw.arrival_date_time = Some("20260315T082000".to_string());

        let journey = normalize(&raw).unwrap();
        assert_eq!(journey.delay_minutes, 0);
        assert!(!journey.has_delay());
    }

    #[test]
    fn unparseable_timestamps_degrade() {
        let mut raw = direct_journey();
        raw.arrival_date_time = Some("garbage".to_string());
        raw.sections[0].base_arrival_date_time = None;

        let journey = normalize(&raw).unwrap();
        assert!(journey.arrival.is_none());
        assert!(journey.scheduled_arrival.is_none());
        assert_eq!(journey.delay_minutes, 0);
        assert_eq!(journey.duration_minutes, 0);
        assert_eq!(journey.arrival_display(), "N/A");
    }

    #[test]
    fn train_number_falls_back_to_section_fields() {
        // Journey-level name wins
        let raw = direct_journey();
        assert_eq!(normalize(&raw).unwrap().train_number, "6607");

        // Empty journey-level name falls through to the section
        let mut raw = direct_journey();
        raw.trip_short_name = Some(String::new());
        let info = raw.sections[0].display_informations.as_mut().unwrap();
        info.trip_short_name = Some("867412".to_string());
        assert_eq!(normalize(&raw).unwrap().train_number, "867412");

        // Section short name absent falls through to num
        let mut raw = direct_journey();
        raw.trip_short_name = None;
        let info = raw.sections[0].display_informations.as_mut().unwrap();
        info.trip_short_name = None;
        info.num = Some("867412".to_string());
        assert_eq!(normalize(&raw).unwrap().train_number, "867412");

        // Nothing anywhere yields empty
        let mut raw = direct_journey();
        raw.trip_short_name = None;
        raw.sections[0].display_informations = None;
        assert_eq!(normalize(&raw).unwrap().train_number, "");
    }

    #[test]
    fn cancelled_status_is_carried() {
        let mut raw = direct_journey();
        raw.status = Some("cancelled".to_string());
        assert!(normalize(&raw).unwrap().cancelled);

        raw.status = Some("on_time".to_string());
        assert!(!normalize(&raw).unwrap().cancelled);
    }

    #[test]
    fn normalize_is_idempotent() {
        let raw = direct_journey();
        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
