//! Report builders behind the `geofence` binary.
//!
//! Each function takes parsed inputs and returns a serializable report; the
//! binary only handles argument parsing and I/O.

use foundation::math::{Coordinate, distance_meters};
use foundation::units::{format_distance_label, format_distance_miles, meters_to_miles};
use proximity::presets::{LIVE_CHAT_ROOM_PRESETS, find_teleport_preset};
use proximity::room::rooms_from_records_lossy;
use proximity::{
    AccessResult, Direction, ProximityEngine, ProximityError, Room, RoomRecord,
    nearest_eligible_room,
};
use serde::Serialize;

/// Parses a JSON array of backend room records. Records that fail
/// validation are logged and skipped.
pub fn load_rooms(json: &str) -> Result<Vec<Room>, ProximityError> {
    let records: Vec<RoomRecord> = serde_json::from_str(json)?;
    Ok(rooms_from_records_lossy(records))
}

pub fn viewer(lat: f64, lon: f64, accuracy: Option<f64>) -> Result<Coordinate, ProximityError> {
    Ok(Coordinate::try_new(lat, lon, accuracy)?)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceReport {
    pub distance_meters: f64,
    pub label: Option<String>,
    pub miles: Option<f64>,
}

pub fn distance_report(a: &Coordinate, b: &Coordinate) -> DistanceReport {
    let d = distance_meters(a, b);
    DistanceReport {
        distance_meters: d,
        label: format_distance_label(d),
        miles: meters_to_miles(d),
    }
}

/// Looks the room up by id and evaluates it. An unknown id evaluates as
/// "no room selected".
pub fn evaluate_report(
    engine: &ProximityEngine,
    rooms: &[Room],
    room_id: &str,
    viewer: Option<&Coordinate>,
) -> AccessResult {
    let room = rooms.iter().find(|r| r.id == room_id);
    engine.evaluate(room, viewer)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub global: bool,
    pub distance_meters: Option<f64>,
    /// `None` when the score is unbounded (no measured distance).
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReport {
    pub active: Option<Room>,
    pub candidates: Vec<Candidate>,
    pub nearest: Option<String>,
}

pub fn resolve_report(
    engine: &ProximityEngine,
    rooms: &[Room],
    viewer: Option<&Coordinate>,
) -> ResolveReport {
    let candidates = engine
        .rank(rooms, viewer)
        .into_iter()
        .map(|ranked| Candidate {
            id: ranked.room.id.clone(),
            name: ranked.room.name.clone(),
            global: ranked.room.is_borderless(),
            distance_meters: ranked.access.distance_meters(),
            score: ranked.score.is_finite().then_some(ranked.score),
        })
        .collect();

    ResolveReport {
        active: engine.resolve(rooms, viewer).cloned(),
        candidates,
        nearest: nearest_eligible_room(rooms, viewer).map(|r| r.id.clone()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    pub location: Coordinate,
    pub moved: bool,
    pub message: String,
}

pub fn shift_report(
    engine: &ProximityEngine,
    source: &Coordinate,
    direction: Direction,
    step_meters: Option<f64>,
) -> Option<ShiftReport> {
    let step = step_meters.unwrap_or(engine.config().step_meters);
    let shifted = engine.shift(source, direction, step)?;
    let location = shifted.into_owned();
    let moved = !foundation::math::coordinates_equal(source, &location);
    let message = match format_distance_miles(step, 1) {
        Some(miles) if moved => format!("Moved {direction} by roughly {miles} miles."),
        _ => "Location unchanged.".to_string(),
    };
    Some(ShiftReport {
        location,
        moved,
        message,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetAssignment {
    pub key: &'static str,
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetReport {
    pub matched: Vec<PresetAssignment>,
    /// Drafts for presets that have no room yet.
    pub missing: Vec<RoomRecord>,
    pub unmatched: Vec<String>,
    pub selected: Option<&'static str>,
}

pub fn preset_report(
    engine: &ProximityEngine,
    rooms: &[Room],
    preferred: Option<&str>,
    viewer: Option<&Coordinate>,
) -> PresetReport {
    let result = engine.match_presets(rooms, &LIVE_CHAT_ROOM_PRESETS);
    let selected = result.select_key(preferred, viewer, engine.evaluator());
    PresetReport {
        matched: result
            .matched
            .iter()
            .map(|(key, room)| PresetAssignment {
                key: *key,
                room_id: room.id.clone(),
            })
            .collect(),
        missing: result
            .missing
            .iter()
            .map(|p| RoomRecord::from(&p.draft_room()))
            .collect(),
        unmatched: result.unmatched.iter().map(|r| r.id.clone()).collect(),
        selected,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeleportReport {
    pub location: Coordinate,
    pub message: &'static str,
    pub active: Option<Room>,
}

pub fn teleport_report(
    engine: &ProximityEngine,
    rooms: &[Room],
    key: &str,
) -> Result<TeleportReport, String> {
    let preset = find_teleport_preset(key).ok_or_else(|| format!("unknown teleport: {key}"))?;
    let location = preset.location();
    Ok(TeleportReport {
        location,
        message: preset.status_message,
        active: engine.resolve(rooms, Some(&location)).cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        distance_report, evaluate_report, load_rooms, preset_report, resolve_report,
        shift_report, teleport_report, viewer,
    };
    use foundation::math::Coordinate;
    use pretty_assertions::assert_eq;
    use proximity::{Direction, ProximityEngine};

    const ROOMS: &str = r#"[
        {"_id": "g", "name": "Global Debug Lounge A", "isGlobal": true, "radiusMeters": 40000000,
         "coordinates": {"type": "Point", "coordinates": [0, 0]}, "presetKey": "global-a"},
        {"_id": "lb", "name": "Long Beach Chat Room", "radiusMeters": 3000,
         "coordinates": {"type": "Point", "coordinates": [-118.193739, 33.77005]},
         "participantIds": ["u1", "u2"]},
        {"_id": "lb-dup", "name": "long beach chat room ", "radiusMeters": 3000,
         "coordinates": {"type": "Point", "coordinates": [-118.193739, 33.77005]}},
        {"_id": "broken", "name": "Broken", "radiusMeters": -1}
    ]"#;

    #[test]
    fn load_skips_invalid_records() {
        let rooms = load_rooms(ROOMS).unwrap();
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["g", "lb", "lb-dup"]);
        assert!(load_rooms("{not json").is_err());
    }

    #[test]
    fn viewer_rejects_out_of_range() {
        assert!(viewer(95.0, 0.0, None).is_err());
        assert_eq!(viewer(1.0, 2.0, Some(5.0)).unwrap().accuracy, Some(5.0));
    }

    #[test]
    fn distance_report_labels() {
        let report = distance_report(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 1.0));
        assert_eq!(report.label.as_deref(), Some("111 km"));
        assert!((report.miles.unwrap() - 69.09).abs() < 0.05);
    }

    #[test]
    fn evaluate_unknown_room_asks_for_selection() {
        let rooms = load_rooms(ROOMS).unwrap();
        let engine = ProximityEngine::default();
        let result = evaluate_report(&engine, &rooms, "missing", None);
        assert_eq!(result.reason.as_deref(), Some("Select a chat room to begin."));
    }

    #[test]
    fn resolve_report_lists_candidates() {
        let rooms = load_rooms(ROOMS).unwrap();
        let engine = ProximityEngine::default();
        let here = Coordinate::new(33.7701, -118.1937);
        let report = resolve_report(&engine, &rooms, Some(&here));

        assert_eq!(report.active.as_ref().map(|r| r.id.as_str()), Some("lb"));
        let ids: Vec<&str> = report.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["lb", "lb-dup", "g"]);
        assert_eq!(report.candidates[2].score, None);
        assert_eq!(report.nearest.as_deref(), Some("lb"));
    }

    #[test]
    fn shift_report_messages() {
        let engine = ProximityEngine::default();
        let origin = Coordinate::new(33.77005, -118.193739);
        let report = shift_report(&engine, &origin, Direction::North, None).unwrap();
        assert!(report.moved);
        assert_eq!(report.message, "Moved north by roughly 2.0 miles.");

        let still = shift_report(&engine, &origin, Direction::East, Some(0.0)).unwrap();
        assert!(!still.moved);
        assert_eq!(still.location, origin);
    }

    #[test]
    fn preset_report_collapses_duplicates_and_lists_drafts() {
        let rooms = load_rooms(ROOMS).unwrap();
        let engine = ProximityEngine::default();
        let report = preset_report(&engine, &rooms, None, None);

        let matched: Vec<(&str, &str)> = report
            .matched
            .iter()
            .map(|m| (m.key, m.room_id.as_str()))
            .collect();
        assert_eq!(matched, vec![("global-a", "g"), ("long-beach", "lb")]);
        assert_eq!(report.missing.len(), 5);
        assert!(report.unmatched.is_empty());
        assert_eq!(report.selected, Some("global-a"));
    }

    #[test]
    fn teleport_lands_in_room() {
        let rooms = load_rooms(ROOMS).unwrap();
        let engine = ProximityEngine::default();
        let report = teleport_report(&engine, &rooms, "long-beach").unwrap();
        assert_eq!(report.message, "Location spoofed to Long Beach, CA.");
        assert_eq!(report.active.map(|r| r.id), Some("lb".to_string()));
        assert!(teleport_report(&engine, &rooms, "mars").is_err());
    }
}
