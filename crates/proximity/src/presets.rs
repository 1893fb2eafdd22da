//! Well-known rooms and teleport targets used by the simulation tools.

use foundation::math::Coordinate;
use serde::Serialize;
use tracing::debug;

use crate::access::RoomAccessEvaluator;
use crate::reconcile::{dedupe, normalize_room_name};
use crate::room::Room;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPreset {
    pub key: &'static str,
    pub label: &'static str,
    pub name: &'static str,
    /// Older names the same room has been created under.
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub is_global: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub radius_meters: f64,
}

pub const LIVE_CHAT_ROOM_PRESETS: [RoomPreset; 7] = [
    RoomPreset {
        key: "global-a",
        label: "Global Room A",
        name: "Global Debug Lounge A",
        aliases: &["Global Debug Lounge"],
        description: "Global lounge for debugging (Room A).",
        is_global: true,
        latitude: 0.0,
        longitude: 0.0,
        accuracy: 0.0,
        radius_meters: 40_000_000.0,
    },
    RoomPreset {
        key: "global-b",
        label: "Global Room B",
        name: "Global Debug Lounge B",
        aliases: &["Global Debug Lounge B"],
        description: "Second global lounge for debugging (Room B).",
        is_global: true,
        latitude: 0.0,
        longitude: 0.0,
        accuracy: 0.0,
        radius_meters: 40_000_000.0,
    },
    RoomPreset {
        key: "long-beach",
        label: "Long Beach, CA",
        name: "Long Beach Debug Chat",
        aliases: &["Long Beach,California Chat Room", "Long Beach Chat Room"],
        description: "Geofenced chat near Long Beach, CA for proximity testing.",
        is_global: false,
        latitude: 33.77005,
        longitude: -118.193739,
        accuracy: 10.0,
        radius_meters: 3000.0,
    },
    RoomPreset {
        key: "shoreline-village",
        label: "Shoreline Village",
        name: "Long Beach Shoreline Village Chat",
        aliases: &["Shoreline Village Chat", "Downtown Waterfront Chat"],
        description: "Waterfront chats along Shoreline Village for short hops between rooms.",
        is_global: false,
        latitude: 33.7633,
        longitude: -118.1899,
        accuracy: 12.0,
        radius_meters: 1200.0,
    },
    RoomPreset {
        key: "belmont-shore",
        label: "Belmont Shore",
        name: "Belmont Shore Meetups",
        aliases: &["Belmont Shore Chat", "Belmont Shore Debug"],
        description: "Beachside chat circle for Belmont Shore events and meetups.",
        is_global: false,
        latitude: 33.7603,
        longitude: -118.1309,
        accuracy: 12.0,
        radius_meters: 1400.0,
    },
    RoomPreset {
        key: "signal-hill",
        label: "Signal Hill Overlook",
        name: "Signal Hill Lookout Chat",
        aliases: &["Signal Hill Chat Room"],
        description: "Hilltop coverage for short-distance transitions.",
        is_global: false,
        latitude: 33.8044,
        longitude: -118.1678,
        accuracy: 12.0,
        radius_meters: 1300.0,
    },
    RoomPreset {
        key: "csulb",
        label: "CSULB Campus",
        name: "CSULB Campus Chat",
        aliases: &["Campus Chat Room", "Long Beach State Chat"],
        description: "Geofenced room covering the Cal State Long Beach campus.",
        is_global: false,
        latitude: 33.7838,
        longitude: -118.1141,
        accuracy: 12.0,
        radius_meters: 1600.0,
    },
];

impl RoomPreset {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude).with_accuracy(self.accuracy)
    }

    /// Room to submit when the preset does not exist yet. The id is left
    /// empty for the backend to assign.
    pub fn draft_room(&self) -> Room {
        let room = Room::new("", self.name)
            .with_center(Coordinate::new(self.latitude, self.longitude))
            .with_radius(self.radius_meters)
            .with_preset_key(self.key);
        if self.is_global { room.global() } else { room }
    }

    fn matches_name(&self, name: &str) -> bool {
        let target = normalize_room_name(name);
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .any(|candidate| normalize_room_name(candidate) == target)
    }
}

pub fn find_room_preset(key: &str) -> Option<&'static RoomPreset> {
    LIVE_CHAT_ROOM_PRESETS.iter().find(|p| p.key == key)
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeleportPreset {
    pub key: &'static str,
    pub label: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub status_message: &'static str,
}

pub const DEFAULT_LOCATION_TELEPORT_KEY: &str = "default-location";

pub const TELEPORT_PRESETS: [TeleportPreset; 6] = [
    TeleportPreset {
        key: "long-beach",
        label: "Teleport user location to Long Beach, California",
        latitude: 33.77005,
        longitude: -118.193739,
        accuracy: 12.0,
        status_message: "Location spoofed to Long Beach, CA.",
    },
    TeleportPreset {
        key: "shoreline-village",
        label: "Teleport to Shoreline Village waterfront",
        latitude: 33.7633,
        longitude: -118.1899,
        accuracy: 12.0,
        status_message: "Location spoofed to Long Beach Shoreline Village.",
    },
    TeleportPreset {
        key: "belmont-shore",
        label: "Teleport to Belmont Shore",
        latitude: 33.7603,
        longitude: -118.1309,
        accuracy: 12.0,
        status_message: "Location spoofed to Belmont Shore.",
    },
    TeleportPreset {
        key: "csulb-campus",
        label: "Teleport to CSULB campus",
        latitude: 33.7838,
        longitude: -118.1141,
        accuracy: 12.0,
        status_message: "Location spoofed to the CSULB campus.",
    },
    TeleportPreset {
        key: "signal-hill",
        label: "Teleport to Signal Hill overlook",
        latitude: 33.8044,
        longitude: -118.1678,
        accuracy: 12.0,
        status_message: "Location spoofed to Signal Hill.",
    },
    TeleportPreset {
        key: DEFAULT_LOCATION_TELEPORT_KEY,
        label: "Default location sharing",
        latitude: 33.7838,
        longitude: -118.1136,
        accuracy: 15.0,
        status_message: "Location reset to the default debug coordinates.",
    },
];

impl TeleportPreset {
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude).with_accuracy(self.accuracy)
    }
}

pub fn find_teleport_preset(key: &str) -> Option<&'static TeleportPreset> {
    TELEPORT_PRESETS.iter().find(|p| p.key == key)
}

/// Outcome of mapping a room listing onto a preset catalogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetMatch {
    /// Preset key and its room, in catalogue order. Rooms carry the key.
    pub matched: Vec<(&'static str, Room)>,
    /// Presets with no existing room; callers create these from `draft_room`.
    pub missing: Vec<RoomPreset>,
    /// Rooms not claimed by any preset.
    pub unmatched: Vec<Room>,
}

/// Claims one room per preset.
///
/// The listing is deduplicated first. For each preset in order, the first
/// remaining room with the same preset key is claimed; failing that, the
/// first remaining room whose normalized name equals the preset name or one
/// of its aliases. A room is claimed at most once.
pub fn match_presets(rooms: &[Room], presets: &[RoomPreset]) -> PresetMatch {
    let mut remaining = dedupe(rooms);
    let mut out = PresetMatch::default();

    for preset in presets {
        let idx = remaining
            .iter()
            .position(|r| r.preset_key() == Some(preset.key))
            .or_else(|| remaining.iter().position(|r| preset.matches_name(&r.name)));

        match idx {
            Some(idx) => {
                let mut room = remaining.remove(idx);
                room.preset_key = Some(preset.key.to_string());
                out.matched.push((preset.key, room));
            }
            None => out.missing.push(*preset),
        }
    }

    debug!(
        matched = out.matched.len(),
        missing = out.missing.len(),
        "matched rooms to presets"
    );
    out.unmatched = remaining;
    out
}

impl PresetMatch {
    pub fn room(&self, key: &str) -> Option<&Room> {
        self.matched
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, room)| room)
    }

    /// Preset key to select for `viewer`.
    ///
    /// The preferred key wins when it was matched; otherwise the first
    /// matched preset whose room admits the viewer, otherwise the first
    /// matched preset.
    pub fn select_key(
        &self,
        preferred: Option<&str>,
        viewer: Option<&Coordinate>,
        evaluator: &RoomAccessEvaluator,
    ) -> Option<&'static str> {
        if let Some(pref) = preferred
            && let Some((key, _)) = self.matched.iter().find(|(k, _)| *k == pref)
        {
            return Some(*key);
        }

        self.matched
            .iter()
            .find(|(_, room)| evaluator.evaluate(Some(room), viewer).allowed)
            .or_else(|| self.matched.first())
            .map(|(key, _)| *key)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        LIVE_CHAT_ROOM_PRESETS, PresetMatch, RoomPreset, TELEPORT_PRESETS, find_room_preset,
        find_teleport_preset, match_presets,
    };
    use crate::access::{AccessPolicy, RoomAccessEvaluator};
    use crate::resolver::resolve_active_room;
    use crate::room::Room;
    use foundation::math::Coordinate;
    use pretty_assertions::assert_eq;

    fn long_beach_presets() -> Vec<RoomPreset> {
        LIVE_CHAT_ROOM_PRESETS
            .iter()
            .filter(|p| !p.is_global)
            .copied()
            .collect()
    }

    #[test]
    fn preset_keys_are_unique() {
        let mut keys: Vec<&str> = LIVE_CHAT_ROOM_PRESETS.iter().map(|p| p.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), LIVE_CHAT_ROOM_PRESETS.len());
    }

    #[test]
    fn matches_by_key_then_alias_and_reports_missing() {
        let rooms = vec![
            Room::new("r1", "Long Beach Chat Room").with_participants(4),
            Room::new("r2", "Anything").with_preset_key("csulb"),
            Room::new("r3", "shoreline village chat"),
            Room::new("r4", "Unrelated Room"),
        ];
        let presets = long_beach_presets();
        let result = match_presets(&rooms, &presets);

        let matched: Vec<(&str, &str)> = result
            .matched
            .iter()
            .map(|(k, r)| (*k, r.id.as_str()))
            .collect();
        assert_eq!(
            matched,
            vec![
                ("long-beach", "r1"),
                ("shoreline-village", "r3"),
                ("csulb", "r2"),
            ]
        );
        assert_eq!(
            result.room("long-beach").and_then(|r| r.preset_key()),
            Some("long-beach")
        );

        let missing: Vec<&str> = result.missing.iter().map(|p| p.key).collect();
        assert_eq!(missing, vec!["belmont-shore", "signal-hill"]);
        assert_eq!(result.unmatched.len(), 1);
        assert_eq!(result.unmatched[0].id, "r4");
    }

    #[test]
    fn preset_key_beats_name_match() {
        let rooms = vec![
            Room::new("by-name", "Signal Hill Lookout Chat"),
            Room::new("by-key", "Renamed").with_preset_key("signal-hill"),
        ];
        let presets = [*find_room_preset("signal-hill").unwrap()];
        let result = match_presets(&rooms, &presets);
        assert_eq!(result.matched[0].1.id, "by-key");
        assert_eq!(result.unmatched[0].id, "by-name");
    }

    #[test]
    fn draft_rooms_seed_a_full_catalogue() {
        let drafts: Vec<Room> = LIVE_CHAT_ROOM_PRESETS
            .iter()
            .map(|p| p.draft_room())
            .collect();
        let result = match_presets(&drafts, &LIVE_CHAT_ROOM_PRESETS);
        assert_eq!(result.matched.len(), LIVE_CHAT_ROOM_PRESETS.len());
        assert!(result.missing.is_empty());
        assert!(result.room("global-a").unwrap().is_global);
    }

    #[test]
    fn select_key_prefers_requested_then_accessible() {
        let drafts: Vec<Room> = LIVE_CHAT_ROOM_PRESETS
            .iter()
            .filter(|p| !p.is_global)
            .map(|p| p.draft_room())
            .collect();
        let result = match_presets(&drafts, &LIVE_CHAT_ROOM_PRESETS);
        let eval = RoomAccessEvaluator::default();

        let at_campus = find_teleport_preset("csulb-campus").unwrap().location();
        assert_eq!(
            result.select_key(Some("signal-hill"), Some(&at_campus), &eval),
            Some("signal-hill")
        );
        assert_eq!(
            result.select_key(Some("global-a"), Some(&at_campus), &eval),
            Some("csulb")
        );

        let nowhere = Coordinate::new(0.0, 0.0);
        assert_eq!(result.select_key(None, Some(&nowhere), &eval), Some("long-beach"));
        assert_eq!(PresetMatch::default().select_key(None, None, &eval), None);
    }

    #[test]
    fn teleports_land_in_their_rooms() {
        let rooms: Vec<Room> = LIVE_CHAT_ROOM_PRESETS
            .iter()
            .map(|p| p.draft_room())
            .collect();
        let eval = RoomAccessEvaluator::new(AccessPolicy::Strict);
        let cases = [
            ("long-beach", "Long Beach Debug Chat"),
            ("shoreline-village", "Long Beach Shoreline Village Chat"),
            ("belmont-shore", "Belmont Shore Meetups"),
            ("csulb-campus", "CSULB Campus Chat"),
            ("signal-hill", "Signal Hill Lookout Chat"),
        ];
        for (teleport, room_name) in cases {
            let loc = find_teleport_preset(teleport).unwrap().location();
            let active = resolve_active_room(&eval, &rooms, Some(&loc)).unwrap();
            assert_eq!(active.name, room_name, "teleport {teleport}");
        }
        assert_eq!(TELEPORT_PRESETS.len(), 6);
    }
}
