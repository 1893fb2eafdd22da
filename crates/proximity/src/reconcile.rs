use std::collections::HashMap;

use tracing::trace;

use crate::room::Room;

/// Identity under which room records are merged.
///
/// Preset keys and names live in separate namespaces, so a preset key that
/// happens to equal some room's normalized name never collides with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoomKey {
    PresetKey(String),
    NormalizedName(String),
}

impl RoomKey {
    pub fn for_room(room: &Room) -> Self {
        match room.preset_key() {
            Some(key) => RoomKey::PresetKey(key.to_string()),
            None => RoomKey::NormalizedName(normalize_room_name(&room.name)),
        }
    }
}

pub fn normalize_room_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when `candidate` should replace `current` for the same key.
fn prefers(candidate: &Room, current: &Room) -> bool {
    let candidate_has_preset = candidate.preset_key().is_some();
    let current_has_preset = current.preset_key().is_some();
    if candidate_has_preset != current_has_preset {
        return candidate_has_preset;
    }
    candidate.participants() > current.participants()
}

/// Collapses duplicate room records into one canonical list.
///
/// Ordering contract:
/// - Preset-keyed rooms come first, then name-keyed rooms.
/// - Within each group, keys appear in the order they were first seen.
/// - A slot keeps its first-seen room unless a later one is preferred
///   (has a preset key, or more participants).
pub fn dedupe(rooms: &[Room]) -> Vec<Room> {
    let mut by_preset: Vec<&Room> = Vec::new();
    let mut by_name: Vec<&Room> = Vec::new();
    let mut slots: HashMap<RoomKey, usize> = HashMap::new();

    for room in rooms {
        let key = RoomKey::for_room(room);
        let group = match key {
            RoomKey::PresetKey(_) => &mut by_preset,
            RoomKey::NormalizedName(_) => &mut by_name,
        };
        match slots.get(&key) {
            Some(&idx) => {
                if prefers(room, group[idx]) {
                    trace!(kept = %room.id, dropped = %group[idx].id, "duplicate room replaced");
                    group[idx] = room;
                }
            }
            None => {
                slots.insert(key, group.len());
                group.push(room);
            }
        }
    }

    by_preset.into_iter().chain(by_name).cloned().collect()
}
