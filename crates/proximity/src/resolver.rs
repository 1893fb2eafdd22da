use foundation::math::precision::stable_total_cmp_f64;
use foundation::math::{Coordinate, distance_meters};
use tracing::{debug, trace};

use crate::access::{Access, RoomAccessEvaluator};
use crate::room::Room;

/// Score penalty keeping global rooms behind any admitted fenced room.
const GLOBAL_ROOM_PENALTY_M: f64 = 1_000_000.0;

pub fn is_global_chat_room(room: &Room) -> bool {
    room.is_borderless()
}

/// An admitted room together with how it ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRoom<'a> {
    pub room: &'a Room,
    pub access: Access,
    pub score: f64,
}

fn score(room: &Room, access: &Access) -> f64 {
    let distance = access.distance_meters().unwrap_or(f64::INFINITY);
    if is_global_chat_room(room) {
        distance + GLOBAL_ROOM_PENALTY_M
    } else {
        distance
    }
}

/// Every room the viewer may enter, best first.
///
/// The sort is stable, so equal scores keep their input order.
pub fn rank_rooms<'a>(
    evaluator: &RoomAccessEvaluator,
    rooms: &'a [Room],
    viewer: Option<&Coordinate>,
) -> Vec<RankedRoom<'a>> {
    let mut ranked: Vec<RankedRoom<'a>> = rooms
        .iter()
        .filter_map(|room| {
            let access = evaluator.classify(Some(room), viewer);
            if !access.is_allowed(evaluator.policy) {
                trace!(room = %room.id, "room not admitted");
                return None;
            }
            let score = score(room, &access);
            Some(RankedRoom {
                room,
                access,
                score,
            })
        })
        .collect();
    ranked.sort_by(|a, b| stable_total_cmp_f64(a.score, b.score));
    ranked
}

/// Picks the single active room for `viewer`.
///
/// Ordering contract:
/// - Only rooms the evaluator admits are candidates.
/// - Lowest score wins; a fenced room with a known distance always beats a
///   global room.
/// - Ties go to the earliest room in `rooms`.
pub fn resolve_active_room<'a>(
    evaluator: &RoomAccessEvaluator,
    rooms: &'a [Room],
    viewer: Option<&Coordinate>,
) -> Option<&'a Room> {
    let mut best: Option<(f64, &'a Room)> = None;

    for room in rooms {
        let access = evaluator.classify(Some(room), viewer);
        if !access.is_allowed(evaluator.policy) {
            continue;
        }
        let s = score(room, &access);
        best = match best {
            Some((bs, br)) if !stable_total_cmp_f64(s, bs).is_lt() => Some((bs, br)),
            _ => Some((s, room)),
        };
    }

    let (s, room) = best?;
    debug!(room = %room.id, score = s, "resolved active room");
    Some(room)
}

/// Nearest room by center distance, ignoring geofence admission.
///
/// Rooms without a center and event/discussion rooms are skipped. Returns
/// `None` when the viewer location is missing or unusable.
pub fn nearest_eligible_room<'a>(
    rooms: &'a [Room],
    viewer: Option<&Coordinate>,
) -> Option<&'a Room> {
    let viewer = viewer.filter(|v| v.is_finite())?;

    let mut best: Option<(f64, &'a Room)> = None;
    for room in rooms {
        if room.is_event_or_discussion() {
            continue;
        }
        let Some(center) = room.usable_center() else {
            continue;
        };
        let d = distance_meters(viewer, center);
        if best.is_none_or(|(bd, _)| stable_total_cmp_f64(d, bd).is_lt()) {
            best = Some((d, room));
        }
    }
    best.map(|(_, room)| room)
}
