use std::borrow::Cow;

use foundation::math::Coordinate;
use tracing::{debug, warn};

use crate::access::{AccessResult, RoomAccessEvaluator};
use crate::config::EngineConfig;
use crate::presets::{PresetMatch, RoomPreset, match_presets};
use crate::reconcile::dedupe;
use crate::resolver::{RankedRoom, rank_rooms, resolve_active_room};
use crate::room::Room;
use crate::shift::{Direction, shift};

/// Configured entry point bundling the evaluator, resolver, reconciler and
/// shifter. Holds no state besides its configuration.
#[derive(Debug, Clone, Default)]
pub struct ProximityEngine {
    config: EngineConfig,
    evaluator: RoomAccessEvaluator,
}

impl ProximityEngine {
    pub fn new(config: EngineConfig) -> Self {
        let evaluator = RoomAccessEvaluator::new(config.access_policy);
        Self { config, evaluator }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &RoomAccessEvaluator {
        &self.evaluator
    }

    pub fn evaluate(&self, room: Option<&Room>, viewer: Option<&Coordinate>) -> AccessResult {
        self.evaluator.evaluate(room, viewer)
    }

    fn bounded<'a>(&self, rooms: &'a [Room]) -> &'a [Room] {
        match self.config.max_rooms {
            Some(max) if rooms.len() > max => {
                warn!(total = rooms.len(), max, "room list exceeds max_rooms; truncating");
                &rooms[..max]
            }
            _ => rooms,
        }
    }

    pub fn resolve<'a>(&self, rooms: &'a [Room], viewer: Option<&Coordinate>) -> Option<&'a Room> {
        resolve_active_room(&self.evaluator, self.bounded(rooms), viewer)
    }

    pub fn rank<'a>(&self, rooms: &'a [Room], viewer: Option<&Coordinate>) -> Vec<RankedRoom<'a>> {
        rank_rooms(&self.evaluator, self.bounded(rooms), viewer)
    }

    pub fn dedupe(&self, rooms: &[Room]) -> Vec<Room> {
        let out = dedupe(rooms);
        debug!(input = rooms.len(), output = out.len(), "deduplicated rooms");
        out
    }

    pub fn shift<'a>(
        &self,
        source: &'a Coordinate,
        direction: Direction,
        step_meters: f64,
    ) -> Option<Cow<'a, Coordinate>> {
        shift(source, direction, step_meters)
    }

    /// Shift by the configured step.
    pub fn step<'a>(
        &self,
        source: &'a Coordinate,
        direction: Direction,
    ) -> Option<Cow<'a, Coordinate>> {
        shift(source, direction, self.config.step_meters)
    }

    pub fn match_presets(&self, rooms: &[Room], presets: &[RoomPreset]) -> PresetMatch {
        match_presets(rooms, presets)
    }
}

#[cfg(test)]
mod tests {
    use super::ProximityEngine;
    use crate::access::AccessPolicy;
    use crate::config::EngineConfig;
    use crate::room::Room;
    use crate::shift::Direction;
    use foundation::math::{Coordinate, distance_meters};

    fn fenced(id: &str, lon: f64) -> Room {
        Room::new(id, id)
            .with_center(Coordinate::new(0.0, lon))
            .with_radius(5_000.0)
    }

    #[test]
    fn max_rooms_bounds_resolution() {
        let rooms = vec![fenced("far", 0.03), fenced("near", 0.0)];
        let viewer = Coordinate::new(0.0, 0.0);

        let unbounded = ProximityEngine::default();
        assert_eq!(unbounded.resolve(&rooms, Some(&viewer)).unwrap().id, "near");

        let bounded = ProximityEngine::new(EngineConfig {
            max_rooms: Some(1),
            ..Default::default()
        });
        assert_eq!(bounded.resolve(&rooms, Some(&viewer)).unwrap().id, "far");
        assert_eq!(bounded.rank(&rooms, Some(&viewer)).len(), 1);
    }

    #[test]
    fn step_uses_configured_distance() {
        let engine = ProximityEngine::new(EngineConfig {
            step_meters: 1000.0,
            ..Default::default()
        });
        let origin = Coordinate::new(10.0, 20.0);
        let moved = engine.step(&origin, Direction::North).unwrap();
        assert!((distance_meters(&origin, &moved) - 1000.0).abs() < 0.5);
    }

    #[test]
    fn policy_flows_into_evaluator() {
        let engine = ProximityEngine::new(EngineConfig {
            access_policy: AccessPolicy::Strict,
            ..Default::default()
        });
        let blank = Room::new("blank", "No center");
        assert!(!engine.evaluate(Some(&blank), None).allowed);
        assert!(ProximityEngine::default().evaluate(Some(&blank), None).allowed);
    }

    #[test]
    fn simulated_walk_moves_between_rooms() {
        let engine = ProximityEngine::new(EngineConfig {
            step_meters: 3_000.0,
            ..Default::default()
        });
        let rooms = vec![
            Room::new("lounge", "Lounge").global(),
            fenced("west", 0.0),
            fenced("east", 0.06),
        ];

        let start = Coordinate::new(0.0, 0.0);
        assert_eq!(engine.resolve(&rooms, Some(&start)).unwrap().id, "west");

        let one = engine.step(&start, Direction::East).unwrap().into_owned();
        let two = engine.step(&one, Direction::East).unwrap().into_owned();
        assert_eq!(engine.resolve(&rooms, Some(&two)).unwrap().id, "east");

        let lost = engine
            .shift(&two, Direction::North, 50_000.0)
            .unwrap()
            .into_owned();
        assert_eq!(engine.resolve(&rooms, Some(&lost)).unwrap().id, "lounge");
    }
}
