//! Proximity and geofencing engine for location-scoped chat rooms.
//!
//! Everything here is a pure function of caller-supplied snapshots: room
//! records and a viewer coordinate in, decisions out.

pub mod access;
pub mod config;
pub mod engine;
pub mod error;
pub mod presets;
pub mod reconcile;
pub mod resolver;
pub mod room;
pub mod shift;

pub use access::{
    Access, AccessInfo, AccessPolicy, AccessResult, Denial, Indeterminate, RoomAccessEvaluator,
};
pub use config::EngineConfig;
pub use engine::ProximityEngine;
pub use error::ProximityError;
pub use presets::{PresetMatch, RoomPreset, TeleportPreset};
pub use reconcile::{RoomKey, dedupe, normalize_room_name};
pub use resolver::{RankedRoom, is_global_chat_room, nearest_eligible_room, resolve_active_room};
pub use room::{GeoPoint, Room, RoomRecord};
pub use shift::{DEFAULT_STEP_METERS, Direction, shift, shift_named};
