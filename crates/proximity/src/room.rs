use foundation::math::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ProximityError;

/// Radius (meters) from which a room is treated as borderless.
pub const GLOBAL_RADIUS_THRESHOLD_M: f64 = 40_000_000.0;

/// Immutable chat-room snapshot as seen by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
    #[serde(default)]
    pub is_global: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<u64>,
}

impl Room {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            center: None,
            radius_meters: None,
            is_global: false,
            preset_key: None,
            participant_count: None,
        }
    }

    pub fn with_center(mut self, center: Coordinate) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = Some(radius_meters);
        self
    }

    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    pub fn with_preset_key(mut self, key: impl Into<String>) -> Self {
        self.preset_key = Some(key.into());
        self
    }

    pub fn with_participants(mut self, count: u64) -> Self {
        self.participant_count = Some(count);
        self
    }

    /// Global flag set, or a radius large enough to cover the planet.
    pub fn is_borderless(&self) -> bool {
        self.is_global
            || self
                .radius_meters
                .is_some_and(|r| r >= GLOBAL_RADIUS_THRESHOLD_M)
    }

    /// Preset key, ignoring the empty string.
    pub fn preset_key(&self) -> Option<&str> {
        self.preset_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Center, if it is present and finite.
    pub fn usable_center(&self) -> Option<&Coordinate> {
        self.center.as_ref().filter(|c| c.is_finite())
    }

    pub fn participants(&self) -> u64 {
        self.participant_count.unwrap_or(0)
    }

    /// Event and discussion rooms are named `[event]: ...` / `[discussion]: ...`.
    pub fn is_event_or_discussion(&self) -> bool {
        let name = self.name.trim_start();
        let Some(rest) = name.strip_prefix('[') else {
            return false;
        };
        let Some((tag, _)) = rest.split_once("]:") else {
            return false;
        };
        tag.eq_ignore_ascii_case("event") || tag.eq_ignore_ascii_case("discussion")
    }
}

/// GeoJSON point as stored by the backend (`[longitude, latitude]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

fn point_type() -> String {
    "Point".to_string()
}

impl GeoPoint {
    pub fn from_coordinate(c: &Coordinate) -> Self {
        Self {
            kind: point_type(),
            coordinates: c.to_lon_lat().to_vec(),
        }
    }
}

/// Room record in the backend's listing format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_global: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_ids: Option<Vec<String>>,
}

impl TryFrom<RoomRecord> for Room {
    type Error = ProximityError;

    fn try_from(record: RoomRecord) -> Result<Self, Self::Error> {
        let invalid = |message: String| ProximityError::InvalidRoom {
            id: record.id.clone(),
            message,
        };

        let center = match &record.coordinates {
            None => None,
            Some(point) => {
                let [lon, lat, ..] = point.coordinates.as_slice() else {
                    return Err(invalid(format!(
                        "expected [longitude, latitude], got {} values",
                        point.coordinates.len()
                    )));
                };
                let center = Coordinate::from_lon_lat([*lon, *lat])
                    .map_err(|e| invalid(format!("center: {e}")))?;
                Some(center)
            }
        };

        if let Some(radius) = record.radius_meters
            && !(radius.is_finite() && radius >= 0.0)
        {
            return Err(invalid(format!("radius {radius} is not a non-negative number")));
        }

        let participant_count = record
            .participant_count
            .or_else(|| record.participant_ids.as_ref().map(|ids| ids.len() as u64));

        Ok(Room {
            id: record.id,
            name: record.name,
            center,
            radius_meters: record.radius_meters,
            is_global: record.is_global.unwrap_or(false),
            preset_key: record.preset_key,
            participant_count,
        })
    }
}

impl From<&Room> for RoomRecord {
    fn from(room: &Room) -> Self {
        RoomRecord {
            id: room.id.clone(),
            name: room.name.clone(),
            coordinates: room.center.as_ref().map(GeoPoint::from_coordinate),
            radius_meters: room.radius_meters,
            is_global: Some(room.is_global),
            preset_key: room.preset_key.clone(),
            participant_count: room.participant_count,
            participant_ids: None,
        }
    }
}

/// Parses a JSON array of backend records, failing on the first invalid room.
pub fn parse_rooms(json: &str) -> Result<Vec<Room>, ProximityError> {
    let records: Vec<RoomRecord> = serde_json::from_str(json)?;
    records.into_iter().map(Room::try_from).collect()
}

/// Converts records, dropping (and logging) the ones that fail validation.
pub fn rooms_from_records_lossy(records: Vec<RoomRecord>) -> Vec<Room> {
    records
        .into_iter()
        .filter_map(|record| match Room::try_from(record) {
            Ok(room) => Some(room),
            Err(err) => {
                warn!("skipping room record: {err}");
                None
            }
        })
        .collect()
}
