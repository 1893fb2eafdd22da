//! Per-room admission decisions.
//!
//! [`classify`] reports what is actually known about a (room, viewer) pair;
//! an [`AccessPolicy`] then decides what an [`Indeterminate`] outcome means
//! for the caller. The default policy admits, so only a confirmed
//! out-of-radius distance or an unusable viewer location ever blocks.

use foundation::math::{Coordinate, distance_meters};
use foundation::units::format_fence_distance;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ProximityError;
use crate::room::Room;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct AccessInfo {
    pub distance_meters: Option<f64>,
    pub radius_meters: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Denial {
    NoRoomSelected,
    LocationRequired,
    OutsideRadius {
        room_name: String,
        distance_meters: f64,
        radius_meters: f64,
    },
}

/// User-facing wording; shown verbatim by consumers.
impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denial::NoRoomSelected => write!(f, "Select a chat room to begin."),
            Denial::LocationRequired => {
                write!(f, "Spoof your location before entering geofenced chat rooms.")
            }
            Denial::OutsideRadius {
                room_name,
                distance_meters,
                radius_meters,
            } => write!(
                f,
                "Outside the \"{room_name}\" radius. You're {} away; move within {}.",
                format_fence_distance(*distance_meters),
                format_fence_distance(*radius_meters)
            ),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Indeterminate {
    /// The room has no usable center, so it cannot be fenced.
    UnknownGeometry,
    /// The distance computation produced a non-finite value.
    DistanceUnavailable,
}

impl std::fmt::Display for Indeterminate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Indeterminate::UnknownGeometry => {
                write!(f, "This room has no location, so access could not be verified.")
            }
            Indeterminate::DistanceUnavailable => {
                write!(f, "Distance to this room could not be computed.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Allowed(AccessInfo),
    Denied(Denial),
    Indeterminate(Indeterminate),
}

/// How an [`Access::Indeterminate`] outcome is reported.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessPolicy {
    /// Admit when the fence cannot be evaluated.
    #[default]
    Permissive,
    /// Reject when the fence cannot be evaluated.
    Strict,
}

impl std::str::FromStr for AccessPolicy {
    type Err = ProximityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(AccessPolicy::Permissive),
            "strict" => Ok(AccessPolicy::Strict),
            _ => Err(ProximityError::InvalidConfig {
                key: "access_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Flattened admission outcome handed to display layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResult {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
}

impl AccessResult {
    fn open() -> Self {
        Self {
            allowed: true,
            ..Default::default()
        }
    }
}

impl Access {
    pub fn into_result(self, policy: AccessPolicy) -> AccessResult {
        match self {
            Access::Allowed(info) => AccessResult {
                allowed: true,
                reason: None,
                distance_meters: info.distance_meters,
                radius_meters: info.radius_meters,
            },
            Access::Denied(denial) => {
                let (distance_meters, radius_meters) = match &denial {
                    Denial::OutsideRadius {
                        distance_meters,
                        radius_meters,
                        ..
                    } => (Some(*distance_meters), Some(*radius_meters)),
                    _ => (None, None),
                };
                AccessResult {
                    allowed: false,
                    reason: Some(denial.to_string()),
                    distance_meters,
                    radius_meters,
                }
            }
            Access::Indeterminate(why) => match policy {
                AccessPolicy::Permissive => AccessResult::open(),
                AccessPolicy::Strict => AccessResult {
                    allowed: false,
                    reason: Some(why.to_string()),
                    ..Default::default()
                },
            },
        }
    }

    pub fn is_allowed(&self, policy: AccessPolicy) -> bool {
        match self {
            Access::Allowed(_) => true,
            Access::Denied(_) => false,
            Access::Indeterminate(_) => policy == AccessPolicy::Permissive,
        }
    }

    /// Measured distance to the room center, when one was computed.
    pub fn distance_meters(&self) -> Option<f64> {
        match self {
            Access::Allowed(info) => info.distance_meters,
            Access::Denied(Denial::OutsideRadius {
                distance_meters, ..
            }) => Some(*distance_meters),
            _ => None,
        }
    }
}

/// Classifies whether a viewer at `viewer` may enter `room`.
pub fn classify(room: Option<&Room>, viewer: Option<&Coordinate>) -> Access {
    let Some(room) = room else {
        return Access::Denied(Denial::NoRoomSelected);
    };

    if room.is_borderless() {
        return Access::Allowed(AccessInfo::default());
    }

    let Some(center) = room.usable_center() else {
        return Access::Indeterminate(Indeterminate::UnknownGeometry);
    };

    let Some(viewer) = viewer.filter(|v| v.is_finite()) else {
        return Access::Denied(Denial::LocationRequired);
    };

    against_fence(room, distance_meters(viewer, center))
}

/// Applies the room's radius to an already computed viewer distance.
fn against_fence(room: &Room, distance: f64) -> Access {
    if !distance.is_finite() {
        return Access::Indeterminate(Indeterminate::DistanceUnavailable);
    }

    if let Some(radius) = room.radius_meters
        && distance > radius
    {
        trace!(room = %room.id, distance, radius, "viewer outside geofence");
        return Access::Denied(Denial::OutsideRadius {
            room_name: room.name.clone(),
            distance_meters: distance,
            radius_meters: radius,
        });
    }

    Access::Allowed(AccessInfo {
        distance_meters: Some(distance),
        radius_meters: room.radius_meters,
    })
}

/// Admission evaluator bound to an [`AccessPolicy`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RoomAccessEvaluator {
    pub policy: AccessPolicy,
}

impl RoomAccessEvaluator {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn classify(&self, room: Option<&Room>, viewer: Option<&Coordinate>) -> Access {
        classify(room, viewer)
    }

    pub fn evaluate(&self, room: Option<&Room>, viewer: Option<&Coordinate>) -> AccessResult {
        classify(room, viewer).into_result(self.policy)
    }
}
