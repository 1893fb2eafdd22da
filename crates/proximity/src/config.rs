use std::env;

use crate::access::AccessPolicy;
use crate::error::ProximityError;
use crate::shift::DEFAULT_STEP_METERS;

pub const ENV_ACCESS_POLICY: &str = "PROXIMITY_ACCESS_POLICY";
pub const ENV_MAX_ROOMS: &str = "PROXIMITY_MAX_ROOMS";
pub const ENV_STEP_METERS: &str = "PROXIMITY_STEP_METERS";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub access_policy: AccessPolicy,
    /// Upper bound on rooms evaluated per resolution. `None` evaluates all.
    pub max_rooms: Option<usize>,
    /// Step used by `ProximityEngine::step` moves.
    pub step_meters: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            access_policy: AccessPolicy::Permissive,
            max_rooms: None,
            step_meters: DEFAULT_STEP_METERS,
        }
    }
}

impl EngineConfig {
    /// Reads `PROXIMITY_*` variables; unset ones keep their defaults.
    pub fn from_env() -> Result<Self, ProximityError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProximityError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ACCESS_POLICY) {
            config.access_policy = raw.parse().map_err(|_| invalid(ENV_ACCESS_POLICY, &raw))?;
        }

        if let Some(raw) = lookup(ENV_MAX_ROOMS) {
            let max = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid(ENV_MAX_ROOMS, &raw))?;
            config.max_rooms = (max > 0).then_some(max);
        }

        if let Some(raw) = lookup(ENV_STEP_METERS) {
            let step = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s >= 0.0)
                .ok_or_else(|| invalid(ENV_STEP_METERS, &raw))?;
            config.step_meters = step;
        }

        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> ProximityError {
    ProximityError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}
