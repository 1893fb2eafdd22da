use foundation::math::CoordinateError;

/// Boundary errors. The engine operations themselves never fail; these come
/// from validating records, parsing directions, and reading configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ProximityError {
    InvalidCoordinate(CoordinateError),
    InvalidRoom { id: String, message: String },
    UnknownDirection(String),
    InvalidConfig { key: String, value: String },
    Json(String),
}

impl std::fmt::Display for ProximityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProximityError::InvalidCoordinate(err) => write!(f, "invalid coordinate: {err}"),
            ProximityError::InvalidRoom { id, message } => {
                write!(f, "invalid room {id:?}: {message}")
            }
            ProximityError::UnknownDirection(dir) => {
                write!(f, "unknown direction {dir:?} (expected north, south, east or west)")
            }
            ProximityError::InvalidConfig { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
            ProximityError::Json(msg) => write!(f, "room json: {msg}"),
        }
    }
}

impl std::error::Error for ProximityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProximityError::InvalidCoordinate(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CoordinateError> for ProximityError {
    fn from(err: CoordinateError) -> Self {
        ProximityError::InvalidCoordinate(err)
    }
}

impl From<serde_json::Error> for ProximityError {
    fn from(err: serde_json::Error) -> Self {
        ProximityError::Json(err.to_string())
    }
}
