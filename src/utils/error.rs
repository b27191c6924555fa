use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error returned from the sprite batch and its resource loaders. None of these are fatal, the caller decides how to react.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchError {
    /// every slot of the batch is occupied
    CapacityExceeded { capacity: usize },
    /// the slot index does not point to an occupied slot
    IndexOutOfRange { index: usize, sprite_count: usize },
    /// a texture or shader could not be loaded
    ResourceLoad(String),
}

impl Display for BatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::CapacityExceeded { capacity } => {
                write!(f, "sprite batch full (capacity {capacity})")
            }
            BatchError::IndexOutOfRange {
                index,
                sprite_count,
            } => write!(
                f,
                "invalid sprite index {index} (batch holds {sprite_count} sprites)"
            ),
            BatchError::ResourceLoad(msg) => write!(f, "resource load failure: {msg}"),
        }
    }
}

impl Error for BatchError {}
