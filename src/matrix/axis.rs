use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{geom::Collection, Error};

/// Matrix axis selector.
///
/// Rows of an allocation matrix are primary ids and columns are secondary ids, so an
/// operation "along `Axis::Primary`" touches one row per primary id, and one
/// "along `Axis::Secondary`" touches one column per secondary id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Primary,
    Secondary,
}

impl Axis {
    /// The ndarray axis holding one entry per id of this side.
    #[inline]
    pub(crate) fn ndarray_axis(self) -> ndarray::Axis {
        match self {
            Axis::Primary => ndarray::Axis(0),
            Axis::Secondary => ndarray::Axis(1),
        }
    }

    /// The opposite axis.
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::Primary => Axis::Secondary,
            Axis::Secondary => Axis::Primary,
        }
    }
}

impl From<Collection> for Axis {
    fn from(collection: Collection) -> Self {
        match collection {
            Collection::Primary => Axis::Primary,
            Collection::Secondary => Axis::Secondary,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Primary => write!(f, "primary"),
            Axis::Secondary => write!(f, "secondary"),
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Axis::Primary),
            "secondary" => Ok(Axis::Secondary),
            _ => Err(Error::Format(format!("unknown axis '{s}', expected 'primary' or 'secondary'"))),
        }
    }
}
