//! Error type shared by the numeric core and the file readers.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two sequences that must pair up element for element do not.
    #[error("{name} has {got} values, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    /// A spectrum series whose band frequencies differ from a builder's.
    #[error("spectrum bands differ from the bands the profile builder was set up with")]
    BandMismatch,

    #[error("depth grid is empty")]
    EmptyGrid,

    #[error("depth grid must start at the surface (z = 0), found z = {0}")]
    GridNotAtSurface(f64),

    /// Depths must strictly decrease away from the surface.
    #[error("depth grid is not strictly decreasing at index {index}")]
    GridNotMonotonic { index: usize },

    #[error("profile is empty")]
    EmptyProfile,

    #[error("profile depths are not strictly decreasing at index {index}")]
    ProfileNotMonotonic { index: usize },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    #[error("criterion must be finite and positive, got {0}")]
    InvalidCriterion(f64),

    #[error("gravitational acceleration must be finite and positive, got {0}")]
    InvalidGravity(f64),

    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("malformed case name {0:?}")]
    CaseName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
