//! Vertical grid shared by every Stokes drift profile of a batch.

use {
    crate::error::{Error, Result},
    ndarray::Array1,
    serde::{Deserialize, Serialize},
};

/// Evenly spaced depths (positive, metres below the surface) from `start` to
/// `stop` inclusive.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GridSegment {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
}

/// Depths as z coordinates: 0 at the surface, negative below, strictly
/// decreasing.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DepthGrid {
    z: Vec<f64>,
}

impl DepthGrid {
    pub fn new(z: Vec<f64>) -> Result<Self> {
        let first = *z.first().ok_or(Error::EmptyGrid)?;

        if z.iter().any(|z| !z.is_finite()) {
            return Err(Error::NonFinite("depth grid"));
        }
        if first != 0.0 {
            return Err(Error::GridNotAtSurface(first));
        }
        if let Some(index) = (1..z.len()).find(|&i| z[i] >= z[i - 1]) {
            return Err(Error::GridNotMonotonic { index });
        }

        Ok(DepthGrid { z })
    }

    /// Surface point followed by each segment in turn.
    pub fn from_segments(segments: &[GridSegment]) -> Result<Self> {
        let mut z = vec![0.0];
        for segment in segments {
            z.extend(
                Array1::linspace(segment.start, segment.stop, segment.count)
                    .iter()
                    .map(|depth| -depth),
            );
        }
        Self::new(z)
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Magnitude of the deepest point
    pub fn max_depth(&self) -> f64 {
        self.z.last().map_or(0.0, |z| -z)
    }
}
