//! Mixed layer depth detection on vertical density or temperature profiles.
//!
//! The mixed layer base is the shallowest depth where the profile departs
//! from its reference (near-surface) value by more than a fixed criterion.

use {
    crate::{
        error::{Error, Result},
        parameters::Parameters,
    },
    rayon::prelude::*,
    serde::{Deserialize, Serialize},
};

/// Physical variable the profile holds, which fixes the departure direction.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// Density increasing with depth
    Density,
    /// Temperature departing in the direction given by `Stratification`
    Temperature,
}

impl Rule {
    /// Short name used in output file names
    pub fn label(self) -> &'static str {
        match self {
            Rule::Density => "deltaR",
            Rule::Temperature => "deltaT",
        }
    }
}

/// Sign of the temperature change below the mixed layer.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stratification {
    /// Taken from the deepest sample relative to the reference value
    Auto,
    /// Colder water below a warm surface layer
    Cooling,
    /// Warmer water below a cold surface layer
    Warming,
}

/// How the depth is placed once the criterion is exceeded.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Depth of the first sample exceeding the criterion
    None,
    /// Depth where the departure reaches the criterion, linear between the
    /// last passing and the first failing sample
    Linear,
}

/// Scalar values against z (0 at the surface, negative below), strictly
/// decreasing z.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct ScalarVerticalProfile {
    z: Vec<f64>,
    values: Vec<f64>,
}

impl ScalarVerticalProfile {
    pub fn new(z: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if z.is_empty() {
            return Err(Error::EmptyProfile);
        }
        if values.len() != z.len() {
            return Err(Error::LengthMismatch {
                name: "profile values",
                expected: z.len(),
                got: values.len(),
            });
        }
        if z.iter().any(|z| !z.is_finite()) {
            return Err(Error::NonFinite("profile depths"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFinite("profile values"));
        }
        if let Some(index) = (1..z.len()).find(|&i| z[i] >= z[i - 1]) {
            return Err(Error::ProfileNotMonotonic { index });
        }

        Ok(ScalarVerticalProfile { z, values })
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

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Depth (positive down) of sample `i`
    pub fn depth(&self, i: usize) -> f64 {
        -self.z[i]
    }

    /// Depth of the deepest sample
    pub fn max_depth(&self) -> f64 {
        self.depth(self.len() - 1)
    }
}

/// Outcome of a detection.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum MixedLayerDepth {
    /// Depth (m, positive down) of a trustworthy mixed layer base
    Detected(f64),
    /// The criterion is never exceeded within the profile
    Undefined,
    /// A crossing at or below the usable depth bound
    Excluded(f64),
}

impl MixedLayerDepth {
    pub fn valid(self) -> Option<f64> {
        match self {
            MixedLayerDepth::Detected(depth) => Some(depth),
            _ => None,
        }
    }

    pub fn is_valid(self) -> bool {
        self.valid().is_some()
    }
}

/// Mean over the valid depths only, `None` if there are none.
pub fn mean_valid<'a, I>(mlds: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a MixedLayerDepth>,
{
    let (sum, count) = mlds
        .into_iter()
        .filter_map(|mld| mld.valid())
        .fold((0.0, 0usize), |(sum, count), depth| (sum + depth, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Tally of a series of detections.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct MldSummary {
    pub detected: usize,
    pub undefined: usize,
    pub excluded: usize,
    pub mean: Option<f64>,
}

impl MldSummary {
    pub fn new(mlds: &[MixedLayerDepth]) -> Self {
        let mut summary = MldSummary {
            mean: mean_valid(mlds),
            ..MldSummary::default()
        };
        for mld in mlds {
            match mld {
                MixedLayerDepth::Detected(_) => summary.detected += 1,
                MixedLayerDepth::Undefined => summary.undefined += 1,
                MixedLayerDepth::Excluded(_) => summary.excluded += 1,
            }
        }
        summary
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct MixedLayerDepthDetector {
    rule: Rule,
    criterion: f64,
    stratification: Stratification,
    interpolation: Interpolation,
    reference_depth: f64,
}

impl MixedLayerDepthDetector {
    pub fn new(rule: Rule, criterion: f64) -> Result<Self> {
        if !(criterion > 0.0 && criterion.is_finite()) {
            return Err(Error::InvalidCriterion(criterion));
        }
        Ok(MixedLayerDepthDetector {
            rule,
            criterion,
            stratification: Stratification::Auto,
            interpolation: Interpolation::None,
            reference_depth: 0.0,
        })
    }

    pub fn from_parameters(params: &Parameters) -> Result<Self> {
        let mld = &params.mld;
        Ok(Self::new(mld.rule, mld.criterion(&params.physical))?
            .with_stratification(mld.stratification)
            .with_interpolation(mld.interpolation)
            .with_reference_depth(mld.reference_depth))
    }

    pub fn with_stratification(mut self, stratification: Stratification) -> Self {
        self.stratification = stratification;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Depth of the reference value; anything at or above the top sample
    /// selects the top sample.
    pub fn with_reference_depth(mut self, reference_depth: f64) -> Self {
        self.reference_depth = reference_depth.max(0.0);
        self
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn criterion(&self) -> f64 {
        self.criterion
    }

    /// Scans `profile` from the surface down. Crossings at or below
    /// `depth_bound` or the profile bottom, whichever is shallower, are
    /// excluded.
    pub fn detect(&self, profile: &ScalarVerticalProfile, depth_bound: f64) -> MixedLayerDepth {
        let (ref_depth, ref_value, start) = match self.reference(profile) {
            Some(reference) => reference,
            None => return MixedLayerDepth::Undefined,
        };

        let sign = self.sign(profile, ref_value);
        let departure = |value: f64| sign * (value - ref_value);

        let mut previous = (ref_depth, 0.0);
        let mut crossing = None;
        for i in start..profile.len() {
            let depth = profile.depth(i);
            let delta = departure(profile.values[i]);

            if delta > self.criterion {
                crossing = Some(match self.interpolation {
                    Interpolation::None => depth,
                    Interpolation::Linear => {
                        let (d0, delta0) = previous;
                        d0 + (self.criterion - delta0) / (delta - delta0) * (depth - d0)
                    }
                });
                break;
            }

            previous = (depth, delta);
        }

        match crossing {
            None => MixedLayerDepth::Undefined,
            Some(depth) if depth >= depth_bound.min(profile.max_depth()) => {
                MixedLayerDepth::Excluded(depth)
            }
            Some(depth) => MixedLayerDepth::Detected(depth),
        }
    }

    /// Detects every profile of a series, in parallel.
    pub fn detect_series(
        &self,
        profiles: &[ScalarVerticalProfile],
        depth_bound: f64,
    ) -> Vec<MixedLayerDepth> {
        profiles
            .par_iter()
            .map(|profile| self.detect(profile, depth_bound))
            .collect()
    }

    /// Reference depth and value, and the first sample below the reference.
    fn reference(&self, profile: &ScalarVerticalProfile) -> Option<(f64, f64, usize)> {
        if self.reference_depth <= profile.depth(0) {
            return Some((profile.depth(0), profile.values[0], 1));
        }

        let below = (1..profile.len()).find(|&i| profile.depth(i) >= self.reference_depth)?;
        let (d0, d1) = (profile.depth(below - 1), profile.depth(below));
        let (v0, v1) = (profile.values[below - 1], profile.values[below]);
        let value = v0 + (v1 - v0) * (self.reference_depth - d0) / (d1 - d0);

        let start = if d1 == self.reference_depth {
            below + 1
        } else {
            below
        };

        Some((self.reference_depth, value, start))
    }

    fn sign(&self, profile: &ScalarVerticalProfile, ref_value: f64) -> f64 {
        match (self.rule, self.stratification) {
            (Rule::Density, _) => 1.0,
            (Rule::Temperature, Stratification::Warming) => 1.0,
            (Rule::Temperature, Stratification::Cooling) => -1.0,
            (Rule::Temperature, Stratification::Auto) => {
                if profile.values[profile.len() - 1] > ref_value {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}
