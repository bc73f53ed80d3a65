//! Reconstruction of Stokes drift depth profiles from a partitioned surface
//! Stokes drift spectrum.
//!
//! Each frequency band carries a surface Stokes drift contribution which
//! decays as exp(2kz), with the band wavenumber k given by the deep-water
//! dispersion relation k = (2 pi f)^2 / g.

use {
    crate::{
        constants::TWO_PI,
        error::{Error, Result},
        grid::DepthGrid,
    },
    chrono::NaiveDateTime,
    log::debug,
    ndarray::{Array1, Array2, ArrayView1, Axis, Zip},
    rayon::prelude::*,
    serde::{Deserialize, Serialize},
};

/// Band centre frequencies (Hz)
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct FrequencyBands(pub Vec<f64>);

impl FrequencyBands {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Surface Stokes drift contributed by each band at one time instant (m/s)
#[derive(Debug, PartialEq, Clone, Default, Serialize)]
pub struct SurfaceStokesSpectrum {
    eastward: Vec<f64>,
    northward: Vec<f64>,
}

impl SurfaceStokesSpectrum {
    pub fn new(eastward: Vec<f64>, northward: Vec<f64>) -> Result<Self> {
        if eastward.len() != northward.len() {
            return Err(Error::LengthMismatch {
                name: "northward spectrum",
                expected: eastward.len(),
                got: northward.len(),
            });
        }
        Ok(SurfaceStokesSpectrum {
            eastward,
            northward,
        })
    }

    pub fn len(&self) -> usize {
        self.eastward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eastward.is_empty()
    }

    pub fn eastward(&self) -> &[f64] {
        &self.eastward
    }

    pub fn northward(&self) -> &[f64] {
        &self.northward
    }
}

/// Stokes drift at every point of a depth grid, one time instant. Only a
/// `StokesProfileBuilder` makes these.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct StokesProfile {
    eastward: Array1<f64>,
    northward: Array1<f64>,
}

impl StokesProfile {
    pub fn eastward(&self) -> &Array1<f64> {
        &self.eastward
    }

    pub fn northward(&self) -> &Array1<f64> {
        &self.northward
    }

    pub fn len(&self) -> usize {
        self.eastward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eastward.is_empty()
    }

    /// Values at the top grid point (z = 0)
    pub fn surface(&self) -> (f64, f64) {
        (self.eastward[0], self.northward[0])
    }
}

/// Partitioned spectra of one case over time, as supplied by the wave model.
/// Rows are time instants, columns are frequency bands.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct SpectrumSeries {
    times: Vec<NaiveDateTime>,
    bands: FrequencyBands,
    eastward: Array2<f64>,
    northward: Array2<f64>,
}

impl SpectrumSeries {
    pub fn new(
        times: Vec<NaiveDateTime>,
        bands: FrequencyBands,
        eastward: Array2<f64>,
        northward: Array2<f64>,
    ) -> Result<Self> {
        let shape = (times.len(), bands.len());
        let components = [("eastward spectra", &eastward), ("northward spectra", &northward)];
        for &(name, array) in components.iter() {
            if array.nrows() != shape.0 {
                return Err(Error::LengthMismatch {
                    name,
                    expected: shape.0,
                    got: array.nrows(),
                });
            }
            if array.ncols() != shape.1 {
                return Err(Error::LengthMismatch {
                    name,
                    expected: shape.1,
                    got: array.ncols(),
                });
            }
        }

        Ok(SpectrumSeries {
            times,
            bands,
            eastward,
            northward,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn bands(&self) -> &FrequencyBands {
        &self.bands
    }

    pub fn spectrum(&self, i: usize) -> SurfaceStokesSpectrum {
        SurfaceStokesSpectrum {
            eastward: self.eastward.row(i).to_vec(),
            northward: self.northward.row(i).to_vec(),
        }
    }
}

/// Stokes drift profiles of one case over time.
/// Rows are time instants, columns are depth grid points.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct StokesSeries {
    times: Vec<NaiveDateTime>,
    grid: DepthGrid,
    eastward: Array2<f64>,
    northward: Array2<f64>,
}

impl StokesSeries {
    pub fn times(&self) -> &[NaiveDateTime] {
        &self.times
    }

    pub fn grid(&self) -> &DepthGrid {
        &self.grid
    }

    pub fn eastward(&self) -> &Array2<f64> {
        &self.eastward
    }

    pub fn northward(&self) -> &Array2<f64> {
        &self.northward
    }

    pub fn surface_eastward(&self) -> ArrayView1<f64> {
        self.eastward.column(0)
    }

    pub fn surface_northward(&self) -> ArrayView1<f64> {
        self.northward.column(0)
    }
}

/// Deep-water wavenumber of a band, or `None` for a band that cannot
/// contribute (zero, negative or non-finite frequency).
pub fn wavenumber(frequency: f64, gravity: f64) -> Option<f64> {
    if frequency > 0.0 && frequency.is_finite() {
        Some((TWO_PI * frequency).powf(2.0) / gravity).filter(|k| k.is_finite())
    } else {
        None
    }
}

/// Passes through a usable gravitational acceleration.
pub fn check_gravity(gravity: f64) -> Result<f64> {
    if gravity > 0.0 && gravity.is_finite() {
        Ok(gravity)
    } else {
        Err(Error::InvalidGravity(gravity))
    }
}

/// Maps surface spectra onto a fixed depth grid for a fixed set of bands.
///
/// The attenuation factor of every band at every depth is computed once, so
/// building a profile costs one multiply-add per band and depth.
#[derive(Debug, Clone)]
pub struct StokesProfileBuilder {
    grid: DepthGrid,
    bands: FrequencyBands,
    // (band, depth)
    decay: Array2<f64>,
}

impl StokesProfileBuilder {
    pub fn new(grid: DepthGrid, bands: FrequencyBands, gravity: f64) -> Result<Self> {
        let gravity = check_gravity(gravity)?;
        let mut decay = Array2::<f64>::zeros((bands.len(), grid.len()));

        for (mut row, &frequency) in decay.axis_iter_mut(Axis(0)).zip(bands.0.iter()) {
            match wavenumber(frequency, gravity) {
                Some(k) => Zip::from(&mut row)
                    .and(grid.z())
                    .apply(|d, &z| *d = (2.0 * k * z).exp()),
                None => debug!("Band at {} Hz contributes no Stokes drift", frequency),
            }
        }

        Ok(StokesProfileBuilder {
            grid,
            bands,
            decay,
        })
    }

    pub fn grid(&self) -> &DepthGrid {
        &self.grid
    }

    pub fn bands(&self) -> &FrequencyBands {
        &self.bands
    }

    /// Attenuation of each band (rows) at each grid point (columns)
    pub fn decay(&self) -> &Array2<f64> {
        &self.decay
    }

    pub fn build(&self, spectrum: &SurfaceStokesSpectrum) -> Result<StokesProfile> {
        if spectrum.len() != self.bands.len() {
            return Err(Error::LengthMismatch {
                name: "surface spectrum",
                expected: self.bands.len(),
                got: spectrum.len(),
            });
        }

        Ok(StokesProfile {
            eastward: self.sum_bands(&spectrum.eastward),
            northward: self.sum_bands(&spectrum.northward),
        })
    }

    fn sum_bands(&self, surface: &[f64]) -> Array1<f64> {
        let mut profile = Array1::<f64>::zeros(self.grid.len());
        for (row, &amplitude) in self.decay.axis_iter(Axis(0)).zip(surface) {
            Zip::from(&mut profile)
                .and(&row)
                .apply(|p, &d| *p += amplitude * d);
        }
        profile
    }

    /// Builds every time instant of a case, in parallel over time.
    pub fn build_series(&self, series: &SpectrumSeries) -> Result<StokesSeries> {
        if series.bands.len() != self.bands.len() {
            return Err(Error::LengthMismatch {
                name: "spectrum bands",
                expected: self.bands.len(),
                got: series.bands.len(),
            });
        }
        if series.bands != self.bands {
            return Err(Error::BandMismatch);
        }

        let nt = series.len();
        let nz = self.grid.len();

        let profiles = (0..nt)
            .into_par_iter()
            .map(|i| self.build(&series.spectrum(i)))
            .collect::<Result<Vec<StokesProfile>>>()?;

        let mut eastward = Array2::<f64>::zeros((nt, nz));
        let mut northward = Array2::<f64>::zeros((nt, nz));
        for (i, profile) in profiles.iter().enumerate() {
            eastward.row_mut(i).assign(&profile.eastward);
            northward.row_mut(i).assign(&profile.northward);
        }

        Ok(StokesSeries {
            times: series.times.clone(),
            grid: self.grid.clone(),
            eastward,
            northward,
        })
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        approx::assert_abs_diff_eq,
        chrono::NaiveDate,
        ndarray::{arr1, arr2},
    };

    fn grid() -> DepthGrid {
        DepthGrid::new(vec![0.0, -5.0, -10.0, -20.0]).unwrap()
    }

    #[test]
    fn wavenumber_deep_water() {
        assert_abs_diff_eq!(
            wavenumber(0.1, 9.81).unwrap(),
            (TWO_PI * 0.1).powf(2.0) / 9.81
        );
        assert_eq!(wavenumber(0.0, 9.81), None);
        assert_eq!(wavenumber(-0.2, 9.81), None);
        assert_eq!(wavenumber(f64::NAN, 9.81), None);
    }

    #[test]
    fn single_band() {
        let builder = StokesProfileBuilder::new(grid(), FrequencyBands(vec![0.1]), 9.81).unwrap();
        let spectrum = SurfaceStokesSpectrum::new(vec![0.05], vec![0.0]).unwrap();

        let profile = builder.build(&spectrum).unwrap();

        let k = (2.0 * std::f64::consts::PI * 0.1).powf(2.0) / 9.81;
        for (i, z) in grid().z().iter().enumerate() {
            assert_abs_diff_eq!(builder.decay()[[0, i]], (2.0 * k * z).exp());
            assert_abs_diff_eq!(profile.eastward[i], 0.05 * (2.0 * k * z).exp());
            assert_eq!(profile.northward[i], 0.0);
        }
        assert_eq!(profile.surface(), (0.05, 0.0));
    }

    #[test]
    fn single_band_decays_monotonically() {
        let grid = DepthGrid::from_segments(&crate::parameters::Grid::default().segments).unwrap();
        let builder = StokesProfileBuilder::new(grid, FrequencyBands(vec![0.25]), 9.81).unwrap();
        let spectrum = SurfaceStokesSpectrum::new(vec![-0.1], vec![0.07]).unwrap();

        let profile = builder.build(&spectrum).unwrap();

        assert_eq!(profile.eastward[0], -0.1);
        assert_eq!(profile.northward[0], 0.07);
        for component in &[&profile.eastward, &profile.northward] {
            for pair in component.as_slice().unwrap().windows(2) {
                assert!(pair[1].abs() <= pair[0].abs());
            }
        }
    }

    #[test]
    fn bands_superpose() {
        let bands = FrequencyBands(vec![0.08, 0.15, 0.3]);
        let builder = StokesProfileBuilder::new(grid(), bands.clone(), 9.81).unwrap();
        let spectrum =
            SurfaceStokesSpectrum::new(vec![0.01, 0.02, 0.005], vec![0.0, -0.01, 0.003]).unwrap();

        let profile = builder.build(&spectrum).unwrap();

        for (i, z) in grid().z().iter().enumerate() {
            let (mut u, mut v) = (0.0, 0.0);
            for (b, f) in bands.0.iter().enumerate() {
                let decay = (2.0 * wavenumber(*f, 9.81).unwrap() * z).exp();
                u += spectrum.eastward()[b] * decay;
                v += spectrum.northward()[b] * decay;
            }
            assert_abs_diff_eq!(profile.eastward[i], u, epsilon = 1.0E-15);
            assert_abs_diff_eq!(profile.northward[i], v, epsilon = 1.0E-15);
        }
    }

    #[test]
    fn zero_spectrum() {
        let builder = StokesProfileBuilder::new(grid(), FrequencyBands(vec![0.1, 0.2]), 9.81).unwrap();
        let spectrum = SurfaceStokesSpectrum::new(vec![0.0; 2], vec![0.0; 2]).unwrap();

        let profile = builder.build(&spectrum).unwrap();

        assert_eq!(profile.len(), 4);
        assert!(profile.eastward.iter().chain(&profile.northward).all(|&x| x == 0.0));
    }

    #[test]
    fn no_bands() {
        let builder = StokesProfileBuilder::new(grid(), FrequencyBands::default(), 9.81).unwrap();

        let profile = builder.build(&SurfaceStokesSpectrum::default()).unwrap();

        assert_eq!(profile.len(), 4);
        assert!(profile.eastward.iter().chain(&profile.northward).all(|&x| x == 0.0));
    }

    #[test]
    fn zero_frequency_band_contributes_nothing() {
        let builder = StokesProfileBuilder::new(grid(), FrequencyBands(vec![0.0, -0.1, 0.1]), 9.81).unwrap();
        let spectrum = SurfaceStokesSpectrum::new(vec![1.0, 1.0, 0.05], vec![1.0, 1.0, 0.0]).unwrap();

        let profile = builder.build(&spectrum).unwrap();

        assert_eq!(profile.surface(), (0.05, 0.0));
    }

    #[test]
    fn mismatched_spectrum() {
        let builder = StokesProfileBuilder::new(grid(), FrequencyBands(vec![0.1, 0.2]), 9.81).unwrap();
        let spectrum = SurfaceStokesSpectrum::new(vec![0.01], vec![0.01]).unwrap();

        assert!(matches!(
            builder.build(&spectrum),
            Err(Error::LengthMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn mismatched_components() {
        assert!(matches!(
            SurfaceStokesSpectrum::new(vec![0.01, 0.02], vec![0.01]),
            Err(Error::LengthMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn mismatched_series() {
        let t = NaiveDate::from_ymd(2008, 6, 1).and_hms(0, 0, 0);
        let result = SpectrumSeries::new(
            vec![t],
            FrequencyBands(vec![0.1, 0.2]),
            arr2(&[[0.01, 0.02]]),
            arr2(&[[0.01, 0.02], [0.0, 0.0]]),
        );

        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                name: "northward spectra",
                expected: 1,
                got: 2,
            })
        ));
    }

    #[test]
    fn series_needs_one_row_per_time() {
        let t = NaiveDate::from_ymd(2008, 6, 1).and_hms(0, 0, 0);
        let result = SpectrumSeries::new(
            vec![t, t + chrono::Duration::hours(3)],
            FrequencyBands(vec![0.1]),
            arr2(&[[0.05]]),
            arr2(&[[0.0]]),
        );

        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                name: "eastward spectra",
                expected: 2,
                got: 1,
            })
        ));
    }

    #[test]
    fn invalid_gravity() {
        for &g in &[0.0, -9.81, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                StokesProfileBuilder::new(grid(), FrequencyBands(vec![0.1]), g),
                Err(Error::InvalidGravity(_))
            ));
        }
        assert_eq!(check_gravity(9.81).unwrap(), 9.81);
    }

    #[test]
    fn series_matches_single_builds() {
        let t0 = NaiveDate::from_ymd(2008, 6, 1).and_hms(0, 0, 0);
        let bands = FrequencyBands(vec![0.1, 0.2]);
        let series = SpectrumSeries::new(
            vec![t0, t0 + chrono::Duration::hours(3)],
            bands.clone(),
            arr2(&[[0.05, 0.01], [0.02, 0.0]]),
            arr2(&[[0.0, 0.01], [-0.03, 0.02]]),
        )
        .unwrap();
        let builder = StokesProfileBuilder::new(grid(), bands, 9.81).unwrap();

        let out = builder.build_series(&series).unwrap();

        assert_eq!(out.eastward.dim(), (2, 4));
        for i in 0..2 {
            let profile = builder.build(&series.spectrum(i)).unwrap();
            assert_eq!(out.eastward.row(i), profile.eastward);
            assert_eq!(out.northward.row(i), profile.northward);
        }
        assert_abs_diff_eq!(out.surface_eastward(), arr1(&[0.06, 0.02]), epsilon = 1.0E-15);
        assert_abs_diff_eq!(out.surface_northward(), arr1(&[0.01, -0.01]), epsilon = 1.0E-15);
    }
}
