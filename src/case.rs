//! Case identifiers and simulation periods as they appear in directory names.

use {
    crate::{
        constants::DATE_FORMAT,
        error::{Error, Result},
        parameters::Parameters,
    },
    chrono::NaiveDate,
    log::warn,
    serde::{Deserialize, Serialize},
    std::{
        fmt,
        fs,
        path::{Path, PathBuf},
    },
};

/// One geographic column, e.g. `JRA55-do_LAT-70_LON270_20080601-20091231`
/// or `JRA55-do_LAT-70_LON270`.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    /// Degrees north
    pub latitude: f64,
    /// Degrees east, in [-180, 180)
    pub longitude: f64,
}

impl Case {
    pub fn parse(name: &str) -> Result<Self> {
        let token = |prefix: &str| -> Result<f64> {
            name.split('_')
                .find_map(|part| part.strip_prefix(prefix))
                .and_then(|value| value.parse::<f64>().ok())
                .ok_or_else(|| Error::CaseName(name.to_owned()))
        };

        let latitude = token("LAT")?;
        let mut longitude = token("LON")?;
        if longitude >= 180.0 {
            longitude -= 360.0;
        }

        Ok(Case {
            name: name.to_owned(),
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Sorted case directories directly under `dir`. Directories whose names do
/// not carry a location are skipped.
pub fn list_cases(dir: &Path) -> Result<Vec<Case>> {
    let mut names = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect::<Vec<String>>();
    names.sort();

    Ok(names
        .iter()
        .filter_map(|name| match Case::parse(name) {
            Ok(case) => Some(case),
            Err(e) => {
                warn!("Ignoring {}: {}", dir.join(name).display(), e);
                None
            }
        })
        .collect())
}

/// Span of one simulation run, both ends inclusive.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Run tree label, e.g. `VR1m_DT600s_20080601-20080630`
    pub fn setup(&self, dz: f64, dt: f64) -> String {
        format!(
            "VR{}m_DT{}s_{}-{}",
            dz as i64,
            dt as i64,
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

/// Directory layout of a simulation campaign.
#[derive(Debug, Clone)]
pub struct RunTree<'a> {
    params: &'a Parameters,
}

impl<'a> RunTree<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        RunTree { params }
    }

    fn setup(&self, period: &Period) -> String {
        let simulation = &self.params.simulation;
        period.setup(simulation.dz, simulation.dt)
    }

    /// Directory holding one run directory per case
    pub fn runs(&self, period: &Period) -> PathBuf {
        self.params
            .environment
            .run_directory
            .join(&self.params.simulation.title)
            .join(self.setup(period))
            .join(&self.params.mld.turbulence_method)
    }

    /// Directory receiving the summary of a period
    pub fn summary(&self, period: &Period) -> PathBuf {
        self.params
            .environment
            .output_directory
            .join("data")
            .join(&self.params.simulation.title)
            .join(self.setup(period))
    }
}
