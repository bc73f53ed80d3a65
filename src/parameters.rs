use {
    crate::{
        case::Period,
        constants::*,
        grid::GridSegment,
        mld::{Interpolation, Rule, Stratification},
    },
    chrono::NaiveDate,
    serde::Deserialize,
    std::path::PathBuf,
};

/// Batch parameters
#[derive(Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub physical: Physical,
    pub grid: Grid,
    pub stokes: Stokes,
    pub mld: Mld,
    pub simulation: Simulation,
    pub environment: Environment,
    pub batch: Batch,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Physical {
    /// Gravitational acceleration used in the deep-water dispersion relation
    pub gravity: f64,
    /// Density increase below the reference level marking the mixed layer base
    pub density_criterion: f64,
    /// Temperature change below the reference level marking the mixed layer base
    pub temperature_criterion: f64,
}

impl Default for Physical {
    fn default() -> Self {
        Physical {
            gravity: GRAVITY,
            density_criterion: DENSITY_CRITERION,
            temperature_criterion: TEMPERATURE_CRITERION,
        }
    }
}

/// Vertical grid the Stokes drift profiles are evaluated on
#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Grid {
    /// Segments below the surface point, listed from the surface downward
    pub segments: Vec<GridSegment>,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            segments: vec![
                GridSegment {
                    start: 0.5,
                    stop: 35.5,
                    count: 36,
                },
                GridSegment {
                    start: 40.0,
                    stop: 200.0,
                    count: 17,
                },
            ],
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Stokes {
    /// Partitioned surface Stokes drift spectrum read from each case directory
    pub spectrum_file: String,
    /// Full depth profiles written to each case directory
    pub profile_file: String,
    /// Surface time series written to each case directory
    pub surface_file: String,
    /// Recompute cases whose outputs already exist
    pub overwrite: bool,
}

impl Default for Stokes {
    fn default() -> Self {
        Stokes {
            spectrum_file: "usp_file.dat".to_owned(),
            profile_file: "us_prof.dat".to_owned(),
            surface_file: "us_surface.dat".to_owned(),
            overwrite: false,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Mld {
    pub rule: Rule,
    /// Direction of the temperature departure, ignored by the density rule
    pub stratification: Stratification,
    pub interpolation: Interpolation,
    /// Depth of the reference value (0 selects the top sample)
    pub reference_depth: f64,
    /// Deepest MLD the caller trusts, on top of the domain bottom
    pub max_depth: Option<f64>,
    /// Simulator profile dump read from each run directory
    pub profile_file: String,
    /// Value column of `profile_file` holding the scalar (1 is the first after z)
    pub column: usize,
    /// Turbulence closure subdirectory of the run tree
    pub turbulence_method: String,
}

impl Default for Mld {
    fn default() -> Self {
        Mld {
            rule: Rule::Density,
            stratification: Stratification::Auto,
            interpolation: Interpolation::None,
            reference_depth: 0.0,
            max_depth: None,
            profile_file: "rho_p.dat".to_owned(),
            column: 1,
            turbulence_method: "StokesMOST".to_owned(),
        }
    }
}

impl Mld {
    /// Criterion matching the selected rule
    pub fn criterion(&self, physical: &Physical) -> f64 {
        match self.rule {
            Rule::Density => physical.density_criterion,
            Rule::Temperature => physical.temperature_criterion,
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Simulation {
    /// Name of the simulation campaign in the run tree
    pub title: String,
    /// Vertical resolution of the simulations (m)
    pub dz: f64,
    /// Time step of the simulations (s)
    pub dt: f64,
    /// Simulated periods, one run directory each
    pub periods: Vec<Period>,
}

impl Default for Simulation {
    fn default() -> Self {
        let month = |y, m, last| Period {
            start: NaiveDate::from_ymd(y, m, 1),
            end: NaiveDate::from_ymd(y, m, last),
        };

        Simulation {
            title: "JRA55-do_Global_dampV5d_3h".to_owned(),
            dz: 1.0,
            dt: 600.0,
            periods: vec![
                month(2008, 6, 30),
                month(2008, 7, 31),
                month(2008, 8, 31),
                month(2008, 9, 30),
                month(2008, 10, 31),
                month(2008, 11, 30),
                month(2008, 12, 31),
                month(2009, 1, 31),
                month(2009, 2, 28),
                month(2009, 3, 31),
                month(2009, 4, 30),
                month(2009, 5, 31),
            ],
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Directory holding one input directory per case
    pub data_directory: PathBuf,
    /// Root of the simulator run tree
    pub run_directory: PathBuf,
    /// Root of the summary output
    pub output_directory: PathBuf,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            data_directory: PathBuf::from("data"),
            run_directory: PathBuf::from("run"),
            output_directory: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Batch {
    /// Number of cases processed concurrently
    pub workers: usize,
}

impl Default for Batch {
    fn default() -> Self {
        Batch { workers: 8 }
    }
}

#[cfg(test)]
mod test {
    use {super::*, std::fs::File};

    #[test]
    fn defaults() {
        assert_eq!(
            Parameters::default(),
            serde_yaml::from_reader::<_, Parameters>(
                File::open("src/testdata/defaults.yaml").unwrap()
            )
            .unwrap()
        );
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let params = serde_yaml::from_str::<Parameters>(
            "mld:\n  rule: temperature\n  interpolation: linear\nbatch:\n  workers: 2\n",
        )
        .unwrap();

        assert_eq!(params.mld.rule, Rule::Temperature);
        assert_eq!(params.mld.interpolation, Interpolation::Linear);
        assert_eq!(params.mld.profile_file, "rho_p.dat");
        assert_eq!(params.mld.column, 1);
        assert_eq!(params.batch.workers, 2);
        assert_eq!(params.physical, Physical::default());
        assert_eq!(params.mld.criterion(&params.physical), TEMPERATURE_CRITERION);
    }
}
