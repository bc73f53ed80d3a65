#[macro_use]
extern crate clap;

use {
    anyhow::{bail, Result},
    log::{error, info},
    ocean_column::{
        batch::{BatchSummary, CaseReport},
        diag, preprocess,
        parameters::Parameters,
    },
    simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode},
    std::fs::File,
};

#[quit::main]
fn main() {
    let matches = clap_app!(ocean_column =>
        (version: crate_version!())
        (@arg PARAMETERS: -p --parameters +takes_value +required "Path to file containing batch parameters.")
        (@arg WORKERS: -j --workers +takes_value "Number of cases processed concurrently, overrides the parameters file.")
        (@subcommand stokes =>
            (about: "Builds Stokes drift profiles and surface time series from the partitioned surface spectrum of every case.")
        )
        (@subcommand mld =>
            (about: "Maps the time-mean mixed layer depth of every simulated column, one map per simulation period.")
        )
    )
    .get_matches();

    TermLogger::init(
        LevelFilter::Debug,
        LogConfig::default(),
        TerminalMode::Mixed,
    )
    .expect("Failed to initialize logger");

    let mut params = {
        // Should never panic as clap should return an error if the argument was not supplied
        let path = matches
            .value_of("PARAMETERS")
            .expect("Path to parameters file not supplied");

        let file = File::open(path).unwrap_or_else(|e| {
            error!("Failed to open {}: \"{}\"", path, e);
            quit::with_code(1);
        });

        let params = serde_yaml::from_reader::<_, Parameters>(file).unwrap_or_else(|e| {
            error!("Failed to parse parameters from {}: \"{}\"", path, e);
            quit::with_code(1);
        });

        info!(
            "Successfully loaded batch parameters from \"{}\": \n{:#?}",
            path, params
        );

        params
    };

    if let Some(workers) = matches.value_of("WORKERS") {
        params.batch.workers = workers.parse().unwrap_or_else(|e| {
            error!("Invalid worker count {}: \"{}\"", workers, e);
            quit::with_code(1);
        });
    }

    run_subcommand(matches.subcommand_name(), &params).unwrap_or_else(|e| {
        error!("Error: \"{:#}\"", e);
        quit::with_code(1);
    });
}

fn check_reports<T>(reports: &[CaseReport<T>]) -> Result<()> {
    let summary = BatchSummary::new(reports);
    if summary.done == 0 && summary.failed > 0 {
        bail!("All {} attempted cases failed", summary.failed);
    }
    Ok(())
}

fn run_subcommand(subcmd: Option<&str>, params: &Parameters) -> Result<()> {
    let subcmd = match subcmd {
        Some(s) => s,
        None => bail!("No subcommand selected"),
    };

    info!("Starting {}", subcmd);

    match subcmd {
        "stokes" => {
            let reports = preprocess::stokes(params)?;
            check_reports(&reports)?;
        }
        "mld" => {
            let maps = diag::mld(params)?;
            info!("Saved {} MLD maps", maps.len());
        }
        _ => {
            // Should be unreachable due to clap catching this error
            bail!("Unrecognized subcommand");
        }
    }

    info!("Finished {}", subcmd);

    Ok(())
}
