//! Stokes drift preprocessing: turns the partitioned surface spectrum of every
//! case into the profile and surface files the simulator reads.

use {
    crate::{
        batch::{self, CaseReport, Outcome},
        case::{list_cases, Case},
        dat,
        grid::DepthGrid,
        parameters::Parameters,
        stokes::{check_gravity, StokesProfileBuilder},
    },
    anyhow::{Context, Result},
    log::debug,
};

/// Number of time instants written for a case
pub type Written = usize;

pub fn stokes_case(case: &Case, grid: &DepthGrid, params: &Parameters) -> Result<Outcome<Written>> {
    let dir = params.environment.data_directory.join(&case.name);
    let profile_path = dir.join(&params.stokes.profile_file);
    let surface_path = dir.join(&params.stokes.surface_file);

    if !params.stokes.overwrite && profile_path.exists() && surface_path.exists() {
        return Ok(Outcome::Skipped("Stokes drift files already present".to_owned()));
    }

    let spectrum_path = dir.join(&params.stokes.spectrum_file);
    if !spectrum_path.exists() {
        return Ok(Outcome::Skipped(format!(
            "no spectrum file {}",
            spectrum_path.display()
        )));
    }

    let spectra = dat::load_spectrum(&spectrum_path)
        .with_context(|| format!("Failed to read {}", spectrum_path.display()))?;

    let builder = StokesProfileBuilder::new(
        grid.clone(),
        spectra.bands().clone(),
        params.physical.gravity,
    )?;
    let series = builder.build_series(&spectra)?;

    dat::save_stokes(&series, &profile_path, &surface_path)
        .with_context(|| format!("Failed to write Stokes drift files in {}", dir.display()))?;

    debug!(
        "{}: {} time instants on {} depths",
        case,
        series.times().len(),
        grid.len()
    );

    Ok(Outcome::Done(series.times().len()))
}

pub fn stokes(params: &Parameters) -> Result<Vec<CaseReport<Written>>> {
    check_gravity(params.physical.gravity)?;
    let grid = DepthGrid::from_segments(&params.grid.segments)?;
    let cases = list_cases(&params.environment.data_directory).with_context(|| {
        format!(
            "Failed to list cases in {}",
            params.environment.data_directory.display()
        )
    })?;

    batch::run("stokes", &cases, params.batch.workers, |case| {
        stokes_case(case, &grid, params)
    })
}
