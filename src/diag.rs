//! Mixed layer depth diagnostics of the simulator output over the run tree.

use {
    crate::{
        batch::{self, BatchSummary, CaseReport, Outcome},
        case::{list_cases, Case, Period, RunTree},
        dat,
        map::MldMap,
        mld::{MixedLayerDepthDetector, MldSummary},
        parameters::Parameters,
    },
    anyhow::{ensure, Context, Result},
    log::{debug, info, warn},
    std::{fs::create_dir_all, path::Path},
};

/// Time-mean MLD of one run, invalid detections skipped.
pub fn mld_case(
    case: &Case,
    runs: &Path,
    detector: &MixedLayerDepthDetector,
    params: &Parameters,
) -> Result<Outcome<MldSummary>> {
    let path = runs.join(&case.name).join(&params.mld.profile_file);
    if !path.exists() {
        return Ok(Outcome::Skipped(format!("no output {}", path.display())));
    }

    let series = dat::load_profiles(&path, params.mld.column)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let bound = params.mld.max_depth.unwrap_or(std::f64::INFINITY);
    let mlds = detector.detect_series(&series.profiles, bound);
    let summary = MldSummary::new(&mlds);

    debug!(
        "{}: {} detected, {} undefined, {} excluded, mean {:?}",
        case, summary.detected, summary.undefined, summary.excluded, summary.mean
    );

    Ok(Outcome::Done(summary))
}

/// Name of the summary files of the configured rule
pub fn output_stem(params: &Parameters) -> String {
    format!(
        "data_map_mld_{}_mean_{}",
        params.mld.rule.label(),
        params.mld.turbulence_method
    )
}

pub fn mld_period(params: &Parameters, period: &Period) -> Result<MldMap> {
    let tree = RunTree::new(params);
    let runs = tree.runs(period);
    let detector = MixedLayerDepthDetector::from_parameters(params)?;
    ensure!(
        params.mld.column >= 1,
        "Profile column must be 1 or more, column 0 holds z"
    );

    let cases = list_cases(&runs)
        .with_context(|| format!("Failed to list runs in {}", runs.display()))?;

    let reports = batch::run("mld", &cases, params.batch.workers, |case| {
        mld_case(case, &runs, &detector, params)
    })?;

    let map = to_map(params, &reports);

    let out = tree.summary(period);
    create_dir_all(&out)?;
    map.save(&out, &output_stem(params))
        .with_context(|| format!("Failed to save MLD map in {}", out.display()))?;

    let summary = BatchSummary::new(&reports);
    info!(
        "{} to {}: {} columns mapped, {} skipped, {} failed",
        period.start, period.end, summary.done, summary.skipped, summary.failed
    );

    Ok(map)
}

/// Cases that ran contribute a point, NaN if they never had a valid MLD.
pub fn to_map(params: &Parameters, reports: &[CaseReport<MldSummary>]) -> MldMap {
    let mut map = MldMap::new(&format!("mld_{}", params.mld.rule.label()), "m");
    for report in reports {
        if let Outcome::Done(summary) = &report.outcome {
            map.push(report.case.longitude, report.case.latitude, summary.mean);
        }
    }
    map
}

/// Maps every period that has a run directory.
pub fn mld(params: &Parameters) -> Result<Vec<MldMap>> {
    let tree = RunTree::new(params);
    let mut maps = vec![];

    for period in &params.simulation.periods {
        let setup = period.setup(params.simulation.dz, params.simulation.dt);
        if !tree.runs(period).is_dir() {
            warn!("No runs for {}, skipping", setup);
            continue;
        }

        info!("Period {}", setup);
        maps.push(mld_period(params, period)?);
    }

    Ok(maps)
}
