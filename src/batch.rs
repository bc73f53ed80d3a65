//! Bounded worker pool running one task per case.
//!
//! A failing case is recorded in its report and never stops the others.

use {
    crate::case::Case,
    anyhow::Result,
    log::{info, warn},
    rayon::{prelude::*, ThreadPoolBuilder},
    serde::{Deserialize, Serialize},
    std::sync::atomic::{AtomicUsize, Ordering},
};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum Outcome<T> {
    Done(T),
    /// Nothing to do for this case, e.g. missing inputs
    Skipped(String),
    Failed(String),
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CaseReport<T> {
    pub case: Case,
    pub outcome: Outcome<T>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub done: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn new<T>(reports: &[CaseReport<T>]) -> Self {
        let mut summary = BatchSummary::default();
        for report in reports {
            match report.outcome {
                Outcome::Done(_) => summary.done += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
                Outcome::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }
}

/// Runs `task` on every case with at most `workers` cases in flight.
/// Reports come back in the order of `cases`.
pub fn run<T, F>(label: &str, cases: &[Case], workers: usize, task: F) -> Result<Vec<CaseReport<T>>>
where
    T: Send,
    F: Fn(&Case) -> Result<Outcome<T>> + Sync,
{
    let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;

    let total = cases.len();
    let tenth = (total / 10).max(1);
    let finished = AtomicUsize::new(0);

    info!("{}: {} cases on {} workers", label, total, workers);

    let reports = pool.install(|| {
        cases
            .par_iter()
            .map(|case| {
                let outcome = match task(case) {
                    Ok(Outcome::Skipped(reason)) => {
                        warn!("{}: skipped {}: {}", label, case, reason);
                        Outcome::Skipped(reason)
                    }
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!("{}: {} failed: {:#}", label, case, e);
                        Outcome::Failed(format!("{:#}", e))
                    }
                };

                let n = finished.fetch_add(1, Ordering::Relaxed) + 1;
                if n % tenth == 0 || n == total {
                    info!(
                        "{}: progress {:6.2} %",
                        label,
                        100.0 * n as f64 / total as f64
                    );
                }

                CaseReport {
                    case: case.clone(),
                    outcome,
                }
            })
            .collect::<Vec<_>>()
    });

    let summary = BatchSummary::new(&reports);
    info!(
        "{}: {} done, {} skipped, {} failed",
        label, summary.done, summary.skipped, summary.failed
    );

    Ok(reports)
}

#[cfg(test)]
mod test {
    use {super::*, anyhow::bail};

    fn cases(n: usize) -> Vec<Case> {
        (0..n)
            .map(|i| Case::parse(&format!("JRA55-do_LAT{}_LON{}", i, 2 * i)).unwrap())
            .collect()
    }

    #[test]
    fn failures_are_isolated() {
        let cases = cases(20);

        let reports = run("test", &cases, 4, |case| {
            if case.latitude == 3.0 {
                bail!("no forcing");
            }
            if case.latitude == 5.0 {
                return Ok(Outcome::Skipped("missing input".to_owned()));
            }
            Ok(Outcome::Done(case.longitude))
        })
        .unwrap();

        assert_eq!(reports.len(), 20);
        assert_eq!(reports[3].outcome, Outcome::Failed("no forcing".to_owned()));
        assert_eq!(
            reports[5].outcome,
            Outcome::Skipped("missing input".to_owned())
        );
        assert_eq!(reports[7].outcome, Outcome::Done(14.0));
        assert_eq!(reports[7].case, cases[7]);
        assert_eq!(
            BatchSummary::new(&reports),
            BatchSummary {
                done: 18,
                skipped: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn empty_batch() {
        let reports = run::<(), _>("test", &[], 8, |_| Ok(Outcome::Done(()))).unwrap();
        assert!(reports.is_empty());
    }
}
