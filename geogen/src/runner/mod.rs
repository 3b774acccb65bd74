//! The runner: drives the generator, realizes each accepted configuration,
//! finds and filters its theorems, and writes a plain-text report.

mod report;

use crate::analyzer::filters::{classify, ClassifiedTheorem, TemplateLibrary};
use crate::analyzer::TheoremFinder;
use crate::ast::ObjectId;
use crate::generator::{GeneratedConfiguration, Generator};
use crate::parser::GeneratorInput;
use crate::picture::{realize, Realization, RealizeOptions};
use crate::{Error, GeogenResult, RunOptions};
use crossbeam::channel;
use rand::{rngs::StdRng, Rng, SeedableRng};
use report::Report;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A cooperative shutdown signal, checked at configuration boundaries and
/// between picture-set attempts. In-flight work finishes its current picture
/// set before exiting.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> ShutdownFlag {
        ShutdownFlag::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Totals for one processed input.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    /// Configurations realized and analyzed.
    pub analyzed: usize,
    /// Configurations skipped after unresolved inconsistencies or timeouts.
    pub skipped: usize,
    /// Theorems reported, classified ones included.
    pub theorems: usize,
}

/// The analysis verdict for one generated configuration.
enum Outcome {
    Theorems(Vec<ClassifiedTheorem>),
    Inconstructible { witness: ObjectId },
    Duplicate { older: ObjectId, newer: ObjectId },
    Unresolved,
    Timeout,
    Cancelled,
}

struct Analyzed {
    item: GeneratedConfiguration,
    outcome: Outcome,
}

/// Runs the whole pipeline for one input and writes its report to `dest`.
///
/// With one worker and a fixed seed the run is fully deterministic: two runs
/// produce byte-identical reports. With several workers, configurations are
/// analyzed in parallel and pruning of duplicate-bearing branches becomes
/// cooperative (verdicts are applied as they arrive).
pub fn run_input<W: Write>(
    input: &GeneratorInput,
    templates: &TemplateLibrary,
    options: &RunOptions,
    shutdown: &ShutdownFlag,
    dest: &mut W,
) -> GeogenResult<RunSummary> {
    options.validate()?;
    let master_seed = options.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let realize_options = RealizeOptions {
        pictures: options.pictures,
        retries: options.retries,
    };

    // The initial configuration must realize cleanly; anything else is an
    // analytic fault at startup.
    let mut rng = StdRng::seed_from_u64(master_seed);
    let initial = match realize(&input.configuration, &realize_options, &mut rng, || {
        shutdown.is_triggered()
    }) {
        Realization::Constructed(pictures) => pictures,
        Realization::Interrupted => return Ok(RunSummary::default()),
        Realization::Inconstructible { witness } => {
            return Err(Error::InitialConfiguration(format!(
                "object '{}' is not constructible",
                input.configuration.name(witness)
            )));
        }
        Realization::DuplicateObject { older, newer } => {
            return Err(Error::InitialConfiguration(format!(
                "objects '{}' and '{}' coincide",
                input.configuration.name(older),
                input.configuration.name(newer)
            )));
        }
        Realization::Unresolved => {
            return Err(Error::InitialConfiguration(
                "pictures kept disagreeing after all retries".to_owned(),
            ));
        }
    };
    let initial_theorems = TheoremFinder::new(&input.configuration, &initial)
        .find_all()
        .new_theorems;

    let mut generator = Generator::new(input, options.iterations);
    let mut results: Vec<Analyzed> = Vec::new();

    if options.workers <= 1 {
        while let Some(item) = generator.next() {
            if shutdown.is_triggered() {
                break;
            }
            let outcome = analyze_one(&item, templates, options, &realize_options, master_seed, shutdown);
            prune(&mut generator, &item, &outcome);
            results.push(Analyzed { item, outcome });
        }
    } else {
        let (work_tx, work_rx) = channel::bounded::<GeneratedConfiguration>(2 * options.workers);
        let (result_tx, result_rx) = channel::unbounded::<Analyzed>();
        crossbeam::scope(|s| {
            for _ in 0..options.workers {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                s.spawn(move |_| {
                    for item in work_rx.iter() {
                        let outcome = analyze_one(
                            &item,
                            templates,
                            options,
                            &realize_options,
                            master_seed,
                            shutdown,
                        );
                        if result_tx.send(Analyzed { item, outcome }).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_tx);

            loop {
                let item = match generator.next() {
                    Some(item) => item,
                    None => break,
                };
                if shutdown.is_triggered() {
                    break;
                }
                // Apply verdicts that already arrived, so duplicate-bearing
                // branches stop expanding as early as the pipeline allows.
                for analyzed in result_rx.try_iter() {
                    prune(&mut generator, &analyzed.item, &analyzed.outcome);
                    results.push(analyzed);
                }
                work_tx
                    .send(item)
                    .expect("workers outlive the generator loop");
            }
            drop(work_tx);
            for analyzed in result_rx.iter() {
                results.push(analyzed);
            }
        })
        .expect("worker pool panicked");
    }

    // Emission order is unspecified across workers; reports are ordered by
    // generation index so seeded runs are reproducible byte for byte.
    results.sort_by_key(|analyzed| analyzed.item.index);

    let mut summary = RunSummary::default();
    let mut report = Report::new(dest);
    report.write_header(input, options, &initial_theorems)?;
    let mut number = 0;
    for analyzed in &results {
        match &analyzed.outcome {
            Outcome::Theorems(theorems) => {
                summary.analyzed += 1;
                summary.theorems += theorems.len();
                number += 1;
                report.write_block(number, &analyzed.item, theorems)?;
            }
            Outcome::Inconstructible { witness } => {
                log::debug!(
                    "dropping {}: object '{}' is not constructible",
                    analyzed.item.canonical,
                    analyzed.item.configuration.name(*witness)
                );
            }
            Outcome::Duplicate { older, newer } => {
                log::debug!(
                    "dropping {}: '{}' duplicates '{}'",
                    analyzed.item.canonical,
                    analyzed.item.configuration.name(*newer),
                    analyzed.item.configuration.name(*older)
                );
            }
            Outcome::Unresolved => {
                summary.skipped += 1;
                log::warn!(
                    "skipping {}: pictures kept disagreeing after {} retries",
                    analyzed.item.canonical,
                    options.retries
                );
            }
            Outcome::Timeout => {
                summary.skipped += 1;
                log::warn!(
                    "skipping {}: analysis exceeded the {:?} budget",
                    analyzed.item.canonical,
                    options.timeout
                );
            }
            Outcome::Cancelled => (),
        }
    }
    report.finish()?;
    Ok(summary)
}

fn prune(generator: &mut Generator, item: &GeneratedConfiguration, outcome: &Outcome) {
    if matches!(
        outcome,
        Outcome::Inconstructible { .. } | Outcome::Duplicate { .. }
    ) {
        generator.suppress(&item.canonical);
    }
}

/// Realizes and analyzes one configuration inside a worker. Picture
/// randomness is derived from the master seed and the configuration's index,
/// so workers share no randomness state.
fn analyze_one(
    item: &GeneratedConfiguration,
    templates: &TemplateLibrary,
    options: &RunOptions,
    realize_options: &RealizeOptions,
    master_seed: u64,
    shutdown: &ShutdownFlag,
) -> Outcome {
    let deadline = Instant::now() + options.timeout;
    let mut rng = StdRng::seed_from_u64(seed_for(master_seed, item.index));
    let timed_out = || Instant::now() > deadline;
    let realization = realize(&item.configuration, realize_options, &mut rng, || {
        shutdown.is_triggered() || timed_out()
    });
    match realization {
        Realization::Constructed(pictures) => {
            if shutdown.is_triggered() {
                return Outcome::Cancelled;
            }
            if timed_out() {
                return Outcome::Timeout;
            }
            let output = TheoremFinder::new(&item.configuration, &pictures).find();
            let theorems = output
                .new_theorems
                .iter()
                .map(|theorem| ClassifiedTheorem {
                    classification: classify(
                        &item.configuration,
                        templates,
                        &output.facts,
                        theorem,
                    ),
                    theorem: theorem.clone(),
                })
                .collect();
            Outcome::Theorems(theorems)
        }
        Realization::Inconstructible { witness } => Outcome::Inconstructible { witness },
        Realization::DuplicateObject { older, newer } => Outcome::Duplicate { older, newer },
        Realization::Unresolved => Outcome::Unresolved,
        Realization::Interrupted => {
            if shutdown.is_triggered() {
                Outcome::Cancelled
            } else {
                Outcome::Timeout
            }
        }
    }
}

fn seed_for(master: u64, index: usize) -> u64 {
    // SplitMix64-style spreading keeps per-configuration streams independent.
    let mut z = master.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
