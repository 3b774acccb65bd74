//! End-to-end scenarios: generation, realization, theorem discovery and
//! filtering driven through the public API, with seeded randomness.

use geogen::analyzer::filters::{classify, Classification, TemplateLibrary};
use geogen::analyzer::TheoremFinder;
use geogen::ast::{Construction, ConstructionType, TheoremKind};
use geogen::generator::{GeneratedConfiguration, Generator};
use geogen::parser::parse_input;
use geogen::picture::{realize, Realization, RealizeOptions};
use geogen::runner::{run_input, ShutdownFlag};
use geogen::{Error, RunOptions};
use rand::{rngs::StdRng, SeedableRng};
use std::io::Cursor;
use std::time::Duration;

fn options(iterations: usize, seed: u64) -> RunOptions {
    RunOptions {
        iterations,
        pictures: 3,
        retries: 5,
        workers: 1,
        seed: Some(seed),
        timeout: Duration::from_secs(60),
    }
}

fn realized(item: &GeneratedConfiguration, seed: u64) -> geogen::picture::PictureSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let realize_options = RealizeOptions { pictures: 3, retries: 5 };
    match realize(&item.configuration, &realize_options, &mut rng, || false) {
        Realization::Constructed(pictures) => pictures,
        other => panic!("expected a realization, got {:?}", other),
    }
}

#[test]
fn triangle_midpoints_one_iteration() {
    let input = parse_input(Cursor::new("Triangle A B C\nRules:\nMidpoint\n")).unwrap();
    let generated: Vec<_> = Generator::new(&input, 1).collect();
    // One accepted configuration per unordered pair of loose points.
    assert_eq!(generated.len(), 3);

    let templates = TemplateLibrary::default();
    for item in &generated {
        let pictures = realized(item, 11);
        let output = TheoremFinder::new(&item.configuration, &pictures).find();
        let equal_segments: Vec<_> = output
            .new_theorems
            .iter()
            .filter(|t| t.kind == TheoremKind::EqualLineSegments)
            .collect();
        assert_eq!(equal_segments.len(), 1);
        // The midpoint's defining equality is implied by its construction.
        let classification = classify(
            &item.configuration,
            &templates,
            &output.facts,
            equal_segments[0],
        );
        assert_eq!(classification, Some(Classification::Trivial));
    }
}

#[test]
fn triangle_midpoints_two_iterations() {
    let input = parse_input(Cursor::new("Triangle A B C\nRules:\nMidpoint\n")).unwrap();
    let generated: Vec<_> = Generator::new(&input, 2).collect();

    let mut keys = std::collections::HashSet::new();
    for item in &generated {
        assert!(keys.insert(item.canonical.clone()), "duplicate key {}", item.canonical);
    }

    // The configuration with the midpoints of two sides yields the
    // midsegment parallel, and no filter claims it.
    let templates = TemplateLibrary::default();
    let mut found_unclassified_parallel = false;
    for item in generated.iter().filter(|i| i.iteration == 2) {
        let pictures = realized(item, 23);
        let output = TheoremFinder::new(&item.configuration, &pictures).find();
        for theorem in &output.new_theorems {
            if theorem.kind != TheoremKind::ParallelLines {
                continue;
            }
            if classify(&item.configuration, &templates, &output.facts, theorem).is_none() {
                found_unclassified_parallel = true;
            }
        }
    }
    assert!(found_unclassified_parallel);
}

#[test]
fn projection_foot_perpendicularity_is_trivial() {
    let input = parse_input(Cursor::new(
        "ExplicitLineAndPoint l P\nRules:\nPerpendicularLine\nPerpendicularProjection\n",
    ))
    .unwrap();
    let generated: Vec<_> = Generator::new(&input, 2).collect();
    let templates = TemplateLibrary::default();

    let projection = generated
        .iter()
        .find(|item| {
            item.iteration == 1
                && item
                    .configuration
                    .constructed()
                    .any(|(_, c)| {
                        c.construction
                            == Construction::Predefined(ConstructionType::PerpendicularProjection)
                    })
        })
        .expect("the projection foot configuration is generated");
    let pictures = realized(projection, 31);
    let output = TheoremFinder::new(&projection.configuration, &pictures).find();
    let perpendicular: Vec<_> = output
        .new_theorems
        .iter()
        .filter(|t| t.kind == TheoremKind::PerpendicularLines)
        .collect();
    assert!(!perpendicular.is_empty());
    for theorem in perpendicular {
        let classification =
            classify(&projection.configuration, &templates, &output.facts, theorem);
        assert_eq!(classification, Some(Classification::Trivial));
    }
}

#[test]
fn a_single_picture_refuses_to_start() {
    let input = parse_input(Cursor::new("Triangle A B C\nRules:\nMidpoint\n")).unwrap();
    let run_options = RunOptions { pictures: 1, ..options(1, 5) };
    let mut sink = Vec::new();
    let result = run_input(
        &input,
        &TemplateLibrary::default(),
        &run_options,
        &ShutdownFlag::new(),
        &mut sink,
    );
    assert!(matches!(result, Err(Error::BadOptions(_))));
    assert!(sink.is_empty());
}

#[test]
fn seeded_single_worker_runs_are_byte_identical() {
    let text = "Triangle A B C\nRules:\nMidpoint\n";
    let mut first = Vec::new();
    let mut second = Vec::new();
    for sink in [&mut first, &mut second] {
        let input = parse_input(Cursor::new(text)).unwrap();
        run_input(
            &input,
            &TemplateLibrary::default(),
            &options(2, 42),
            &ShutdownFlag::new(),
            sink,
        )
        .unwrap();
    }
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn zero_iterations_report_only_the_initial_configuration() {
    let input = parse_input(Cursor::new(
        "Triangle A B C\nM = Midpoint({A, B})\nRules:\nMidpoint\n",
    ))
    .unwrap();
    let mut sink = Vec::new();
    let summary = run_input(
        &input,
        &TemplateLibrary::default(),
        &options(0, 7),
        &ShutdownFlag::new(),
        &mut sink,
    )
    .unwrap();
    assert_eq!(summary.analyzed, 0);
    let report = String::from_utf8(sink).unwrap();
    assert!(report.contains("Initial configuration:"));
    assert!(report.contains("M = Midpoint({A, B})"));
    // The initial configuration's own theorems are reported.
    assert!(report.contains("EqualLineSegments(A-M, B-M)"));
    assert!(!report.contains("Configuration 1"));
}
