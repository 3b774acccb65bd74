//! The configuration generator: a breadth-first expansion of the initial
//! configuration, one constructed object per iteration, deduplicated by
//! canonical key.

mod arguments;

pub use arguments::{argument_tuples, ArgumentTuples};

use crate::ast::{least_configuration, Configuration};
use crate::parser::GeneratorInput;
use ahash::AHashSet;
use std::collections::VecDeque;

/// An accepted configuration flowing downstream to the analyzer.
#[derive(Debug, Clone)]
pub struct GeneratedConfiguration {
    /// The configuration, already rewritten into its canonical presentation.
    pub configuration: Configuration,
    /// The canonical key under which it was accepted.
    pub canonical: String,
    /// The expansion depth at which it appeared; its parent sits one level
    /// above.
    pub iteration: usize,
    /// Sequence number in emission order, used for deterministic reporting.
    pub index: usize,
}

/// The breadth-first configuration generator. It is a lazy finite stream:
/// each `next` call expands at most one queued configuration.
pub struct Generator {
    catalogue: Vec<crate::ast::Construction>,
    iterations: usize,
    accepted: AHashSet<String>,
    /// Configurations waiting to be expanded, with their key and depth.
    queue: VecDeque<(Configuration, String, usize)>,
    /// Keys of queued configurations that downstream analysis has pruned
    /// (duplicate-bearing or inconstructible); they are dropped before
    /// expansion.
    suppressed: AHashSet<String>,
    buffer: VecDeque<GeneratedConfiguration>,
    counter: usize,
}

impl Generator {
    pub fn new(input: &GeneratorInput, iterations: usize) -> Generator {
        let (key, _) = least_configuration(&input.configuration);
        let mut accepted = AHashSet::new();
        accepted.insert(key.clone());
        let mut queue = VecDeque::new();
        if iterations > 0 {
            queue.push_back((input.configuration.clone(), key, 0));
        }
        Generator {
            catalogue: input.rules.clone(),
            iterations,
            accepted,
            queue,
            suppressed: AHashSet::new(),
            buffer: VecDeque::new(),
            counter: 0,
        }
    }

    /// Drops a queued configuration before it is expanded. Called when the
    /// analyzer finds a configuration inconstructible or duplicate-bearing,
    /// so that its descendants are never generated.
    pub fn suppress(&mut self, canonical: &str) {
        self.suppressed.insert(canonical.to_owned());
    }

    /// Expands one queued configuration into the buffer. Returns `false`
    /// when the queue is drained.
    fn expand_next(&mut self) -> bool {
        let (config, _, depth) = loop {
            match self.queue.pop_front() {
                None => return false,
                Some((config, key, depth)) => {
                    if self.suppressed.contains(&key) {
                        continue;
                    }
                    break (config, key, depth);
                }
            }
        };
        debug_assert!(depth < self.iterations);
        for construction in &self.catalogue {
            let tuples: Vec<_> = argument_tuples(&config, construction).collect();
            for args in tuples {
                for output_index in 0..construction.output_count() {
                    let name = format!("x{}", config.len());
                    let candidate = config
                        .extended(construction.clone(), args.clone(), output_index, name)
                        .expect("argument generator produced a mismatched tuple");
                    let (key, remap) = least_configuration(&candidate);
                    if !self.accepted.insert(key.clone()) {
                        continue;
                    }
                    let canonical = candidate.remapped_loose(remap);
                    if depth + 1 < self.iterations {
                        self.queue
                            .push_back((canonical.clone(), key.clone(), depth + 1));
                    }
                    self.buffer.push_back(GeneratedConfiguration {
                        configuration: canonical,
                        canonical: key,
                        iteration: depth + 1,
                        index: self.counter,
                    });
                    self.counter += 1;
                }
            }
        }
        true
    }
}

impl Iterator for Generator {
    type Item = GeneratedConfiguration;

    fn next(&mut self) -> Option<GeneratedConfiguration> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(item);
            }
            if !self.expand_next() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Construction, ConstructionType, Layout};

    fn input(layout: Layout, names: &[&str], rules: &[ConstructionType]) -> GeneratorInput {
        GeneratorInput {
            configuration: Configuration::new(layout, names),
            rules: rules.iter().map(|&r| Construction::Predefined(r)).collect(),
        }
    }

    #[test]
    fn zero_iterations_generate_nothing() {
        let input = input(Layout::Triangle, &["A", "B", "C"], &[ConstructionType::Midpoint]);
        assert_eq!(Generator::new(&input, 0).count(), 0);
    }

    #[test]
    fn midpoints_of_a_triangle_one_iteration() {
        let input = input(Layout::Triangle, &["A", "B", "C"], &[ConstructionType::Midpoint]);
        let generated: Vec<_> = Generator::new(&input, 1).collect();
        // One configuration per unordered pair of loose points.
        assert_eq!(generated.len(), 3);
        for item in &generated {
            assert_eq!(item.iteration, 1);
            assert_eq!(item.configuration.constructed_count(), 1);
        }
    }

    #[test]
    fn canonical_keys_are_unique() {
        let input = input(Layout::Triangle, &["A", "B", "C"], &[ConstructionType::Midpoint]);
        let generated: Vec<_> = Generator::new(&input, 2).collect();
        let mut keys = AHashSet::new();
        for item in &generated {
            assert!(keys.insert(item.canonical.clone()), "duplicate key {}", item.canonical);
        }
    }

    #[test]
    fn each_depth_adds_exactly_one_object() {
        let input = input(
            Layout::Triangle,
            &["A", "B", "C"],
            &[ConstructionType::Midpoint, ConstructionType::LineFromPoints],
        );
        for item in Generator::new(&input, 2) {
            assert_eq!(item.configuration.constructed_count(), item.iteration);
        }
    }

    #[test]
    fn suppressed_configurations_are_not_expanded() {
        let input = input(
            Layout::ExplicitLineAndPoint,
            &["l", "P"],
            &[ConstructionType::PerpendicularLine],
        );
        let full_total = Generator::new(&input, 2).count();
        let mut with_pruning = Generator::new(&input, 2);
        let first = with_pruning.next().unwrap();
        with_pruning.suppress(&first.canonical);
        let pruned_total = 1 + with_pruning.count();
        assert!(pruned_total < full_total);
    }
}
