//! The simpler-definable filter: a theorem whose objects, closed under
//! argument dependency, span fewer constructed objects than the whole
//! configuration can be stated in a strictly smaller configuration.

use crate::ast::{Configuration, Theorem};

pub(super) fn definable_in_simpler(config: &Configuration, theorem: &Theorem) -> bool {
    let closure = config.dependency_closure(theorem.mentioned_objects());
    let constructed_in_closure = closure
        .iter()
        .filter(|&&id| config.get(id).as_constructed().is_some())
        .count();
    constructed_in_closure < config.constructed_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        Argument, Construction, ConstructionType, Layout, ObjectId, TheoremKind, TheoremObject,
    };

    fn pair(a: usize, b: usize) -> Argument {
        Argument::set(vec![
            Argument::Object(ObjectId(a)),
            Argument::Object(ObjectId(b)),
        ])
        .unwrap()
    }

    #[test]
    fn theorem_ignoring_an_unrelated_object_is_simpler_definable() {
        let config = Configuration::new(Layout::Triangle, &["A", "B", "C"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::Midpoint),
                vec![pair(0, 1)],
                0,
                "M".to_owned(),
            )
            .unwrap()
            .extended(
                Construction::Predefined(ConstructionType::Midpoint),
                vec![pair(0, 2)],
                0,
                "N".to_owned(),
            )
            .unwrap();
        // Mentions only A, B and M; N plays no role.
        let theorem = Theorem::new(
            TheoremKind::CollinearPoints,
            vec![
                TheoremObject::Point(ObjectId(0)),
                TheoremObject::Point(ObjectId(1)),
                TheoremObject::Point(ObjectId(3)),
            ],
        );
        assert!(definable_in_simpler(&config, &theorem));
        // Mentions both midpoints; nothing can be removed.
        let midsegment = Theorem::new(
            TheoremKind::ParallelLines,
            vec![
                TheoremObject::line_by_points(ObjectId(3), ObjectId(4)),
                TheoremObject::line_by_points(ObjectId(1), ObjectId(2)),
            ],
        );
        assert!(!definable_in_simpler(&config, &midsegment));
    }
}
