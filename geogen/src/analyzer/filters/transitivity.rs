//! The transitivity filter: theorems of equivalence-flavoured kinds that are
//! the composition of two known facts.

use crate::ast::{Theorem, TheoremKind, TheoremObject};

pub(super) fn implied_by_transitivity(
    theorem: &Theorem,
    facts: &[Theorem],
) -> Option<(Theorem, Theorem)> {
    match theorem.kind {
        TheoremKind::ParallelLines
        | TheoremKind::EqualLineSegments
        | TheoremKind::EqualAngles => chain_same_kind(theorem, facts),
        TheoremKind::PerpendicularLines => perpendicular_chain(theorem, facts),
        TheoremKind::ConcyclicPoints => concyclic_chain(theorem, facts),
        _ => None,
    }
}

/// If `fact` relates exactly `x` and one other entity, returns that entity.
fn other_of<'a>(fact: &'a Theorem, x: &TheoremObject) -> Option<&'a TheoremObject> {
    match fact.objects.as_slice() {
        [a, b] if a == x => Some(b),
        [a, b] if b == x => Some(a),
        _ => None,
    }
}

fn relates(fact: &Theorem, x: &TheoremObject, y: &TheoremObject) -> bool {
    matches!(fact.objects.as_slice(), [a, b] if (a == x && b == y) || (a == y && b == x))
}

/// `t = {x, y}` follows from `{x, z}` and `{z, y}` of the same kind.
fn chain_same_kind(theorem: &Theorem, facts: &[Theorem]) -> Option<(Theorem, Theorem)> {
    let [x, y] = theorem.objects.as_slice() else {
        return None;
    };
    for f1 in facts.iter().filter(|f| f.kind == theorem.kind && *f != theorem) {
        let Some(z) = other_of(f1, x) else { continue };
        for f2 in facts.iter().filter(|f| f.kind == theorem.kind && *f != theorem) {
            if relates(f2, z, y) {
                return Some((f1.clone(), f2.clone()));
            }
        }
    }
    None
}

/// Perpendicularity composes with parallelism: `x ⊥ y` follows from
/// `x ∥ z` and `z ⊥ y`, or from `x ⊥ z` and `z ∥ y`.
fn perpendicular_chain(theorem: &Theorem, facts: &[Theorem]) -> Option<(Theorem, Theorem)> {
    let [x, y] = theorem.objects.as_slice() else {
        return None;
    };
    for (first, second) in [(x, y), (y, x)] {
        for parallel in facts.iter().filter(|f| f.kind == TheoremKind::ParallelLines) {
            let Some(z) = other_of(parallel, first) else { continue };
            for perpendicular in facts
                .iter()
                .filter(|f| f.kind == TheoremKind::PerpendicularLines && *f != theorem)
            {
                if relates(perpendicular, z, second) {
                    return Some((parallel.clone(), perpendicular.clone()));
                }
            }
        }
    }
    None
}

/// Four concyclic points follow from two concyclic facts sharing three
/// points whose union covers them: both quadruples then lie on the same
/// circumscribing circle.
fn concyclic_chain(theorem: &Theorem, facts: &[Theorem]) -> Option<(Theorem, Theorem)> {
    let covered = |f1: &Theorem, f2: &Theorem| {
        let shared = f1.objects.iter().filter(|o| f2.objects.contains(o)).count();
        shared >= 3
            && theorem
                .objects
                .iter()
                .all(|o| f1.objects.contains(o) || f2.objects.contains(o))
    };
    let candidates: Vec<&Theorem> = facts
        .iter()
        .filter(|f| f.kind == TheoremKind::ConcyclicPoints && *f != theorem)
        .collect();
    for (i, f1) in candidates.iter().enumerate() {
        for f2 in &candidates[i + 1..] {
            if covered(f1, f2) {
                return Some(((*f1).clone(), (*f2).clone()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ObjectId;

    fn line(id: usize) -> TheoremObject {
        TheoremObject::Line(ObjectId(id))
    }

    fn parallel(a: usize, b: usize) -> Theorem {
        Theorem::new(TheoremKind::ParallelLines, vec![line(a), line(b)])
    }

    fn perpendicular(a: usize, b: usize) -> Theorem {
        Theorem::new(TheoremKind::PerpendicularLines, vec![line(a), line(b)])
    }

    #[test]
    fn parallelism_chains() {
        let facts = vec![parallel(0, 1), parallel(1, 2), parallel(0, 2)];
        let theorem = parallel(0, 2);
        let (f1, f2) = implied_by_transitivity(&theorem, &facts).unwrap();
        assert_ne!(f1, theorem);
        assert_ne!(f2, theorem);
    }

    #[test]
    fn perpendicularity_composes_with_parallelism() {
        let facts = vec![parallel(0, 1), perpendicular(1, 2), perpendicular(0, 2)];
        let theorem = perpendicular(0, 2);
        let (f1, f2) = implied_by_transitivity(&theorem, &facts).unwrap();
        assert_eq!(f1, parallel(0, 1));
        assert_eq!(f2, perpendicular(1, 2));
    }

    #[test]
    fn unsupported_kinds_are_never_chained() {
        let theorem = Theorem::new(
            TheoremKind::CollinearPoints,
            vec![
                TheoremObject::Point(ObjectId(0)),
                TheoremObject::Point(ObjectId(1)),
                TheoremObject::Point(ObjectId(2)),
            ],
        );
        assert!(implied_by_transitivity(&theorem, &[]).is_none());
    }

    #[test]
    fn a_pair_without_a_connecting_fact_is_not_chained() {
        let facts = vec![parallel(0, 1), parallel(2, 3), parallel(0, 3)];
        let theorem = parallel(0, 3);
        assert!(implied_by_transitivity(&theorem, &facts).is_none());
    }
}
