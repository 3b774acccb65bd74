//! The argument generator: given a configuration and a construction, a lazy
//! finite stream of the distinct argument tuples matching the construction's
//! signature that the configuration has not used yet.

use crate::ast::{
    signature_object_counts, Argument, Configuration, Construction, ObjectId, Parameter,
};
use ahash::AHashSet;

/// Returns the stream of new argument tuples for `construction` in `config`.
pub fn argument_tuples(
    config: &Configuration,
    construction: &Construction,
) -> ArgumentTuples {
    let signature = construction.signature();
    let counts = signature_object_counts(signature);
    let mut exhausted = false;
    let mut variations: [Vec<Vec<ObjectId>>; 3] = Default::default();
    for (index, slot) in variations.iter_mut().enumerate() {
        let k = counts[index];
        if k == 0 {
            // This type is unused; a single empty choice keeps the odometer
            // uniform.
            *slot = vec![vec![]];
            continue;
        }
        let available = config.objects_of_type(crate::ast::ObjectType::ALL[index]);
        if available.len() < k {
            exhausted = true;
            break;
        }
        *slot = k_variations(&available, k);
    }
    ArgumentTuples {
        signature: signature.to_vec(),
        variations,
        cursor: [0; 3],
        exhausted,
        seen: AHashSet::new(),
        forbidden: config.used_arguments(construction),
    }
}

/// A lazy stream of distinct argument tuples. Tuples whose canonical form
/// collides with an earlier-produced tuple (set symmetry) or with the
/// configuration's forbidden index are discarded.
pub struct ArgumentTuples {
    signature: Vec<Parameter>,
    /// Ordered k-variations per object type, indexed by `ObjectType::index`.
    variations: [Vec<Vec<ObjectId>>; 3],
    cursor: [usize; 3],
    exhausted: bool,
    seen: AHashSet<Vec<Argument>>,
    forbidden: AHashSet<Vec<Argument>>,
}

impl Iterator for ArgumentTuples {
    type Item = Vec<Argument>;

    fn next(&mut self) -> Option<Vec<Argument>> {
        loop {
            if self.exhausted {
                return None;
            }
            let selection = [
                self.variations[0][self.cursor[0]].as_slice(),
                self.variations[1][self.cursor[1]].as_slice(),
                self.variations[2][self.cursor[2]].as_slice(),
            ];
            let tuple = bind(&self.signature, &selection);
            self.advance();
            if self.forbidden.contains(&tuple) || !self.seen.insert(tuple.clone()) {
                continue;
            }
            return Some(tuple);
        }
    }
}

impl ArgumentTuples {
    fn advance(&mut self) {
        for i in (0..3).rev() {
            self.cursor[i] += 1;
            if self.cursor[i] < self.variations[i].len() {
                return;
            }
            self.cursor[i] = 0;
        }
        self.exhausted = true;
    }
}

/// Folds one selection of objects (per type, in order) back into the
/// tree-shaped argument layout the signature demands.
fn bind(signature: &[Parameter], selection: &[&[ObjectId]; 3]) -> Vec<Argument> {
    let mut cursors = [0usize; 3];
    signature
        .iter()
        .map(|param| bind_param(param, selection, &mut cursors))
        .collect()
}

fn bind_param(
    param: &Parameter,
    selection: &[&[ObjectId]; 3],
    cursors: &mut [usize; 3],
) -> Argument {
    match param {
        Parameter::Object(ty) => {
            let index = ty.index();
            let id = selection[index][cursors[index]];
            cursors[index] += 1;
            Argument::Object(id)
        }
        Parameter::Set { inner, count } => {
            let elements = (0..*count)
                .map(|_| bind_param(inner, selection, cursors))
                .collect();
            // The selection never repeats an object, so set elements are
            // always distinct.
            Argument::set(elements).expect("variation without repetition produced a duplicate")
        }
    }
}

/// All ordered `k`-variations without repetition of the given objects.
fn k_variations(ids: &[ObjectId], k: usize) -> Vec<Vec<ObjectId>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    let mut used = vec![false; ids.len()];
    variations_into(ids, k, &mut used, &mut current, &mut out);
    out
}

fn variations_into(
    ids: &[ObjectId],
    k: usize,
    used: &mut [bool],
    current: &mut Vec<ObjectId>,
    out: &mut Vec<Vec<ObjectId>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in 0..ids.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(ids[i]);
        variations_into(ids, k, used, current, out);
        current.pop();
        used[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConstructionType, Layout};

    fn triangle() -> Configuration {
        Configuration::new(Layout::Triangle, &["A", "B", "C"])
    }

    #[test]
    fn midpoint_tuples_are_unordered_pairs() {
        let config = triangle();
        let construction = Construction::Predefined(ConstructionType::Midpoint);
        let tuples: Vec<_> = argument_tuples(&config, &construction).collect();
        // C(3, 2) unordered pairs, not 6 ordered ones.
        assert_eq!(tuples.len(), 3);
    }

    #[test]
    fn ordered_signatures_keep_order() {
        let config = triangle();
        let construction = Construction::Predefined(ConstructionType::CircleWithCenterThroughPoint);
        let tuples: Vec<_> = argument_tuples(&config, &construction).collect();
        // Ordered pairs of distinct points.
        assert_eq!(tuples.len(), 6);
    }

    #[test]
    fn used_arguments_are_excluded() {
        let config = triangle();
        let construction = Construction::Predefined(ConstructionType::Midpoint);
        let args = argument_tuples(&config, &construction).next().unwrap();
        let extended = config
            .extended(construction.clone(), args, 0, "M".to_owned())
            .unwrap();
        let remaining: Vec<_> = argument_tuples(&extended, &construction).collect();
        // One more point is available, but the pair already constructed is
        // forbidden: C(4, 2) - 1.
        assert_eq!(remaining.len(), 5);
    }

    #[test]
    fn missing_object_types_yield_an_empty_stream() {
        let config = triangle();
        let construction = Construction::Predefined(ConstructionType::IntersectionOfLines);
        assert_eq!(argument_tuples(&config, &construction).count(), 0);
    }

    #[test]
    fn set_multiplicity_beyond_available_objects_yields_nothing() {
        let config = Configuration::new(Layout::LineSegment, &["A", "B"]);
        let construction = Construction::Predefined(ConstructionType::Circumcircle);
        assert_eq!(argument_tuples(&config, &construction).count(), 0);
    }
}
