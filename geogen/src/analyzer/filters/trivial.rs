//! The trivial-theorem filter: theorems that follow from the definitional
//! axioms of the last-added object's construction.

use super::expand_entities;
use crate::ast::{
    ConfigObject, Configuration, Construction, ConstructionType, ObjectId, Theorem, TheoremKind,
    TheoremObject,
};

pub(super) fn is_trivial(config: &Configuration, theorem: &Theorem) -> bool {
    let last = match config.last_added() {
        Some(id) => id,
        None => return false,
    };
    let expanded = expand_entities(theorem, config);
    definitional_theorems(config, last)
        .iter()
        .any(|definitional| expand_entities(definitional, config) == expanded)
}

/// The closed set of theorems that must hold by definition of the given
/// constructed object. Constructions whose definitional content is pure
/// incidence (intersections, circumcircles) contribute nothing: no theorem
/// kind expresses a single incidence.
pub fn definitional_theorems(config: &Configuration, id: ObjectId) -> Vec<Theorem> {
    let constructed = match config.get(id) {
        ConfigObject::Constructed(c) => c,
        ConfigObject::Loose { .. } => return vec![],
    };
    let ty = match &constructed.construction {
        Construction::Predefined(ty) => *ty,
        Construction::Composed(_) => return vec![],
    };
    let ids: Vec<ObjectId> = constructed.args.iter().flat_map(|a| a.objects()).collect();
    match ty {
        ConstructionType::Midpoint => vec![
            Theorem::new(
                TheoremKind::CollinearPoints,
                vec![
                    TheoremObject::Point(ids[0]),
                    TheoremObject::Point(ids[1]),
                    TheoremObject::Point(id),
                ],
            ),
            Theorem::new(
                TheoremKind::EqualLineSegments,
                vec![
                    TheoremObject::segment(ids[0], id),
                    TheoremObject::segment(ids[1], id),
                ],
            ),
        ],
        ConstructionType::PerpendicularLine => vec![Theorem::new(
            TheoremKind::PerpendicularLines,
            vec![TheoremObject::Line(id), TheoremObject::Line(ids[1])],
        )],
        ConstructionType::ParallelLine => vec![Theorem::new(
            TheoremKind::ParallelLines,
            vec![TheoremObject::Line(id), TheoremObject::Line(ids[1])],
        )],
        ConstructionType::PerpendicularProjection => vec![Theorem::new(
            TheoremKind::PerpendicularLines,
            vec![
                TheoremObject::line_by_points(ids[0], id),
                TheoremObject::Line(ids[1]),
            ],
        )],
        ConstructionType::PerpendicularBisector => vec![Theorem::new(
            TheoremKind::PerpendicularLines,
            vec![
                TheoremObject::Line(id),
                TheoremObject::line_by_points(ids[0], ids[1]),
            ],
        )],
        ConstructionType::InternalAngleBisector => vec![Theorem::new(
            TheoremKind::EqualAngles,
            vec![
                TheoremObject::angle(
                    TheoremObject::Line(id),
                    TheoremObject::line_by_points(ids[0], ids[1]),
                ),
                TheoremObject::angle(
                    TheoremObject::Line(id),
                    TheoremObject::line_by_points(ids[0], ids[2]),
                ),
            ],
        )],
        ConstructionType::Circumcenter => {
            let pairs = [(ids[0], ids[1]), (ids[0], ids[2]), (ids[1], ids[2])];
            pairs
                .iter()
                .map(|&(a, b)| {
                    Theorem::new(
                        TheoremKind::EqualLineSegments,
                        vec![TheoremObject::segment(a, id), TheoremObject::segment(b, id)],
                    )
                })
                .collect()
        }
        ConstructionType::LineFromPoints
        | ConstructionType::IntersectionOfLines
        | ConstructionType::Circumcircle
        | ConstructionType::CircleWithCenterThroughPoint
        | ConstructionType::IntersectionOfLineAndCircle
        | ConstructionType::IntersectionOfCircles => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Argument, Layout};

    fn pair(a: usize, b: usize) -> Argument {
        Argument::set(vec![
            Argument::Object(ObjectId(a)),
            Argument::Object(ObjectId(b)),
        ])
        .unwrap()
    }

    #[test]
    fn midpoint_definitional_theorems_are_trivial() {
        let config = Configuration::new(Layout::Triangle, &["A", "B", "C"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::Midpoint),
                vec![pair(0, 1)],
                0,
                "M".to_owned(),
            )
            .unwrap();
        let equal = Theorem::new(
            TheoremKind::EqualLineSegments,
            vec![
                TheoremObject::segment(ObjectId(0), ObjectId(3)),
                TheoremObject::segment(ObjectId(1), ObjectId(3)),
            ],
        );
        assert!(is_trivial(&config, &equal));
        let unrelated = Theorem::new(
            TheoremKind::EqualLineSegments,
            vec![
                TheoremObject::segment(ObjectId(0), ObjectId(3)),
                TheoremObject::segment(ObjectId(2), ObjectId(3)),
            ],
        );
        assert!(!is_trivial(&config, &unrelated));
    }

    #[test]
    fn projection_foot_perpendicularity_is_trivial() {
        let config = Configuration::new(Layout::ExplicitLineAndPoint, &["l", "P"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::PerpendicularProjection),
                vec![Argument::Object(ObjectId(1)), Argument::Object(ObjectId(0))],
                0,
                "F".to_owned(),
            )
            .unwrap();
        let perpendicular = Theorem::new(
            TheoremKind::PerpendicularLines,
            vec![
                TheoremObject::line_by_points(ObjectId(1), ObjectId(2)),
                TheoremObject::Line(ObjectId(0)),
            ],
        );
        assert!(is_trivial(&config, &perpendicular));
    }

    #[test]
    fn spelling_via_a_line_object_still_matches() {
        // The definitional parallel of ParallelLine(P, l) stated through an
        // equivalent LineFromPoints object.
        let config = Configuration::new(Layout::Triangle, &["A", "B", "C"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::LineFromPoints),
                vec![pair(0, 1)],
                0,
                "ab".to_owned(),
            )
            .unwrap()
            .extended(
                Construction::Predefined(ConstructionType::ParallelLine),
                vec![Argument::Object(ObjectId(2)), Argument::Object(ObjectId(3))],
                0,
                "m".to_owned(),
            )
            .unwrap();
        // Stated with the defining points instead of the line object.
        let parallel = Theorem::new(
            TheoremKind::ParallelLines,
            vec![
                TheoremObject::Line(ObjectId(4)),
                TheoremObject::line_by_points(ObjectId(0), ObjectId(1)),
            ],
        );
        assert!(is_trivial(&config, &parallel));
    }
}
