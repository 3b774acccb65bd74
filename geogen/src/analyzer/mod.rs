//! The theorem finder: structural enumeration of candidate theorems and
//! their numeric verification across all pictures of a realized
//! configuration.

pub mod filters;

use crate::analytic::{
    self, rounded, rounded_eq, Circle, Line, Point,
};
use crate::ast::{
    Configuration, ObjectId, ObjectType, Theorem, TheoremKind, TheoremObject,
};
use crate::picture::PictureSet;

/// The theorems found in one realized configuration.
#[derive(Debug)]
pub struct FinderOutput {
    /// Theorems involving the configuration's last-added object (all
    /// verified theorems when the configuration has no constructed objects).
    pub new_theorems: Vec<Theorem>,
    /// Every verified fact of the equivalence-flavoured kinds (parallel,
    /// perpendicular, equal segments, equal angles, concyclic), whether or
    /// not it involves the last object. Facts not involving it already hold
    /// in the parent configuration; the transitivity filter feeds on these.
    pub facts: Vec<Theorem>,
}

/// Enumerates and verifies the theorems of a realized configuration.
pub struct TheoremFinder<'a> {
    config: &'a Configuration,
    /// Point object identifiers.
    points: Vec<ObjectId>,
    /// Line entities: explicit line objects, plus point pairs not covered by
    /// any line object in every picture.
    lines: Vec<TheoremObject>,
    /// Circle entities, assembled like the line entities.
    circles: Vec<TheoremObject>,
    /// Per picture: resolved instances parallel to the entity lists.
    resolved: Vec<ResolvedPicture>,
}

struct ResolvedPicture {
    points: Vec<Point>,
    lines: Vec<Option<Line>>,
    circles: Vec<Option<Circle>>,
}

impl<'a> TheoremFinder<'a> {
    pub fn new(config: &'a Configuration, pictures: &PictureSet) -> TheoremFinder<'a> {
        let points = config.objects_of_type(ObjectType::Point);
        let line_objects = config.objects_of_type(ObjectType::Line);
        let circle_objects = config.objects_of_type(ObjectType::Circle);

        let mut lines: Vec<TheoremObject> =
            line_objects.iter().map(|&id| TheoremObject::Line(id)).collect();
        // A pair of points only becomes a line entity of its own when no
        // explicit line object passes through both points in every picture;
        // otherwise the object already represents that line.
        for (i, &p) in points.iter().enumerate() {
            for &q in &points[i + 1..] {
                let covered = line_objects.iter().any(|&line| {
                    pictures.pictures().iter().all(|picture| {
                        let instance = picture.get(line).as_line().expect("line object");
                        let (a, b) = (
                            picture.get(p).as_point().expect("point object"),
                            picture.get(q).as_point().expect("point object"),
                        );
                        instance.lies_on(a) && instance.lies_on(b)
                    })
                });
                if !covered {
                    lines.push(TheoremObject::line_by_points(p, q));
                }
            }
        }

        let mut circles: Vec<TheoremObject> =
            circle_objects.iter().map(|&id| TheoremObject::Circle(id)).collect();
        for (i, &p) in points.iter().enumerate() {
            for (j, &q) in points.iter().enumerate().skip(i + 1) {
                for &r in &points[j + 1..] {
                    let covered = circle_objects.iter().any(|&circle| {
                        pictures.pictures().iter().all(|picture| {
                            let instance =
                                picture.get(circle).as_circle().expect("circle object");
                            [p, q, r].iter().all(|&point| {
                                instance.lies_on(picture.get(point).as_point().expect("point"))
                            })
                        })
                    });
                    if !covered {
                        circles.push(TheoremObject::circle_by_points(p, q, r));
                    }
                }
            }
        }

        let mut resolved: Vec<ResolvedPicture> = pictures
            .pictures()
            .iter()
            .map(|picture| ResolvedPicture {
                points: points
                    .iter()
                    .map(|&id| *picture.get(id).as_point().expect("point object"))
                    .collect(),
                lines: lines
                    .iter()
                    .map(|entity| match entity {
                        TheoremObject::Line(id) => {
                            Some(*picture.get(*id).as_line().expect("line object"))
                        }
                        TheoremObject::LineByPoints(p, q) => Line::through(
                            picture.get(*p).as_point().expect("point object"),
                            picture.get(*q).as_point().expect("point object"),
                        )
                        .ok(),
                        _ => unreachable!("line entity"),
                    })
                    .collect(),
                circles: circles
                    .iter()
                    .map(|entity| match entity {
                        TheoremObject::Circle(id) => {
                            Some(*picture.get(*id).as_circle().expect("circle object"))
                        }
                        TheoremObject::CircleByPoints(p, q, r) => Circle::through(
                            picture.get(*p).as_point().expect("point object"),
                            picture.get(*q).as_point().expect("point object"),
                            picture.get(*r).as_point().expect("point object"),
                        )
                        .ok()
                        .flatten(),
                        _ => unreachable!("circle entity"),
                    })
                    .collect(),
            })
            .collect();

        // Entities denoting the same instance in every picture collapse to
        // their earliest representative (explicit objects come first), so a
        // collinear triple contributes one line entity, not three.
        let keep_lines = dedup_mask(lines.len(), |i, j| {
            resolved.iter().all(|r| match (&r.lines[i], &r.lines[j]) {
                (Some(a), Some(b)) => a.rounded_eq(b),
                _ => false,
            })
        });
        let keep_circles = dedup_mask(circles.len(), |i, j| {
            resolved.iter().all(|r| match (&r.circles[i], &r.circles[j]) {
                (Some(a), Some(b)) => a.rounded_eq(b),
                _ => false,
            })
        });
        let lines = filter_mask(lines, &keep_lines);
        let circles = filter_mask(circles, &keep_circles);
        for r in &mut resolved {
            r.lines = filter_mask(std::mem::take(&mut r.lines), &keep_lines);
            r.circles = filter_mask(std::mem::take(&mut r.circles), &keep_circles);
        }

        TheoremFinder { config, points, lines, circles, resolved }
    }

    /// Runs the full candidate enumeration, keeping only theorems that
    /// involve the configuration's last-added object. A candidate is
    /// accepted iff its predicate holds, within rounding, in every picture.
    pub fn find(&self) -> FinderOutput {
        self.run(self.config.last_added())
    }

    /// Like [`find`](Self::find), but keeps every verified theorem. Used for
    /// the initial configuration, whose theorems are all reported.
    pub fn find_all(&self) -> FinderOutput {
        self.run(None)
    }

    fn run(&self, last: Option<ObjectId>) -> FinderOutput {
        let mut facts = Vec::new();
        let mut new_theorems = Vec::new();

        let mut push = |theorem: Theorem, is_fact: bool| {
            let involves_last = match last {
                Some(id) => theorem.mentions(id),
                None => true,
            };
            if involves_last {
                new_theorems.push(theorem.clone());
            }
            if is_fact {
                facts.push(theorem);
            }
        };

        self.find_collinear(last, &mut |t| push(t, false));
        self.find_concyclic(&mut |t| push(t, true));
        self.find_line_pairs(&mut |t| push(t, true));
        self.find_concurrent(last, &mut |t| push(t, false));
        self.find_equal_segments(&mut |t| push(t, true));
        self.find_equal_angles(&mut |t| push(t, true));
        self.find_tangent_circles(last, &mut |t| push(t, false));
        self.find_line_circle_tangencies(last, &mut |t| push(t, false));

        FinderOutput { new_theorems, facts }
    }

    fn involves(entity: &TheoremObject, last: Option<ObjectId>) -> bool {
        match last {
            Some(id) => entity.mentioned_objects().contains(&id),
            None => true,
        }
    }

    fn find_collinear(&self, last: Option<ObjectId>, emit: &mut impl FnMut(Theorem)) {
        let n = self.points.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    if last.is_some()
                        && ![i, j, k].iter().any(|&x| Some(self.points[x]) == last)
                    {
                        continue;
                    }
                    let holds = self.resolved.iter().all(|r| {
                        analytic::are_collinear(&r.points[i], &r.points[j], &r.points[k])
                    });
                    if holds {
                        emit(Theorem::new(
                            TheoremKind::CollinearPoints,
                            vec![
                                TheoremObject::Point(self.points[i]),
                                TheoremObject::Point(self.points[j]),
                                TheoremObject::Point(self.points[k]),
                            ],
                        ));
                    }
                }
            }
        }
    }

    fn find_concyclic(&self, emit: &mut impl FnMut(Theorem)) {
        let n = self.points.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    for l in k + 1..n {
                        let holds = self.resolved.iter().all(|r| {
                            analytic::are_concyclic(
                                &r.points[i],
                                &r.points[j],
                                &r.points[k],
                                &r.points[l],
                            )
                        });
                        if holds {
                            emit(Theorem::new(
                                TheoremKind::ConcyclicPoints,
                                vec![
                                    TheoremObject::Point(self.points[i]),
                                    TheoremObject::Point(self.points[j]),
                                    TheoremObject::Point(self.points[k]),
                                    TheoremObject::Point(self.points[l]),
                                ],
                            ));
                        }
                    }
                }
            }
        }
    }

    /// Parallel and perpendicular candidates over all pairs of line
    /// entities. A pair resolving to the same line in some picture is never
    /// parallel in the meaningful sense and is skipped.
    fn find_line_pairs(&self, emit: &mut impl FnMut(Theorem)) {
        let n = self.lines.len();
        for i in 0..n {
            for j in i + 1..n {
                let mut parallel = true;
                let mut perpendicular = true;
                let mut distinct = true;
                for r in &self.resolved {
                    let (l, m) = match (&r.lines[i], &r.lines[j]) {
                        (Some(l), Some(m)) => (l, m),
                        _ => {
                            parallel = false;
                            perpendicular = false;
                            break;
                        }
                    };
                    if l.rounded_eq(m) {
                        distinct = false;
                        break;
                    }
                    parallel &= analytic::are_parallel(l, m);
                    perpendicular &= analytic::are_perpendicular(l, m);
                    if !parallel && !perpendicular {
                        break;
                    }
                }
                if !distinct {
                    continue;
                }
                if parallel {
                    emit(Theorem::new(
                        TheoremKind::ParallelLines,
                        vec![self.lines[i].clone(), self.lines[j].clone()],
                    ));
                } else if perpendicular {
                    emit(Theorem::new(
                        TheoremKind::PerpendicularLines,
                        vec![self.lines[i].clone(), self.lines[j].clone()],
                    ));
                }
            }
        }
    }

    fn find_concurrent(&self, last: Option<ObjectId>, emit: &mut impl FnMut(Theorem)) {
        let n = self.lines.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    if last.is_some()
                        && ![i, j, k]
                            .iter()
                            .any(|&x| Self::involves(&self.lines[x], last))
                    {
                        continue;
                    }
                    let holds = self.resolved.iter().all(|r| {
                        match (&r.lines[i], &r.lines[j], &r.lines[k]) {
                            (Some(l), Some(m), Some(n)) => analytic::are_concurrent(l, m, n),
                            _ => false,
                        }
                    });
                    if holds {
                        emit(Theorem::new(
                            TheoremKind::ConcurrentLines,
                            vec![
                                self.lines[i].clone(),
                                self.lines[j].clone(),
                                self.lines[k].clone(),
                            ],
                        ));
                    }
                }
            }
        }
    }

    fn find_equal_segments(&self, emit: &mut impl FnMut(Theorem)) {
        let n = self.points.len();
        let mut segments = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                segments.push((i, j));
            }
        }
        for (a, &(i, j)) in segments.iter().enumerate() {
            for &(k, l) in &segments[a + 1..] {
                let holds = self.resolved.iter().all(|r| {
                    rounded_eq(
                        r.points[i].distance(&r.points[j]),
                        r.points[k].distance(&r.points[l]),
                    )
                });
                if holds {
                    emit(Theorem::new(
                        TheoremKind::EqualLineSegments,
                        vec![
                            TheoremObject::segment(self.points[i], self.points[j]),
                            TheoremObject::segment(self.points[k], self.points[l]),
                        ],
                    ));
                }
            }
        }
    }

    /// Equal-angle candidates over pairs of angles, where an angle is an
    /// unordered pair of line entities. Zero angles are parallelism in
    /// disguise and are skipped.
    fn find_equal_angles(&self, emit: &mut impl FnMut(Theorem)) {
        let n = self.lines.len();
        let mut angles = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                angles.push((i, j));
            }
        }
        for (a, &(i, j)) in angles.iter().enumerate() {
            for &(k, l) in &angles[a + 1..] {
                let holds = self.resolved.iter().all(|r| {
                    match (&r.lines[i], &r.lines[j], &r.lines[k], &r.lines[l]) {
                        (Some(l1), Some(l2), Some(l3), Some(l4)) => {
                            let first = analytic::angle_between(l1, l2);
                            let second = analytic::angle_between(l3, l4);
                            rounded(first) != 0.0
                                && rounded(second) != 0.0
                                && rounded_eq(first, second)
                        }
                        _ => false,
                    }
                });
                if holds {
                    emit(Theorem::new(
                        TheoremKind::EqualAngles,
                        vec![
                            TheoremObject::angle(
                                self.lines[i].clone(),
                                self.lines[j].clone(),
                            ),
                            TheoremObject::angle(
                                self.lines[k].clone(),
                                self.lines[l].clone(),
                            ),
                        ],
                    ));
                }
            }
        }
    }

    fn find_tangent_circles(&self, last: Option<ObjectId>, emit: &mut impl FnMut(Theorem)) {
        let n = self.circles.len();
        for i in 0..n {
            for j in i + 1..n {
                if last.is_some()
                    && ![i, j]
                        .iter()
                        .any(|&x| Self::involves(&self.circles[x], last))
                {
                    continue;
                }
                let holds = self.resolved.iter().all(|r| {
                    match (&r.circles[i], &r.circles[j]) {
                        (Some(c1), Some(c2)) => analytic::are_tangent_circles(c1, c2),
                        _ => false,
                    }
                });
                if holds {
                    emit(Theorem::new(
                        TheoremKind::TangentCircles,
                        vec![self.circles[i].clone(), self.circles[j].clone()],
                    ));
                }
            }
        }
    }

    fn find_line_circle_tangencies(
        &self,
        last: Option<ObjectId>,
        emit: &mut impl FnMut(Theorem),
    ) {
        for (i, line) in self.lines.iter().enumerate() {
            for (j, circle) in self.circles.iter().enumerate() {
                if last.is_some()
                    && !Self::involves(line, last)
                    && !Self::involves(circle, last)
                {
                    continue;
                }
                let holds = self.resolved.iter().all(|r| {
                    match (&r.lines[i], &r.circles[j]) {
                        (Some(l), Some(c)) => analytic::is_line_tangent_to_circle(l, c),
                        _ => false,
                    }
                });
                if holds {
                    emit(Theorem::new(
                        TheoremKind::LineTangentToCircle,
                        vec![line.clone(), circle.clone()],
                    ));
                }
            }
        }
    }
}

/// Marks, for each index, whether no earlier kept index is equivalent to it.
fn dedup_mask(len: usize, equivalent: impl Fn(usize, usize) -> bool) -> Vec<bool> {
    let mut keep = vec![true; len];
    for i in 0..len {
        for j in 0..i {
            if keep[j] && equivalent(i, j) {
                keep[i] = false;
                break;
            }
        }
    }
    keep
}

fn filter_mask<T>(items: Vec<T>, mask: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(mask)
        .filter_map(|(item, &keep)| keep.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Argument, Construction, ConstructionType, Layout};
    use crate::picture::{realize, Realization, RealizeOptions};
    use rand::{rngs::StdRng, SeedableRng};

    fn realized(config: &Configuration) -> PictureSet {
        let mut rng = StdRng::seed_from_u64(7);
        match realize(config, &RealizeOptions::default(), &mut rng, || false) {
            Realization::Constructed(pictures) => pictures,
            other => panic!("expected a realization, got {:?}", other),
        }
    }

    fn pair(a: usize, b: usize) -> Argument {
        Argument::set(vec![
            Argument::Object(ObjectId(a)),
            Argument::Object(ObjectId(b)),
        ])
        .unwrap()
    }

    #[test]
    fn midpoint_yields_collinearity_and_equal_segments() {
        let config = Configuration::new(Layout::Triangle, &["A", "B", "C"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::Midpoint),
                vec![pair(0, 1)],
                0,
                "M".to_owned(),
            )
            .unwrap();
        let pictures = realized(&config);
        let output = TheoremFinder::new(&config, &pictures).find();
        let collinear = Theorem::new(
            TheoremKind::CollinearPoints,
            vec![
                TheoremObject::Point(ObjectId(0)),
                TheoremObject::Point(ObjectId(1)),
                TheoremObject::Point(ObjectId(3)),
            ],
        );
        let equal = Theorem::new(
            TheoremKind::EqualLineSegments,
            vec![
                TheoremObject::segment(ObjectId(0), ObjectId(3)),
                TheoremObject::segment(ObjectId(1), ObjectId(3)),
            ],
        );
        assert!(output.new_theorems.contains(&collinear));
        assert!(output.new_theorems.contains(&equal));
    }

    #[test]
    fn two_midpoints_yield_the_midsegment_parallel() {
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
        let pictures = realized(&config);
        let output = TheoremFinder::new(&config, &pictures).find();
        let parallel = Theorem::new(
            TheoremKind::ParallelLines,
            vec![
                TheoremObject::line_by_points(ObjectId(3), ObjectId(4)),
                TheoremObject::line_by_points(ObjectId(1), ObjectId(2)),
            ],
        );
        assert!(output.new_theorems.contains(&parallel));
    }

    #[test]
    fn theorems_not_involving_the_last_object_are_facts_only() {
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
        let pictures = realized(&config);
        let output = TheoremFinder::new(&config, &pictures).find();
        let old_equality = Theorem::new(
            TheoremKind::EqualLineSegments,
            vec![
                TheoremObject::segment(ObjectId(0), ObjectId(3)),
                TheoremObject::segment(ObjectId(1), ObjectId(3)),
            ],
        );
        assert!(!output.new_theorems.contains(&old_equality));
        assert!(output.facts.contains(&old_equality));
    }
}
