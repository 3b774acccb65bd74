//! Randomized drawings of the loose-object layouts.
//!
//! Each generator rejects degenerate samples (near-coincident points, flat
//! triangles, non-convex quadrilaterals, points falling on an explicit line)
//! so that downstream incidence checks only see intended coincidences.

use super::{AnalyticError, AnalyticObject, Line, Point};
use crate::ast::Layout;
use rand::Rng;
use std::f64::consts::TAU;

const MAX_RESAMPLES: usize = 1000;

/// Minimum pairwise distance between sampled points.
const MIN_DISTANCE: f64 = 0.2;

/// Minimum sine of any triangle angle; rejects flat triangles.
const MIN_FLATNESS: f64 = 0.1;

/// Minimum distance between an explicit line and its off-line points.
const MIN_LINE_CLEARANCE: f64 = 0.3;

/// Draws the loose objects of `layout`, in holder order.
pub fn draw<R: Rng>(layout: Layout, rng: &mut R) -> Result<Vec<AnalyticObject>, AnalyticError> {
    match layout {
        Layout::LineSegment => {
            let (a, b) = distinct_pair(rng)?;
            Ok(vec![AnalyticObject::Point(a), AnalyticObject::Point(b)])
        }
        Layout::Triangle => {
            let (a, b, c) = sample(rng, |rng| {
                let (a, b, c) = (random_point(rng), random_point(rng), random_point(rng));
                well_shaped_triangle(&a, &b, &c).then_some((a, b, c))
            })?;
            Ok(vec![
                AnalyticObject::Point(a),
                AnalyticObject::Point(b),
                AnalyticObject::Point(c),
            ])
        }
        Layout::RightTriangle => {
            // The right angle sits at the first point; the legs are sampled
            // along exactly perpendicular directions.
            let a = random_point(rng);
            let theta = rng.gen_range(0.0..TAU);
            let r1 = rng.gen_range(0.5..4.0);
            let r2 = rng.gen_range(0.5..4.0);
            let b = Point::new(a.x + r1 * theta.cos(), a.y + r1 * theta.sin());
            let c = Point::new(a.x - r2 * theta.sin(), a.y + r2 * theta.cos());
            Ok(vec![
                AnalyticObject::Point(a),
                AnalyticObject::Point(b),
                AnalyticObject::Point(c),
            ])
        }
        Layout::Quadrilateral => {
            let points = sample(rng, |rng| {
                let center = random_point(rng);
                let base = rng.gen_range(2.0..4.0);
                let mut angles: Vec<f64> = (0..4).map(|_| rng.gen_range(0.0..TAU)).collect();
                angles.sort_by(|x, y| x.partial_cmp(y).unwrap());
                let points: Vec<Point> = angles
                    .iter()
                    .map(|&t| {
                        let r = base * rng.gen_range(0.8..1.2);
                        Point::new(center.x + r * t.cos(), center.y + r * t.sin())
                    })
                    .collect();
                (is_convex(&points) && pairwise_distant(&points)).then_some(points)
            })?;
            Ok(points.into_iter().map(AnalyticObject::Point).collect())
        }
        Layout::ExplicitLineAndPoint => {
            let line = random_line(rng)?;
            let p = off_line_point(rng, &line)?;
            Ok(vec![AnalyticObject::Line(line), AnalyticObject::Point(p)])
        }
        Layout::ExplicitLineAndTwoPoints => {
            let line = random_line(rng)?;
            let p = off_line_point(rng, &line)?;
            let q = sample(rng, |rng| {
                let q = random_point(rng);
                (line.signed_distance(&q).abs() > MIN_LINE_CLEARANCE
                    && p.distance(&q) > MIN_DISTANCE)
                    .then_some(q)
            })?;
            Ok(vec![
                AnalyticObject::Line(line),
                AnalyticObject::Point(p),
                AnalyticObject::Point(q),
            ])
        }
    }
}

fn sample<R: Rng, T>(
    rng: &mut R,
    mut f: impl FnMut(&mut R) -> Option<T>,
) -> Result<T, AnalyticError> {
    for _ in 0..MAX_RESAMPLES {
        if let Some(value) = f(rng) {
            return Ok(value);
        }
    }
    Err(AnalyticError::DegenerateLayout)
}

fn random_point<R: Rng>(rng: &mut R) -> Point {
    Point::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0))
}

fn distinct_pair<R: Rng>(rng: &mut R) -> Result<(Point, Point), AnalyticError> {
    sample(rng, |rng| {
        let (a, b) = (random_point(rng), random_point(rng));
        (a.distance(&b) > MIN_DISTANCE).then_some((a, b))
    })
}

fn random_line<R: Rng>(rng: &mut R) -> Result<Line, AnalyticError> {
    let (a, b) = distinct_pair(rng)?;
    Line::through(&a, &b)
}

fn off_line_point<R: Rng>(rng: &mut R, line: &Line) -> Result<Point, AnalyticError> {
    sample(rng, |rng| {
        let p = random_point(rng);
        (line.signed_distance(&p).abs() > MIN_LINE_CLEARANCE).then_some(p)
    })
}

fn well_shaped_triangle(a: &Point, b: &Point, c: &Point) -> bool {
    let (ab, bc, ca) = (a.distance(b), b.distance(c), c.distance(a));
    if ab < MIN_DISTANCE || bc < MIN_DISTANCE || ca < MIN_DISTANCE {
        return false;
    }
    let area2 = ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs();
    // 2·area / (product of adjacent sides) is the sine of each angle.
    area2 / (ab * ca) > MIN_FLATNESS
        && area2 / (ab * bc) > MIN_FLATNESS
        && area2 / (bc * ca) > MIN_FLATNESS
}

fn pairwise_distant(points: &[Point]) -> bool {
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            if points[i].distance(&points[j]) < MIN_DISTANCE {
                return false;
            }
        }
    }
    true
}

fn is_convex(points: &[Point]) -> bool {
    let n = points.len();
    let mut sign = 0.0f64;
    for i in 0..n {
        let (p, q, r) = (&points[i], &points[(i + 1) % n], &points[(i + 2) % n]);
        let cross = (q.x - p.x) * (r.y - q.y) - (q.y - p.y) * (r.x - q.x);
        if cross.abs() < MIN_FLATNESS {
            return false;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::are_perpendicular;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(17)
    }

    #[test]
    fn triangle_layouts_are_never_flat() {
        let mut rng = rng();
        for _ in 0..50 {
            let objects = draw(Layout::Triangle, &mut rng).unwrap();
            let points: Vec<Point> = objects.iter().map(|o| *o.as_point().unwrap()).collect();
            assert!(well_shaped_triangle(&points[0], &points[1], &points[2]));
        }
    }

    #[test]
    fn right_triangle_has_right_angle_at_first_point() {
        let mut rng = rng();
        for _ in 0..50 {
            let objects = draw(Layout::RightTriangle, &mut rng).unwrap();
            let points: Vec<Point> = objects.iter().map(|o| *o.as_point().unwrap()).collect();
            let ab = Line::through(&points[0], &points[1]).unwrap();
            let ac = Line::through(&points[0], &points[2]).unwrap();
            assert!(are_perpendicular(&ab, &ac));
        }
    }

    #[test]
    fn explicit_line_points_stay_off_the_line() {
        let mut rng = rng();
        for _ in 0..50 {
            let objects = draw(Layout::ExplicitLineAndTwoPoints, &mut rng).unwrap();
            let line = objects[0].as_line().unwrap();
            for object in &objects[1..] {
                assert!(!line.lies_on(object.as_point().unwrap()));
            }
        }
    }

    #[test]
    fn quadrilateral_layouts_are_convex() {
        let mut rng = rng();
        for _ in 0..20 {
            let objects = draw(Layout::Quadrilateral, &mut rng).unwrap();
            let points: Vec<Point> = objects.iter().map(|o| *o.as_point().unwrap()).collect();
            assert!(is_convex(&points));
        }
    }
}
