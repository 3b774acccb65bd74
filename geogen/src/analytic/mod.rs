//! The analytic kernel: points, lines and circles over rounded `f64`
//! coordinates, plus the intersection routines and incidence predicates used
//! to verify theorems numerically.

pub mod layout;

use thiserror::Error;

/// Number of decimal places kept when comparing coordinates.
pub const ROUNDING_DECIMALS: i32 = 9;

const SCALE: f64 = 1e9;

/// Rounds a coordinate to [`ROUNDING_DECIMALS`] decimal places.
pub fn rounded(x: f64) -> f64 {
    (x * SCALE).round() / SCALE
}

/// Compares two coordinates after rounding both.
pub fn rounded_eq(a: f64, b: f64) -> bool {
    rounded(a) == rounded(b)
}

/// The error type for degenerate analytic operations. This is distinct from
/// "no solution": a line disjoint from a circle yields an empty intersection,
/// while two coincident lines yield this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnalyticError {
    /// Two input objects coincide within rounding, making the operation
    /// underdetermined.
    #[error("input objects coincide within rounding")]
    CoincidentInputs,

    /// A layout generator failed to produce a non-degenerate drawing within
    /// its resampling budget.
    #[error("layout sampling failed to produce a non-degenerate drawing")]
    DegenerateLayout,
}

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn rounded_eq(&self, other: &Point) -> bool {
        rounded_eq(self.x, other.x) && rounded_eq(self.y, other.y)
    }

    /// A total order on rounded coordinates, used to label the outputs of
    /// multi-output constructions consistently within a picture.
    pub fn rounded_cmp(&self, other: &Point) -> std::cmp::Ordering {
        let key = |p: &Point| (rounded(p.x), rounded(p.y));
        key(self).partial_cmp(&key(other)).unwrap_or(std::cmp::Ordering::Equal)
    }
}

pub fn midpoint(a: &Point, b: &Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// A line `ax + by + c = 0`, kept normalized so that `(a, b)` is a unit
/// vector whose first non-zero component (after rounding) is positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    fn normalized(a: f64, b: f64, c: f64) -> Line {
        let norm = (a * a + b * b).sqrt();
        let (mut a, mut b, mut c) = (a / norm, b / norm, c / norm);
        let ra = rounded(a);
        if ra < 0.0 || (ra == 0.0 && rounded(b) < 0.0) {
            a = -a;
            b = -b;
            c = -c;
        }
        Line { a, b, c }
    }

    /// The line through two distinct points.
    pub fn through(p: &Point, q: &Point) -> Result<Line, AnalyticError> {
        if p.rounded_eq(q) {
            return Err(AnalyticError::CoincidentInputs);
        }
        let (dx, dy) = (q.x - p.x, q.y - p.y);
        Ok(Line::normalized(dy, -dx, -(dy * p.x - dx * p.y)))
    }

    /// Signed distance from a point, in units of the normal vector.
    pub fn signed_distance(&self, p: &Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    pub fn lies_on(&self, p: &Point) -> bool {
        rounded(self.signed_distance(p)) == 0.0
    }

    pub fn rounded_eq(&self, other: &Line) -> bool {
        rounded_eq(self.a, other.a)
            && rounded_eq(self.b, other.b)
            && rounded_eq(self.c, other.c)
    }
}

/// A circle given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Circle { center, radius }
    }

    /// The circle through three points. Returns `Ok(None)` when the points
    /// are collinear, and an error when two of them coincide.
    pub fn through(a: &Point, b: &Point, c: &Point) -> Result<Option<Circle>, AnalyticError> {
        Ok(circumcenter(a, b, c)?.map(|center| Circle::new(center, center.distance(a))))
    }

    pub fn lies_on(&self, p: &Point) -> bool {
        rounded_eq(self.center.distance(p), self.radius)
    }

    pub fn rounded_eq(&self, other: &Circle) -> bool {
        self.center.rounded_eq(&other.center) && rounded_eq(self.radius, other.radius)
    }
}

/// Intersects two lines. `Ok(None)` means the lines are parallel; coincident
/// lines are an analytic failure.
pub fn intersect_lines(l: &Line, m: &Line) -> Result<Option<Point>, AnalyticError> {
    let det = l.a * m.b - m.a * l.b;
    if rounded(det) == 0.0 {
        if l.rounded_eq(m) {
            return Err(AnalyticError::CoincidentInputs);
        }
        return Ok(None);
    }
    let x = (l.b * m.c - m.b * l.c) / det;
    let y = (m.a * l.c - l.a * m.c) / det;
    Ok(Some(Point::new(x, y)))
}

/// Intersects a line and a circle, returning 0, 1 or 2 points ordered by
/// rounded coordinates.
pub fn intersect_line_circle(l: &Line, c: &Circle) -> Vec<Point> {
    let d = l.signed_distance(&c.center);
    let foot = Point::new(c.center.x - d * l.a, c.center.y - d * l.b);
    let h2 = c.radius * c.radius - d * d;
    if rounded(h2) < 0.0 {
        return vec![];
    }
    if rounded(h2) == 0.0 {
        return vec![foot];
    }
    let h = h2.sqrt();
    // The direction vector of the line is the normal rotated a quarter turn.
    let (dx, dy) = (-l.b, l.a);
    let mut points = vec![
        Point::new(foot.x + h * dx, foot.y + h * dy),
        Point::new(foot.x - h * dx, foot.y - h * dy),
    ];
    points.sort_by(|p, q| p.rounded_cmp(q));
    points
}

/// Intersects two circles, returning 0, 1 or 2 points ordered by rounded
/// coordinates. Coincident circles are an analytic failure.
pub fn intersect_circles(c1: &Circle, c2: &Circle) -> Result<Vec<Point>, AnalyticError> {
    if c1.rounded_eq(c2) {
        return Err(AnalyticError::CoincidentInputs);
    }
    let d = c1.center.distance(&c2.center);
    if rounded(d) == 0.0 {
        // Concentric circles with different radii never meet.
        return Ok(vec![]);
    }
    let a = (d * d - c2.radius * c2.radius + c1.radius * c1.radius) / (2.0 * d);
    let h2 = c1.radius * c1.radius - a * a;
    if rounded(h2) < 0.0 {
        return Ok(vec![]);
    }
    let (ux, uy) = ((c2.center.x - c1.center.x) / d, (c2.center.y - c1.center.y) / d);
    let base = Point::new(c1.center.x + a * ux, c1.center.y + a * uy);
    if rounded(h2) == 0.0 {
        return Ok(vec![base]);
    }
    let h = h2.sqrt();
    let mut points = vec![
        Point::new(base.x - h * uy, base.y + h * ux),
        Point::new(base.x + h * uy, base.y - h * ux),
    ];
    points.sort_by(|p, q| p.rounded_cmp(q));
    Ok(points)
}

/// The perpendicular to `l` through `p`.
pub fn perpendicular_through(p: &Point, l: &Line) -> Line {
    Line::normalized(l.b, -l.a, -(l.b * p.x - l.a * p.y))
}

/// The parallel to `l` through `p`.
pub fn parallel_through(p: &Point, l: &Line) -> Line {
    Line::normalized(l.a, l.b, -(l.a * p.x + l.b * p.y))
}

/// The orthogonal projection of `p` onto `l`.
pub fn projection(p: &Point, l: &Line) -> Point {
    let d = l.signed_distance(p);
    Point::new(p.x - d * l.a, p.y - d * l.b)
}

/// The perpendicular bisector of the segment `ab`.
pub fn perpendicular_bisector(a: &Point, b: &Point) -> Result<Line, AnalyticError> {
    if a.rounded_eq(b) {
        return Err(AnalyticError::CoincidentInputs);
    }
    let mid = midpoint(a, b);
    let (nx, ny) = (b.x - a.x, b.y - a.y);
    Ok(Line::normalized(nx, ny, -(nx * mid.x + ny * mid.y)))
}

/// The circumcenter of a triangle; `Ok(None)` when the points are collinear.
pub fn circumcenter(a: &Point, b: &Point, c: &Point) -> Result<Option<Point>, AnalyticError> {
    let ab = perpendicular_bisector(a, b)?;
    let ac = perpendicular_bisector(a, c)?;
    if b.rounded_eq(c) {
        return Err(AnalyticError::CoincidentInputs);
    }
    intersect_lines(&ab, &ac)
}

/// The internal bisector of the angle at `a` in the triangle `bac`, i.e. the
/// bisector ray of ∠bac carried by its line. `Ok(None)` when the two rays are
/// collinear, so that no internal bisector exists.
pub fn internal_angle_bisector(
    a: &Point,
    b: &Point,
    c: &Point,
) -> Result<Option<Line>, AnalyticError> {
    if a.rounded_eq(b) || a.rounded_eq(c) {
        return Err(AnalyticError::CoincidentInputs);
    }
    let db = a.distance(b);
    let dc = a.distance(c);
    let (ux, uy) = ((b.x - a.x) / db, (b.y - a.y) / db);
    let (vx, vy) = ((c.x - a.x) / dc, (c.y - a.y) / dc);
    if rounded(ux * vy - uy * vx) == 0.0 {
        return Ok(None);
    }
    let (wx, wy) = (ux + vx, uy + vy);
    Ok(Some(Line::normalized(wy, -wx, -(wy * a.x - wx * a.y))))
}

/// Extends the segment `ab` past both endpoints by `shift` times its length.
/// Used by the external drawer to leave a margin around drawn segments.
pub fn shift_segment(a: &Point, b: &Point, shift: f64) -> (Point, Point) {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    (
        Point::new(a.x - shift * dx, a.y - shift * dy),
        Point::new(b.x + shift * dx, b.y + shift * dy),
    )
}

/// The angle between two lines, in `[0, π/2]`.
pub fn angle_between(l: &Line, m: &Line) -> f64 {
    let dot = (l.a * m.a + l.b * m.b).abs();
    let cross = (l.a * m.b - l.b * m.a).abs();
    cross.atan2(dot)
}

pub fn are_collinear(a: &Point, b: &Point, c: &Point) -> bool {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    rounded(cross) == 0.0
}

pub fn are_parallel(l: &Line, m: &Line) -> bool {
    rounded(l.a * m.b - l.b * m.a) == 0.0
}

pub fn are_perpendicular(l: &Line, m: &Line) -> bool {
    rounded(l.a * m.a + l.b * m.b) == 0.0
}

pub fn are_concurrent(l: &Line, m: &Line, n: &Line) -> bool {
    match intersect_lines(l, m) {
        Ok(Some(p)) => n.lies_on(&p),
        _ => false,
    }
}

pub fn are_concyclic(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    match Circle::through(a, b, c) {
        Ok(Some(circle)) => circle.lies_on(d),
        _ => false,
    }
}

pub fn are_tangent_circles(c1: &Circle, c2: &Circle) -> bool {
    if c1.rounded_eq(c2) {
        return false;
    }
    let d = c1.center.distance(&c2.center);
    rounded_eq(d, c1.radius + c2.radius) || rounded_eq(d, (c1.radius - c2.radius).abs())
}

pub fn is_line_tangent_to_circle(l: &Line, c: &Circle) -> bool {
    rounded_eq(l.signed_distance(&c.center).abs(), c.radius)
}

/// One numeric realization of a configuration object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalyticObject {
    Point(Point),
    Line(Line),
    Circle(Circle),
}

impl AnalyticObject {
    /// Rounded equality between instances of the same kind; instances of
    /// different kinds never coincide.
    pub fn rounded_eq(&self, other: &AnalyticObject) -> bool {
        match (self, other) {
            (AnalyticObject::Point(a), AnalyticObject::Point(b)) => a.rounded_eq(b),
            (AnalyticObject::Line(a), AnalyticObject::Line(b)) => a.rounded_eq(b),
            (AnalyticObject::Circle(a), AnalyticObject::Circle(b)) => a.rounded_eq(b),
            _ => false,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            AnalyticObject::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line> {
        match self {
            AnalyticObject::Line(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            AnalyticObject::Circle(c) => Some(c),
            _ => None,
        }
    }
}
