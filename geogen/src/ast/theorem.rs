//! Theorem statements and their structural normalization.

use super::{Configuration, ObjectId};
use std::fmt;

/// The kinds of theorems the analyzer can discover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TheoremKind {
    EqualLineSegments,
    CollinearPoints,
    ConcurrentLines,
    ConcyclicPoints,
    ParallelLines,
    PerpendicularLines,
    TangentCircles,
    LineTangentToCircle,
    EqualAngles,
}

impl TheoremKind {
    pub const ALL: [TheoremKind; 9] = [
        TheoremKind::EqualLineSegments,
        TheoremKind::CollinearPoints,
        TheoremKind::ConcurrentLines,
        TheoremKind::ConcyclicPoints,
        TheoremKind::ParallelLines,
        TheoremKind::PerpendicularLines,
        TheoremKind::TangentCircles,
        TheoremKind::LineTangentToCircle,
        TheoremKind::EqualAngles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TheoremKind::EqualLineSegments => "EqualLineSegments",
            TheoremKind::CollinearPoints => "CollinearPoints",
            TheoremKind::ConcurrentLines => "ConcurrentLines",
            TheoremKind::ConcyclicPoints => "ConcyclicPoints",
            TheoremKind::ParallelLines => "ParallelLines",
            TheoremKind::PerpendicularLines => "PerpendicularLines",
            TheoremKind::TangentCircles => "TangentCircles",
            TheoremKind::LineTangentToCircle => "LineTangentToCircle",
            TheoremKind::EqualAngles => "EqualAngles",
        }
    }

    pub fn from_name(name: &str) -> Option<TheoremKind> {
        TheoremKind::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for TheoremKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A geometric entity inside a theorem statement. Lines and circles may be
/// given either by an object of the configuration or by their defining
/// points; segments and angles are always given structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TheoremObject {
    Point(ObjectId),
    Line(ObjectId),
    LineByPoints(ObjectId, ObjectId),
    Circle(ObjectId),
    CircleByPoints(ObjectId, ObjectId, ObjectId),
    Segment(ObjectId, ObjectId),
    Angle(Box<TheoremObject>, Box<TheoremObject>),
}

impl TheoremObject {
    /// A line through two points, with the points in canonical order.
    pub fn line_by_points(a: ObjectId, b: ObjectId) -> TheoremObject {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        TheoremObject::LineByPoints(a, b)
    }

    /// A circle through three points, with the points in canonical order.
    pub fn circle_by_points(a: ObjectId, b: ObjectId, c: ObjectId) -> TheoremObject {
        let mut ids = [a, b, c];
        ids.sort();
        TheoremObject::CircleByPoints(ids[0], ids[1], ids[2])
    }

    /// A line segment between two points, with the points in canonical order.
    pub fn segment(a: ObjectId, b: ObjectId) -> TheoremObject {
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        TheoremObject::Segment(a, b)
    }

    /// An angle between two lines, with the lines in canonical order.
    pub fn angle(l1: TheoremObject, l2: TheoremObject) -> TheoremObject {
        let (l1, l2) = if l1 <= l2 { (l1, l2) } else { (l2, l1) };
        TheoremObject::Angle(Box::new(l1), Box::new(l2))
    }

    /// All object identifiers this entity mentions.
    pub fn mentioned_objects(&self) -> Vec<ObjectId> {
        match self {
            TheoremObject::Point(id) | TheoremObject::Line(id) | TheoremObject::Circle(id) => {
                vec![*id]
            }
            TheoremObject::LineByPoints(a, b) | TheoremObject::Segment(a, b) => vec![*a, *b],
            TheoremObject::CircleByPoints(a, b, c) => vec![*a, *b, *c],
            TheoremObject::Angle(l1, l2) => {
                let mut ids = l1.mentioned_objects();
                ids.extend(l2.mentioned_objects());
                ids
            }
        }
    }

    /// Applies an identifier remapping, restoring canonical component order.
    pub fn remapped(&self, map: &impl Fn(ObjectId) -> ObjectId) -> TheoremObject {
        match self {
            TheoremObject::Point(id) => TheoremObject::Point(map(*id)),
            TheoremObject::Line(id) => TheoremObject::Line(map(*id)),
            TheoremObject::Circle(id) => TheoremObject::Circle(map(*id)),
            TheoremObject::LineByPoints(a, b) => TheoremObject::line_by_points(map(*a), map(*b)),
            TheoremObject::CircleByPoints(a, b, c) => {
                TheoremObject::circle_by_points(map(*a), map(*b), map(*c))
            }
            TheoremObject::Segment(a, b) => TheoremObject::segment(map(*a), map(*b)),
            TheoremObject::Angle(l1, l2) => {
                TheoremObject::angle(l1.remapped(map), l2.remapped(map))
            }
        }
    }
}

/// A theorem: a kind together with an unordered set of theorem objects. The
/// objects are stored sorted, so structural equivalence up to the symmetry of
/// each theorem type is plain equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Theorem {
    pub kind: TheoremKind,
    pub objects: Vec<TheoremObject>,
}

impl Theorem {
    pub fn new(kind: TheoremKind, mut objects: Vec<TheoremObject>) -> Theorem {
        objects.sort();
        Theorem { kind, objects }
    }

    /// All object identifiers mentioned anywhere in the statement.
    pub fn mentioned_objects(&self) -> Vec<ObjectId> {
        let mut ids: Vec<ObjectId> = self
            .objects
            .iter()
            .flat_map(|o| o.mentioned_objects())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Whether any theorem object mentions the given configuration object.
    pub fn mentions(&self, id: ObjectId) -> bool {
        self.objects
            .iter()
            .any(|o| o.mentioned_objects().contains(&id))
    }

    pub fn remapped(&self, map: &impl Fn(ObjectId) -> ObjectId) -> Theorem {
        Theorem::new(self.kind, self.objects.iter().map(|o| o.remapped(map)).collect())
    }

    /// A displayable form using the configuration's object names.
    pub fn display<'a>(&'a self, config: &'a Configuration) -> TheoremDisplay<'a> {
        TheoremDisplay { theorem: self, config }
    }
}

/// Formats a theorem with object names, e.g.
/// `ParallelLines([x4, x5], [B, C])`.
pub struct TheoremDisplay<'a> {
    theorem: &'a Theorem,
    config: &'a Configuration,
}

impl TheoremDisplay<'_> {
    fn write_object(&self, f: &mut fmt::Formatter, object: &TheoremObject) -> fmt::Result {
        let name = |id: &ObjectId| self.config.name(*id);
        match object {
            TheoremObject::Point(id) | TheoremObject::Line(id) | TheoremObject::Circle(id) => {
                write!(f, "{}", name(id))
            }
            TheoremObject::LineByPoints(a, b) => write!(f, "[{}, {}]", name(a), name(b)),
            TheoremObject::CircleByPoints(a, b, c) => {
                write!(f, "({}, {}, {})", name(a), name(b), name(c))
            }
            TheoremObject::Segment(a, b) => write!(f, "{}-{}", name(a), name(b)),
            TheoremObject::Angle(l1, l2) => {
                write!(f, "∠(")?;
                self.write_object(f, l1)?;
                write!(f, ", ")?;
                self.write_object(f, l2)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for TheoremDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.theorem.kind)?;
        for (i, object) in self.theorem.objects.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            self.write_object(f, object)?;
        }
        write!(f, ")")
    }
}
