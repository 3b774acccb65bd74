//! Constructions and their signatures.
//!
//! A construction is either one of the predefined operations (a closed set,
//! kept in a registry table initialized once) or a composed construction: a
//! sub-configuration whose last constructed object is the output, usable as a
//! macro such as "centroid".

use super::{Argument, Configuration, ObjectId, ObjectType};
use std::fmt;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// The error type for argument/signature mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("expected {expected} arguments, got {got}")]
    WrongNumberOfArgs { expected: usize, got: usize },

    #[error("expected a {expected}, got a {got}")]
    WrongObjectType { expected: ObjectType, got: ObjectType },

    #[error("expected a set of {expected} elements, got {got}")]
    WrongSetSize { expected: usize, got: usize },

    #[error("expected an object argument, got a set")]
    UnexpectedSet,

    #[error("expected a set argument, got a single object")]
    UnexpectedObject,

    #[error("set argument contains a duplicated element")]
    DuplicateInSet,

    #[error("argument references an object that is not yet constructed")]
    ForwardReference,

    #[error("construction has {count} outputs, got index {got}")]
    BadOutputIndex { count: usize, got: usize },

    #[error("a composed construction needs at least one constructed object")]
    EmptyComposition,
}

/// A parameter of a construction signature: a typed object slot, or an
/// unordered set of `count` values each matching the inner parameter.
/// Nesting is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Object(ObjectType),
    Set { inner: Box<Parameter>, count: usize },
}

impl Parameter {
    pub fn object(ty: ObjectType) -> Parameter {
        Parameter::Object(ty)
    }

    pub fn set(inner: Parameter, count: usize) -> Parameter {
        Parameter::Set { inner: Box::new(inner), count }
    }

    /// Adds to `counts` (indexed by [`ObjectType::index`]) the number of
    /// objects of each type this parameter consumes.
    pub fn add_object_counts(&self, counts: &mut [usize; 3]) {
        match self {
            Parameter::Object(ty) => counts[ty.index()] += 1,
            Parameter::Set { inner, count } => {
                let mut inner_counts = [0; 3];
                inner.add_object_counts(&mut inner_counts);
                for (total, inner_count) in counts.iter_mut().zip(inner_counts) {
                    *total += count * inner_count;
                }
            }
        }
    }
}

/// The number of distinct objects of each type a signature consumes, indexed
/// by [`ObjectType::index`].
pub fn signature_object_counts(signature: &[Parameter]) -> [usize; 3] {
    let mut counts = [0; 3];
    for param in signature {
        param.add_object_counts(&mut counts);
    }
    counts
}

/// Checks `args` against `signature` and returns the normalized argument
/// tuple (sets sorted and duplicate-free).
pub fn normalize_arguments(
    signature: &[Parameter],
    args: Vec<Argument>,
    ty_of: &impl Fn(ObjectId) -> ObjectType,
) -> Result<Vec<Argument>, SignatureError> {
    if signature.len() != args.len() {
        return Err(SignatureError::WrongNumberOfArgs {
            expected: signature.len(),
            got: args.len(),
        });
    }
    signature
        .iter()
        .zip(args)
        .map(|(param, arg)| normalize_argument(param, arg, ty_of))
        .collect()
}

fn normalize_argument(
    param: &Parameter,
    arg: Argument,
    ty_of: &impl Fn(ObjectId) -> ObjectType,
) -> Result<Argument, SignatureError> {
    match (param, arg) {
        (Parameter::Object(expected), Argument::Object(id)) => {
            let got = ty_of(id);
            if got != *expected {
                return Err(SignatureError::WrongObjectType { expected: *expected, got });
            }
            Ok(Argument::Object(id))
        }
        (Parameter::Object(_), Argument::Set(_)) => Err(SignatureError::UnexpectedSet),
        (Parameter::Set { .. }, Argument::Object(_)) => Err(SignatureError::UnexpectedObject),
        (Parameter::Set { inner, count }, Argument::Set(elements)) => {
            if elements.len() != *count {
                return Err(SignatureError::WrongSetSize {
                    expected: *count,
                    got: elements.len(),
                });
            }
            let elements = elements
                .into_iter()
                .map(|e| normalize_argument(inner, e, ty_of))
                .collect::<Result<Vec<_>, _>>()?;
            Argument::set(elements)
        }
    }
}

/// The predefined constructions. This set is closed; new operations enter
/// the system as composed constructions instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructionType {
    Midpoint,
    LineFromPoints,
    IntersectionOfLines,
    PerpendicularLine,
    ParallelLine,
    PerpendicularProjection,
    PerpendicularBisector,
    InternalAngleBisector,
    Circumcircle,
    Circumcenter,
    CircleWithCenterThroughPoint,
    IntersectionOfLineAndCircle,
    IntersectionOfCircles,
}

struct ConstructionInfo {
    signature: Vec<Parameter>,
    output_type: ObjectType,
    output_count: usize,
}

fn registry() -> &'static [ConstructionInfo] {
    use ObjectType::{Circle, Line, Point};
    static REGISTRY: OnceLock<Vec<ConstructionInfo>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let info = |signature, output_type, output_count| ConstructionInfo {
            signature,
            output_type,
            output_count,
        };
        let point_pair = || Parameter::set(Parameter::object(Point), 2);
        let point_triple = || Parameter::set(Parameter::object(Point), 3);
        vec![
            // Midpoint
            info(vec![point_pair()], Point, 1),
            // LineFromPoints
            info(vec![point_pair()], Line, 1),
            // IntersectionOfLines
            info(vec![Parameter::set(Parameter::object(Line), 2)], Point, 1),
            // PerpendicularLine
            info(vec![Parameter::object(Point), Parameter::object(Line)], Line, 1),
            // ParallelLine
            info(vec![Parameter::object(Point), Parameter::object(Line)], Line, 1),
            // PerpendicularProjection
            info(vec![Parameter::object(Point), Parameter::object(Line)], Point, 1),
            // PerpendicularBisector
            info(vec![point_pair()], Line, 1),
            // InternalAngleBisector
            info(vec![Parameter::object(Point), point_pair()], Line, 1),
            // Circumcircle
            info(vec![point_triple()], Circle, 1),
            // Circumcenter
            info(vec![point_triple()], Point, 1),
            // CircleWithCenterThroughPoint
            info(vec![Parameter::object(Point), Parameter::object(Point)], Circle, 1),
            // IntersectionOfLineAndCircle
            info(vec![Parameter::object(Line), Parameter::object(Circle)], Point, 2),
            // IntersectionOfCircles
            info(vec![Parameter::set(Parameter::object(Circle), 2)], Point, 2),
        ]
    })
}

impl ConstructionType {
    pub const ALL: [ConstructionType; 13] = [
        ConstructionType::Midpoint,
        ConstructionType::LineFromPoints,
        ConstructionType::IntersectionOfLines,
        ConstructionType::PerpendicularLine,
        ConstructionType::ParallelLine,
        ConstructionType::PerpendicularProjection,
        ConstructionType::PerpendicularBisector,
        ConstructionType::InternalAngleBisector,
        ConstructionType::Circumcircle,
        ConstructionType::Circumcenter,
        ConstructionType::CircleWithCenterThroughPoint,
        ConstructionType::IntersectionOfLineAndCircle,
        ConstructionType::IntersectionOfCircles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConstructionType::Midpoint => "Midpoint",
            ConstructionType::LineFromPoints => "LineFromPoints",
            ConstructionType::IntersectionOfLines => "IntersectionOfLines",
            ConstructionType::PerpendicularLine => "PerpendicularLine",
            ConstructionType::ParallelLine => "ParallelLine",
            ConstructionType::PerpendicularProjection => "PerpendicularProjection",
            ConstructionType::PerpendicularBisector => "PerpendicularBisector",
            ConstructionType::InternalAngleBisector => "InternalAngleBisector",
            ConstructionType::Circumcircle => "Circumcircle",
            ConstructionType::Circumcenter => "Circumcenter",
            ConstructionType::CircleWithCenterThroughPoint => "CircleWithCenterThroughPoint",
            ConstructionType::IntersectionOfLineAndCircle => "IntersectionOfLineAndCircle",
            ConstructionType::IntersectionOfCircles => "IntersectionOfCircles",
        }
    }

    pub fn from_name(name: &str) -> Option<ConstructionType> {
        ConstructionType::ALL.iter().copied().find(|c| c.name() == name)
    }

    fn info(self) -> &'static ConstructionInfo {
        &registry()[self as usize]
    }

    pub fn signature(self) -> &'static [Parameter] {
        &self.info().signature
    }

    pub fn output_type(self) -> ObjectType {
        self.info().output_type
    }

    pub fn output_count(self) -> usize {
        self.info().output_count
    }
}

impl fmt::Display for ConstructionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A construction usable during generation.
#[derive(Debug, Clone)]
pub enum Construction {
    Predefined(ConstructionType),
    Composed(Arc<ComposedConstruction>),
}

impl Construction {
    pub fn name(&self) -> &str {
        match self {
            Construction::Predefined(ty) => ty.name(),
            Construction::Composed(c) => &c.name,
        }
    }

    pub fn signature(&self) -> &[Parameter] {
        match self {
            Construction::Predefined(ty) => ty.signature(),
            Construction::Composed(c) => &c.signature,
        }
    }

    pub fn output_type(&self) -> ObjectType {
        match self {
            Construction::Predefined(ty) => ty.output_type(),
            Construction::Composed(c) => c.output_type,
        }
    }

    pub fn output_count(&self) -> usize {
        match self {
            Construction::Predefined(ty) => ty.output_count(),
            Construction::Composed(_) => 1,
        }
    }
}

// Constructions are identified by name: two composed constructions with the
// same name denote the same operation.
impl PartialEq for Construction {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Construction {}

impl std::hash::Hash for Construction {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl From<ConstructionType> for Construction {
    fn from(ty: ConstructionType) -> Construction {
        Construction::Predefined(ty)
    }
}

/// A user-defined macro construction: a configuration whose last constructed
/// object is the output. Its signature is one object parameter per loose
/// object, in holder order; it is evaluated by inlining its steps into the
/// caller's picture with a local identifier remap.
#[derive(Debug)]
pub struct ComposedConstruction {
    pub name: String,
    pub configuration: Configuration,
    signature: Vec<Parameter>,
    output_type: ObjectType,
}

impl ComposedConstruction {
    pub fn new(name: String, configuration: Configuration) -> Result<Self, SignatureError> {
        let last = configuration
            .last_added()
            .ok_or(SignatureError::EmptyComposition)?;
        let signature = configuration
            .layout()
            .loose_types()
            .iter()
            .map(|&ty| Parameter::object(ty))
            .collect();
        let output_type = configuration.ty(last);
        Ok(ComposedConstruction { name, configuration, signature, output_type })
    }
}
