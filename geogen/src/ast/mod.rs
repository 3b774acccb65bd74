//! The term model for geometric configurations.
//!
//! A configuration is an immutable DAG of loose and constructed objects;
//! this module also contains the canonical string converter and the
//! traversal utilities used by the generator and the theorem filters.

mod construction;
mod iter;
pub(crate) mod printer;
mod theorem;
#[cfg(test)]
mod tests;

pub use construction::{
    normalize_arguments, signature_object_counts, ComposedConstruction, Construction,
    ConstructionType, Parameter, SignatureError,
};
pub use iter::InternalObjects;
pub use printer::{least_configuration, CanonicalPrinter};
pub use theorem::{Theorem, TheoremDisplay, TheoremKind, TheoremObject};

use ahash::AHashSet;
use std::fmt;

/// The identifier of an object inside a configuration: its position in the
/// object list. Loose objects occupy `0..loose_count` in holder order and
/// constructed objects follow in construction order. Identifiers are assigned
/// once and never overwritten; canonicalization produces a new configuration
/// instead of mutating identifiers in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The type of a geometric object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Point,
    Line,
    Circle,
}

impl ObjectType {
    pub const ALL: [ObjectType; 3] = [ObjectType::Point, ObjectType::Line, ObjectType::Circle];

    pub fn index(self) -> usize {
        match self {
            ObjectType::Point => 0,
            ObjectType::Line => 1,
            ObjectType::Circle => 2,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ObjectType::Point => "point",
            ObjectType::Line => "line",
            ObjectType::Circle => "circle",
        };
        write!(f, "{}", name)
    }
}

/// The initial arrangement of the loose objects. The layout fixes both the
/// types of the loose objects and the symmetry group used when computing
/// canonical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    LineSegment,
    Triangle,
    Quadrilateral,
    ExplicitLineAndPoint,
    ExplicitLineAndTwoPoints,
    RightTriangle,
}

impl Layout {
    pub const ALL: [Layout; 6] = [
        Layout::LineSegment,
        Layout::Triangle,
        Layout::Quadrilateral,
        Layout::ExplicitLineAndPoint,
        Layout::ExplicitLineAndTwoPoints,
        Layout::RightTriangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layout::LineSegment => "LineSegment",
            Layout::Triangle => "Triangle",
            Layout::Quadrilateral => "Quadrilateral",
            Layout::ExplicitLineAndPoint => "ExplicitLineAndPoint",
            Layout::ExplicitLineAndTwoPoints => "ExplicitLineAndTwoPoints",
            Layout::RightTriangle => "RightTriangle",
        }
    }

    pub fn from_name(name: &str) -> Option<Layout> {
        Layout::ALL.iter().copied().find(|l| l.name() == name)
    }

    /// The types of the loose objects, in holder order.
    pub fn loose_types(self) -> &'static [ObjectType] {
        use ObjectType::{Line, Point};
        match self {
            Layout::LineSegment => &[Point, Point],
            Layout::Triangle | Layout::RightTriangle => &[Point, Point, Point],
            Layout::Quadrilateral => &[Point, Point, Point, Point],
            Layout::ExplicitLineAndPoint => &[Line, Point],
            Layout::ExplicitLineAndTwoPoints => &[Line, Point, Point],
        }
    }

    /// The permutations of the loose identifiers that preserve the layout's
    /// geometric meaning. `perm[i]` is the identifier the loose object `i`
    /// is renamed to.
    ///
    /// The quadrilateral admits the dihedral group of its vertex cycle; the
    /// right triangle keeps its right-angle vertex (the first point) fixed
    /// and may swap the two legs.
    pub fn symmetries(self) -> &'static [&'static [usize]] {
        match self {
            Layout::LineSegment => &[&[0, 1], &[1, 0]],
            Layout::Triangle => &[
                &[0, 1, 2],
                &[0, 2, 1],
                &[1, 0, 2],
                &[1, 2, 0],
                &[2, 0, 1],
                &[2, 1, 0],
            ],
            Layout::Quadrilateral => &[
                &[0, 1, 2, 3],
                &[1, 2, 3, 0],
                &[2, 3, 0, 1],
                &[3, 0, 1, 2],
                &[3, 2, 1, 0],
                &[0, 3, 2, 1],
                &[1, 0, 3, 2],
                &[2, 1, 0, 3],
            ],
            Layout::ExplicitLineAndPoint => &[&[0, 1]],
            Layout::ExplicitLineAndTwoPoints => &[&[0, 1, 2], &[0, 2, 1]],
            Layout::RightTriangle => &[&[0, 1, 2], &[0, 2, 1]],
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The instantiation of a parameter: a single object or an unordered set of
/// inner arguments. Sets are kept duplicate-free and sorted, so that argument
/// tuples can be hashed and compared structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Argument {
    Object(ObjectId),
    Set(Vec<Argument>),
}

impl Argument {
    /// Builds a set argument, sorting the elements and rejecting duplicates.
    pub fn set(mut elements: Vec<Argument>) -> Result<Argument, SignatureError> {
        elements.sort();
        if elements.windows(2).any(|w| w[0] == w[1]) {
            return Err(SignatureError::DuplicateInSet);
        }
        Ok(Argument::Set(elements))
    }

    /// All object identifiers mentioned by this argument, in stored order.
    pub fn objects(&self) -> Vec<ObjectId> {
        let mut out = Vec::new();
        self.collect_objects(&mut out);
        out
    }

    fn collect_objects(&self, out: &mut Vec<ObjectId>) {
        match self {
            Argument::Object(id) => out.push(*id),
            Argument::Set(elements) => {
                for element in elements {
                    element.collect_objects(out);
                }
            }
        }
    }

    /// Applies an identifier remapping, re-sorting sets afterwards so the
    /// result stays normalized.
    pub fn remapped(&self, map: &impl Fn(ObjectId) -> ObjectId) -> Argument {
        match self {
            Argument::Object(id) => Argument::Object(map(*id)),
            Argument::Set(elements) => {
                let mut remapped: Vec<Argument> =
                    elements.iter().map(|e| e.remapped(map)).collect();
                remapped.sort();
                Argument::Set(remapped)
            }
        }
    }
}

/// An object produced by applying a construction to earlier objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructedObject {
    pub construction: Construction,
    pub args: Vec<Argument>,
    /// Distinguishes the outputs of multi-output constructions; zero for
    /// single-output ones.
    pub output_index: usize,
}

/// A node of the configuration DAG.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigObject {
    /// A free primitive whose position is chosen by the layout's random
    /// generator.
    Loose { ty: ObjectType },
    Constructed(ConstructedObject),
}

impl ConfigObject {
    pub fn ty(&self) -> ObjectType {
        match self {
            ConfigObject::Loose { ty } => *ty,
            ConfigObject::Constructed(c) => c.construction.output_type(),
        }
    }

    pub fn as_constructed(&self) -> Option<&ConstructedObject> {
        match self {
            ConfigObject::Loose { .. } => None,
            ConfigObject::Constructed(c) => Some(c),
        }
    }
}

/// An ordered list of constructed objects preceded by the loose-object
/// holder. Every argument of a constructed object refers to an earlier
/// object, so the object list is always topologically ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    layout: Layout,
    objects: Vec<ConfigObject>,
    names: Vec<String>,
}

impl Configuration {
    /// Builds the loose-object holder for a layout. The number of names must
    /// match the layout's loose objects; a mismatch is a caller bug.
    pub fn new(layout: Layout, names: &[&str]) -> Configuration {
        let types = layout.loose_types();
        assert_eq!(
            names.len(),
            types.len(),
            "layout {} needs {} loose objects",
            layout,
            types.len()
        );
        Configuration {
            layout,
            objects: types.iter().map(|&ty| ConfigObject::Loose { ty }).collect(),
            names: names.iter().map(|&n| n.to_owned()).collect(),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn objects(&self) -> &[ConfigObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn loose_count(&self) -> usize {
        self.layout.loose_types().len()
    }

    pub fn constructed_count(&self) -> usize {
        self.len() - self.loose_count()
    }

    pub fn get(&self, id: ObjectId) -> &ConfigObject {
        &self.objects[id.0]
    }

    pub fn ty(&self, id: ObjectId) -> ObjectType {
        self.objects[id.0].ty()
    }

    pub fn name(&self, id: ObjectId) -> &str {
        &self.names[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.objects.len()).map(ObjectId)
    }

    /// The constructed objects, in construction order.
    pub fn constructed(&self) -> impl Iterator<Item = (ObjectId, &ConstructedObject)> {
        self.objects.iter().enumerate().filter_map(|(i, object)| {
            object.as_constructed().map(|c| (ObjectId(i), c))
        })
    }

    /// The most recently constructed object, if any.
    pub fn last_added(&self) -> Option<ObjectId> {
        if self.constructed_count() == 0 {
            None
        } else {
            Some(ObjectId(self.objects.len() - 1))
        }
    }

    pub fn objects_of_type(&self, ty: ObjectType) -> Vec<ObjectId> {
        self.ids().filter(|&id| self.ty(id) == ty).collect()
    }

    /// Looks up an object by its display name.
    pub fn id_by_name(&self, name: &str) -> Option<ObjectId> {
        self.names.iter().position(|n| n == name).map(ObjectId)
    }

    /// The argument tuples already used by this configuration for the given
    /// construction. The argument generator skips these so that an existing
    /// object is never rebuilt.
    pub fn used_arguments(&self, construction: &Construction) -> AHashSet<Vec<Argument>> {
        self.constructed()
            .filter(|(_, c)| &c.construction == construction)
            .map(|(_, c)| c.args.clone())
            .collect()
    }

    /// Extends the configuration with one constructed object, validating the
    /// arguments against the construction's signature. Returns a new
    /// configuration; the receiver is left untouched.
    pub fn extended(
        &self,
        construction: Construction,
        args: Vec<Argument>,
        output_index: usize,
        name: String,
    ) -> Result<Configuration, SignatureError> {
        if output_index >= construction.output_count() {
            return Err(SignatureError::BadOutputIndex {
                count: construction.output_count(),
                got: output_index,
            });
        }
        for arg in &args {
            for id in arg.objects() {
                if id.0 >= self.objects.len() {
                    return Err(SignatureError::ForwardReference);
                }
            }
        }
        let args = normalize_arguments(construction.signature(), args, &|id| self.ty(id))?;
        let mut extended = self.clone();
        extended.objects.push(ConfigObject::Constructed(ConstructedObject {
            construction,
            args,
            output_index,
        }));
        extended.names.push(name);
        Ok(extended)
    }

    /// Rewrites the configuration under a permutation of its loose
    /// identifiers (the winning remapping of the least-configuration finder).
    /// Constructed objects keep their topological order; only argument
    /// references to loose objects change, and loose display names follow
    /// their objects to the new slots.
    pub fn remapped_loose(&self, perm: &[usize]) -> Configuration {
        let loose = self.loose_count();
        assert_eq!(perm.len(), loose, "remapping must cover all loose objects");
        let map = |id: ObjectId| {
            if id.0 < loose {
                ObjectId(perm[id.0])
            } else {
                id
            }
        };
        let mut names = self.names.clone();
        for i in 0..loose {
            names[perm[i]] = self.names[i].clone();
        }
        let objects = self
            .objects
            .iter()
            .map(|object| match object {
                ConfigObject::Loose { ty } => ConfigObject::Loose { ty: *ty },
                ConfigObject::Constructed(c) => ConfigObject::Constructed(ConstructedObject {
                    construction: c.construction.clone(),
                    args: c.args.iter().map(|a| a.remapped(&map)).collect(),
                    output_index: c.output_index,
                }),
            })
            .collect();
        Configuration { layout: self.layout, objects, names }
    }

    /// Formats one constructed object the way input files spell it:
    /// `name = Construction(arg, {a, b})`.
    pub fn format_object(&self, id: ObjectId) -> String {
        match self.get(id) {
            ConfigObject::Loose { .. } => self.name(id).to_owned(),
            ConfigObject::Constructed(c) => {
                let args: Vec<String> = c.args.iter().map(|a| self.format_argument(a)).collect();
                let mut line = format!(
                    "{} = {}({})",
                    self.name(id),
                    c.construction.name(),
                    args.join(", ")
                );
                if c.output_index != 0 {
                    line.push_str(&format!("[{}]", c.output_index));
                }
                line
            }
        }
    }

    fn format_argument(&self, arg: &Argument) -> String {
        match arg {
            Argument::Object(id) => self.name(*id).to_owned(),
            Argument::Set(elements) => {
                let inner: Vec<String> =
                    elements.iter().map(|e| self.format_argument(e)).collect();
                format!("{{{}}}", inner.join(", "))
            }
        }
    }
}

impl fmt::Display for Configuration {
    /// Prints the configuration in input-file form: the layout line followed
    /// by one line per constructed object.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.layout.name())?;
        for i in 0..self.loose_count() {
            write!(f, " {}", self.names[i])?;
        }
        for (id, _) in self.constructed() {
            write!(f, "\n{}", self.format_object(id))?;
        }
        Ok(())
    }
}
