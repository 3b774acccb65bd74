//! The picture set and geometry constructor.
//!
//! Each accepted configuration is realized in several independently
//! randomized pictures. All pictures must agree, for every constructed
//! object, on whether it was constructable and whether it coincided with an
//! earlier object; disagreement triggers a bounded rebuild with fresh
//! randomness.

use crate::analytic::{
    self, layout, AnalyticError, AnalyticObject, Circle,
};
use crate::ast::{
    Argument, ComposedConstruction, Configuration, Construction, ConstructionType, ObjectId,
};
use rand::Rng;

/// One numeric realization of a configuration: an analytic instance per
/// object, aligned with the configuration's identifiers.
#[derive(Debug, Clone)]
pub struct Picture {
    objects: Vec<AnalyticObject>,
}

impl Picture {
    pub fn get(&self, id: ObjectId) -> &AnalyticObject {
        &self.objects[id.0]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// An ordered collection of at least two agreeing pictures.
#[derive(Debug, Clone)]
pub struct PictureSet {
    pictures: Vec<Picture>,
}

impl PictureSet {
    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

/// The outcome of realizing a configuration.
#[derive(Debug)]
pub enum Realization {
    /// Every object was constructable and distinct in all pictures.
    Constructed(PictureSet),
    /// Some object was unconstructable in every picture; the configuration
    /// is pruned with this object as the witness.
    Inconstructible { witness: ObjectId },
    /// Some object coincided with an older object in every picture; the
    /// configuration is equivalent to the one containing only the older
    /// object and is dropped from further generation.
    DuplicateObject { older: ObjectId, newer: ObjectId },
    /// The pictures kept disagreeing after all retries.
    Unresolved,
    /// The caller requested a stop between attempts (shutdown or timeout).
    Interrupted,
}

/// Options for the picture constructor.
#[derive(Debug, Clone, Copy)]
pub struct RealizeOptions {
    /// Number of pictures per configuration; at least 2.
    pub pictures: usize,
    /// Bound on full rebuilds after analytic failures or inconsistencies.
    pub retries: usize,
}

impl Default for RealizeOptions {
    fn default() -> Self {
        RealizeOptions { pictures: 5, retries: 5 }
    }
}

/// Per-picture, per-object construction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Constructed,
    Unconstructable,
    Duplicate(ObjectId),
}

enum Attempt {
    Done(Realization),
    Retry,
}

/// Realizes a configuration in `options.pictures` randomized pictures,
/// rebuilding from scratch up to `options.retries` times on analytic
/// failures or cross-picture inconsistencies. The `interrupted` callback is
/// polled between attempts.
pub fn realize<R: Rng>(
    config: &Configuration,
    options: &RealizeOptions,
    rng: &mut R,
    interrupted: impl Fn() -> bool,
) -> Realization {
    assert!(options.pictures >= 2, "a picture set needs at least two pictures");
    for _ in 0..options.retries {
        if interrupted() {
            return Realization::Interrupted;
        }
        match attempt(config, options.pictures, rng) {
            Attempt::Done(realization) => return realization,
            Attempt::Retry => continue,
        }
    }
    Realization::Unresolved
}

fn attempt<R: Rng>(config: &Configuration, pictures: usize, rng: &mut R) -> Attempt {
    let mut built = Vec::with_capacity(pictures);
    for _ in 0..pictures {
        match build_picture(config, rng) {
            Ok(picture) => built.push(picture),
            Err(e) => {
                log::debug!("analytic failure while drawing a picture: {}", e);
                return Attempt::Retry;
            }
        }
    }
    // Walk the constructed objects in order; the first one with an unusual
    // but agreeing status decides the outcome. Pictures stop building at
    // their first unconstructable object, so the walk never outruns any
    // picture's status list.
    for index in 0..config.constructed_count() {
        let id = ObjectId(config.loose_count() + index);
        let first = built[0].1[index];
        if built.iter().any(|(_, statuses)| statuses[index] != first) {
            log::debug!(
                "inconsistent pictures for object {}: rebuilding",
                config.name(id)
            );
            return Attempt::Retry;
        }
        match first {
            Status::Constructed => (),
            Status::Unconstructable => {
                return Attempt::Done(Realization::Inconstructible { witness: id });
            }
            Status::Duplicate(older) => {
                return Attempt::Done(Realization::DuplicateObject { older, newer: id });
            }
        }
    }
    let pictures = built
        .into_iter()
        .map(|(objects, _)| Picture { objects })
        .collect();
    Attempt::Done(Realization::Constructed(PictureSet { pictures }))
}

/// Builds one picture: draws the loose objects and applies each constructor
/// in order, recording per-object statuses. Stops at the first
/// unconstructable object; duplicates are recorded but construction goes on,
/// since their instances exist.
fn build_picture<R: Rng>(
    config: &Configuration,
    rng: &mut R,
) -> Result<(Vec<AnalyticObject>, Vec<Status>), AnalyticError> {
    let mut objects = layout::draw(config.layout(), rng)?;
    let mut statuses = Vec::with_capacity(config.constructed_count());
    for (_, c) in config.constructed() {
        match evaluate(&c.construction, &c.args, c.output_index, &objects)? {
            None => {
                statuses.push(Status::Unconstructable);
                break;
            }
            Some(instance) => {
                let older = objects.iter().position(|o| o.rounded_eq(&instance));
                statuses.push(match older {
                    Some(i) => Status::Duplicate(ObjectId(i)),
                    None => Status::Constructed,
                });
                objects.push(instance);
            }
        }
    }
    Ok((objects, statuses))
}

/// Applies a construction to analytic instances. `Ok(None)` means the object
/// has no solution (e.g. intersecting parallel lines); errors mean the
/// inputs were degenerate and the whole picture must be redrawn.
pub fn evaluate(
    construction: &Construction,
    args: &[Argument],
    output_index: usize,
    objects: &[AnalyticObject],
) -> Result<Option<AnalyticObject>, AnalyticError> {
    match construction {
        Construction::Predefined(ty) => {
            let ids: Vec<ObjectId> = args.iter().flat_map(|a| a.objects()).collect();
            evaluate_predefined(*ty, &ids, output_index, objects)
        }
        Construction::Composed(composed) => evaluate_composed(composed, args, objects),
    }
}

fn evaluate_predefined(
    ty: ConstructionType,
    ids: &[ObjectId],
    output_index: usize,
    objects: &[AnalyticObject],
) -> Result<Option<AnalyticObject>, AnalyticError> {
    use AnalyticObject::{Circle as CircleObject, Line as LineObject, Point as PointObject};
    let point = |i: usize| {
        objects[ids[i].0]
            .as_point()
            .copied()
            .expect("signature guarantees a point")
    };
    let line = |i: usize| {
        objects[ids[i].0]
            .as_line()
            .copied()
            .expect("signature guarantees a line")
    };
    let circle = |i: usize| {
        objects[ids[i].0]
            .as_circle()
            .copied()
            .expect("signature guarantees a circle")
    };
    Ok(match ty {
        ConstructionType::Midpoint => {
            Some(PointObject(analytic::midpoint(&point(0), &point(1))))
        }
        ConstructionType::LineFromPoints => {
            Some(LineObject(analytic::Line::through(&point(0), &point(1))?))
        }
        ConstructionType::IntersectionOfLines => {
            analytic::intersect_lines(&line(0), &line(1))?.map(PointObject)
        }
        ConstructionType::PerpendicularLine => {
            Some(LineObject(analytic::perpendicular_through(&point(0), &line(1))))
        }
        ConstructionType::ParallelLine => {
            Some(LineObject(analytic::parallel_through(&point(0), &line(1))))
        }
        ConstructionType::PerpendicularProjection => {
            Some(PointObject(analytic::projection(&point(0), &line(1))))
        }
        ConstructionType::PerpendicularBisector => {
            Some(LineObject(analytic::perpendicular_bisector(&point(0), &point(1))?))
        }
        ConstructionType::InternalAngleBisector => {
            analytic::internal_angle_bisector(&point(0), &point(1), &point(2))?.map(LineObject)
        }
        ConstructionType::Circumcircle => {
            Circle::through(&point(0), &point(1), &point(2))?.map(CircleObject)
        }
        ConstructionType::Circumcenter => {
            analytic::circumcenter(&point(0), &point(1), &point(2))?.map(PointObject)
        }
        ConstructionType::CircleWithCenterThroughPoint => {
            let (center, through) = (point(0), point(1));
            if center.rounded_eq(&through) {
                return Err(AnalyticError::CoincidentInputs);
            }
            Some(CircleObject(Circle::new(center, center.distance(&through))))
        }
        ConstructionType::IntersectionOfLineAndCircle => {
            analytic::intersect_line_circle(&line(0), &circle(1))
                .get(output_index)
                .copied()
                .map(PointObject)
        }
        ConstructionType::IntersectionOfCircles => {
            analytic::intersect_circles(&circle(0), &circle(1))?
                .get(output_index)
                .copied()
                .map(PointObject)
        }
    })
}

/// Evaluates a composed construction by inlining its steps into a local
/// instance table keyed by the sub-configuration's identifiers. No nested
/// picture set is created.
fn evaluate_composed(
    composed: &ComposedConstruction,
    args: &[Argument],
    objects: &[AnalyticObject],
) -> Result<Option<AnalyticObject>, AnalyticError> {
    let mut local: Vec<AnalyticObject> = args
        .iter()
        .map(|arg| match arg {
            Argument::Object(id) => objects[id.0],
            Argument::Set(_) => unreachable!("composed construction signatures are flat"),
        })
        .collect();
    for (_, c) in composed.configuration.constructed() {
        match evaluate(&c.construction, &c.args, c.output_index, &local)? {
            None => return Ok(None),
            Some(instance) => local.push(instance),
        }
    }
    Ok(Some(*local.last().expect("composed constructions are never empty")))
}
