//! Theorem filters: classify each discovered theorem as trivial, a
//! sub-theorem of a template, definable in a simpler configuration, or
//! implied by transitivity. A theorem matching several categories is
//! reported under the first matching one, in that order.

mod simpler;
mod subtheorem;
mod transitivity;
mod trivial;

pub use subtheorem::TemplateLibrary;
pub use trivial::definitional_theorems;

use crate::ast::{
    Configuration, ConfigObject, Construction, ConstructionType, Theorem, TheoremObject,
};

/// Why a theorem was filtered.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Implied by the last construction alone.
    Trivial,
    /// An instance of a template theorem.
    SubTheorem { number: usize, file: String },
    /// Statable in a configuration with fewer constructed objects.
    SimplerConfiguration,
    /// The composition of two known facts.
    Transitivity { first: Theorem, second: Theorem },
}

impl Classification {
    /// The literal annotation used in reports.
    pub fn annotation(&self, config: &Configuration) -> String {
        match self {
            Classification::Trivial => "trivial theorem".to_owned(),
            Classification::SubTheorem { number, file } => {
                format!("sub-theorem implied from theorem {} from file {}", number, file)
            }
            Classification::SimplerConfiguration => {
                "can be defined in a simpler configuration".to_owned()
            }
            Classification::Transitivity { first, second } => format!(
                "is true because of {} and {}",
                first.display(config),
                second.display(config)
            ),
        }
    }
}

/// A discovered theorem together with its classification, if any.
#[derive(Debug)]
pub struct ClassifiedTheorem {
    pub theorem: Theorem,
    pub classification: Option<Classification>,
}

/// Classifies one theorem. `facts` are the verified facts of the
/// configuration's picture set, as produced by the finder.
pub fn classify(
    config: &Configuration,
    templates: &TemplateLibrary,
    facts: &[Theorem],
    theorem: &Theorem,
) -> Option<Classification> {
    if trivial::is_trivial(config, theorem) {
        return Some(Classification::Trivial);
    }
    if let Some((number, file)) = templates.find_match(config, theorem) {
        return Some(Classification::SubTheorem { number, file });
    }
    if simpler::definable_in_simpler(config, theorem) {
        return Some(Classification::SimplerConfiguration);
    }
    if let Some((first, second)) = transitivity::implied_by_transitivity(theorem, facts) {
        return Some(Classification::Transitivity { first, second });
    }
    None
}

/// Rewrites line and circle entities given by an object into their defining
/// points whenever the object was constructed directly from points
/// (`LineFromPoints`, `Circumcircle`), so that different spellings of the
/// same statement compare equal.
pub(crate) fn expand_entities(theorem: &Theorem, config: &Configuration) -> Theorem {
    Theorem::new(
        theorem.kind,
        theorem
            .objects
            .iter()
            .map(|object| expand_object(object, config))
            .collect(),
    )
}

fn expand_object(object: &TheoremObject, config: &Configuration) -> TheoremObject {
    match object {
        TheoremObject::Line(id) => {
            if let Some(points) = construction_points(config, *id, ConstructionType::LineFromPoints)
            {
                return TheoremObject::line_by_points(points[0], points[1]);
            }
            object.clone()
        }
        TheoremObject::Circle(id) => {
            if let Some(points) = construction_points(config, *id, ConstructionType::Circumcircle) {
                return TheoremObject::circle_by_points(points[0], points[1], points[2]);
            }
            object.clone()
        }
        TheoremObject::Angle(l1, l2) => {
            TheoremObject::angle(expand_object(l1, config), expand_object(l2, config))
        }
        other => other.clone(),
    }
}

fn construction_points(
    config: &Configuration,
    id: crate::ast::ObjectId,
    expected: ConstructionType,
) -> Option<Vec<crate::ast::ObjectId>> {
    match config.get(id) {
        ConfigObject::Constructed(c)
            if c.construction == Construction::Predefined(expected) =>
        {
            Some(c.args.iter().flat_map(|a| a.objects()).collect())
        }
        _ => None,
    }
}
