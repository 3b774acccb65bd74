//! The sub-theorem filter: matching discovered theorems against the library
//! of template theorems loaded at startup.
//!
//! A match is a signature-preserving identifier remapping from the template
//! configuration into a sub-DAG of the candidate configuration that carries
//! the template theorem onto the discovered one.

use super::expand_entities;
use crate::ast::{Argument, Configuration, ObjectId, Theorem};
use crate::parser::TemplateTheorem;
use ahash::AHashMap;

/// The template theorems, immutable after startup.
#[derive(Debug, Default)]
pub struct TemplateLibrary {
    templates: Vec<TemplateTheorem>,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<TemplateTheorem>) -> TemplateLibrary {
        TemplateLibrary { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Finds the first template the theorem is an instance of, returning the
    /// template's number and file name.
    pub fn find_match(
        &self,
        config: &Configuration,
        theorem: &Theorem,
    ) -> Option<(usize, String)> {
        let index = constructed_index(config);
        self.templates
            .iter()
            .find(|template| matches_template(template, config, theorem, &index))
            .map(|template| (template.number, template.file.clone()))
    }
}

type ConstructedIndex = AHashMap<(String, Vec<Argument>, usize), ObjectId>;

/// Indexes the configuration's constructed objects by construction name,
/// normalized arguments and output index.
fn constructed_index(config: &Configuration) -> ConstructedIndex {
    config
        .constructed()
        .map(|(id, c)| {
            (
                (c.construction.name().to_owned(), c.args.clone(), c.output_index),
                id,
            )
        })
        .collect()
}

fn matches_template(
    template: &TemplateTheorem,
    config: &Configuration,
    theorem: &Theorem,
    index: &ConstructedIndex,
) -> bool {
    let mut mapping = vec![None; template.configuration.len()];
    assign_loose(template, config, theorem, index, &mut mapping, 0)
}

/// Tries every assignment of the template's loose objects to same-typed
/// objects of the configuration (loose or constructed), recursing one slot
/// at a time.
fn assign_loose(
    template: &TemplateTheorem,
    config: &Configuration,
    theorem: &Theorem,
    index: &ConstructedIndex,
    mapping: &mut Vec<Option<ObjectId>>,
    slot: usize,
) -> bool {
    let loose = template.configuration.loose_count();
    if slot == loose {
        return resolve_constructed(template, config, theorem, index, mapping);
    }
    let ty = template.configuration.ty(ObjectId(slot));
    for candidate in config.ids() {
        if config.ty(candidate) != ty || mapping[..loose].contains(&Some(candidate)) {
            continue;
        }
        mapping[slot] = Some(candidate);
        if assign_loose(template, config, theorem, index, mapping, slot + 1) {
            return true;
        }
    }
    mapping[slot] = None;
    false
}

/// With the loose objects fixed, each constructed object of the template is
/// forced: it must appear in the configuration with the same construction
/// and the remapped arguments. If all resolve, the remapped template theorem
/// must equal the discovered one.
fn resolve_constructed(
    template: &TemplateTheorem,
    config: &Configuration,
    theorem: &Theorem,
    index: &ConstructedIndex,
    mapping: &[Option<ObjectId>],
) -> bool {
    let mut mapping = mapping.to_vec();
    for (tid, c) in template.configuration.constructed() {
        let remap = |id: ObjectId| mapping[id.0].expect("arguments precede their object");
        let args: Vec<Argument> = c.args.iter().map(|a| a.remapped(&remap)).collect();
        let key = (c.construction.name().to_owned(), args, c.output_index);
        match index.get(&key) {
            Some(&cid) => mapping[tid.0] = Some(cid),
            None => return false,
        }
    }
    let remap = |id: ObjectId| mapping[id.0].expect("theorem objects exist in the template");
    let mapped = template.theorem.remapped(&remap);
    expand_entities(&mapped, config) == expand_entities(theorem, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Construction, ConstructionType, Layout, TheoremKind, TheoremObject};

    fn pair(a: usize, b: usize) -> Argument {
        Argument::set(vec![
            Argument::Object(ObjectId(a)),
            Argument::Object(ObjectId(b)),
        ])
        .unwrap()
    }

    fn midpoint_template() -> TemplateTheorem {
        let config = Configuration::new(Layout::LineSegment, &["X", "Y"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::Midpoint),
                vec![pair(0, 1)],
                0,
                "Z".to_owned(),
            )
            .unwrap();
        TemplateTheorem {
            number: 1,
            file: "midpoints.txt".to_owned(),
            theorem: Theorem::new(
                TheoremKind::EqualLineSegments,
                vec![
                    TheoremObject::segment(ObjectId(0), ObjectId(2)),
                    TheoremObject::segment(ObjectId(1), ObjectId(2)),
                ],
            ),
            configuration: config,
        }
    }

    #[test]
    fn a_midpoint_instance_matches_the_template() {
        let library = TemplateLibrary::new(vec![midpoint_template()]);
        let config = Configuration::new(Layout::Triangle, &["A", "B", "C"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::Midpoint),
                vec![pair(1, 2)],
                0,
                "M".to_owned(),
            )
            .unwrap();
        let theorem = Theorem::new(
            TheoremKind::EqualLineSegments,
            vec![
                TheoremObject::segment(ObjectId(1), ObjectId(3)),
                TheoremObject::segment(ObjectId(2), ObjectId(3)),
            ],
        );
        assert_eq!(
            library.find_match(&config, &theorem),
            Some((1, "midpoints.txt".to_owned()))
        );
    }

    #[test]
    fn a_different_statement_does_not_match() {
        let library = TemplateLibrary::new(vec![midpoint_template()]);
        let config = Configuration::new(Layout::Triangle, &["A", "B", "C"]);
        let config = config
            .extended(
                Construction::Predefined(ConstructionType::Midpoint),
                vec![pair(1, 2)],
                0,
                "M".to_owned(),
            )
            .unwrap();
        let theorem = Theorem::new(
            TheoremKind::EqualLineSegments,
            vec![
                TheoremObject::segment(ObjectId(0), ObjectId(3)),
                TheoremObject::segment(ObjectId(2), ObjectId(3)),
            ],
        );
        assert_eq!(library.find_match(&config, &theorem), None);
    }
}
