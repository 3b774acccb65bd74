use super::*;
use crate::ast::printer::least_configuration;

fn triangle() -> Configuration {
    Configuration::new(Layout::Triangle, &["A", "B", "C"])
}

fn midpoint_of(config: &Configuration, a: usize, b: usize, name: &str) -> Configuration {
    let args = vec![Argument::set(vec![
        Argument::Object(ObjectId(a)),
        Argument::Object(ObjectId(b)),
    ])
    .unwrap()];
    config
        .extended(
            Construction::Predefined(ConstructionType::Midpoint),
            args,
            0,
            name.to_owned(),
        )
        .unwrap()
}

#[test]
fn set_arguments_are_sorted_and_duplicate_free() {
    let sorted = Argument::set(vec![
        Argument::Object(ObjectId(2)),
        Argument::Object(ObjectId(0)),
    ])
    .unwrap();
    assert_eq!(
        sorted,
        Argument::Set(vec![
            Argument::Object(ObjectId(0)),
            Argument::Object(ObjectId(2)),
        ])
    );
    let duplicated = Argument::set(vec![
        Argument::Object(ObjectId(1)),
        Argument::Object(ObjectId(1)),
    ]);
    assert_eq!(duplicated, Err(SignatureError::DuplicateInSet));
}

#[test]
fn signature_mismatches_are_rejected() {
    let config = triangle();
    // A midpoint of a single point.
    let result = config.extended(
        Construction::Predefined(ConstructionType::Midpoint),
        vec![Argument::Object(ObjectId(0))],
        0,
        "M".to_owned(),
    );
    assert_eq!(result.unwrap_err(), SignatureError::UnexpectedObject);
    // A perpendicular line through a line.
    let result = config.extended(
        Construction::Predefined(ConstructionType::PerpendicularLine),
        vec![Argument::Object(ObjectId(0)), Argument::Object(ObjectId(1))],
        0,
        "m".to_owned(),
    );
    assert!(matches!(result, Err(SignatureError::WrongObjectType { .. })));
    // An output index on a single-output construction.
    let result = config.extended(
        Construction::Predefined(ConstructionType::Midpoint),
        vec![Argument::set(vec![
            Argument::Object(ObjectId(0)),
            Argument::Object(ObjectId(1)),
        ])
        .unwrap()],
        1,
        "M".to_owned(),
    );
    assert!(matches!(result, Err(SignatureError::BadOutputIndex { .. })));
}

#[test]
fn canonical_string_of_a_midpoint() {
    let config = midpoint_of(&triangle(), 0, 1, "M");
    let (key, remap) = least_configuration(&config);
    assert_eq!(key, "Triangle|Midpoint({0,1})|[0,1,2]");
    assert_eq!(remap, &[0, 1, 2]);
}

#[test]
fn symmetric_variants_present_the_same_body() {
    let of_ab = midpoint_of(&triangle(), 0, 1, "M");
    let of_ac = midpoint_of(&triangle(), 0, 2, "M");
    let (key_ab, _) = least_configuration(&of_ab);
    let (key_ac, remap_ac) = least_configuration(&of_ac);
    // The keys differ only in the winning remapping, so the two variants
    // stay distinct while their constructed bodies agree.
    assert_ne!(key_ab, key_ac);
    assert_eq!(key_ac, "Triangle|Midpoint({0,1})|[0,2,1]");
    assert_eq!(remap_ac, &[0, 2, 1]);
}

#[test]
fn construction_order_does_not_change_the_key() {
    let first = midpoint_of(&midpoint_of(&triangle(), 0, 1, "M"), 1, 2, "N");
    let second = midpoint_of(&midpoint_of(&triangle(), 1, 2, "N"), 0, 1, "M");
    assert_eq!(least_configuration(&first).0, least_configuration(&second).0);
}

#[test]
fn rewriting_under_the_winning_remap_is_canonical() {
    let config = midpoint_of(&triangle(), 1, 2, "M");
    let (key, remap) = least_configuration(&config);
    let rewritten = config.remapped_loose(remap);
    let (rewritten_key, rewritten_remap) = least_configuration(&rewritten);
    // The rewritten configuration presents the minimal body directly.
    assert_eq!(rewritten_remap, &[0, 1, 2]);
    let body = |key: &str| key.rsplit_once("|[").map(|(b, _)| b.to_owned()).unwrap();
    assert_eq!(body(&key), body(&rewritten_key));
}

#[test]
fn remapping_moves_names_with_their_objects() {
    let config = midpoint_of(&triangle(), 1, 2, "M");
    let (_, remap) = least_configuration(&config);
    let rewritten = config.remapped_loose(remap);
    // The midpoint's arguments now name the first two slots, which carry
    // the names of the original pair.
    assert_eq!(rewritten.format_object(ObjectId(3)), "M = Midpoint({B, C})");
}

#[test]
fn nested_construction_strings_expand_recursively() {
    let config = midpoint_of(&triangle(), 0, 1, "M");
    let config = midpoint_of(&config, 0, 3, "X");
    let mut printer = CanonicalPrinter::new(&config, &[0, 1, 2]);
    assert_eq!(
        printer.object_string(ObjectId(4)),
        "Midpoint({0,Midpoint({0,1})})"
    );
}

#[test]
fn internal_objects_walk_the_argument_closure() {
    let config = midpoint_of(&triangle(), 0, 1, "M");
    let config = midpoint_of(&config, 2, 3, "X");
    let internal: Vec<ObjectId> = config.internal_objects(ObjectId(4)).collect();
    assert_eq!(
        internal,
        vec![ObjectId(4), ObjectId(2), ObjectId(3), ObjectId(0), ObjectId(1)]
    );
    let closure = config.dependency_closure([ObjectId(3)]);
    assert_eq!(closure.len(), 3);
}

#[test]
fn theorem_objects_normalize_their_components() {
    let segment = TheoremObject::segment(ObjectId(5), ObjectId(2));
    assert_eq!(segment, TheoremObject::Segment(ObjectId(2), ObjectId(5)));
    let theorem_a = Theorem::new(
        TheoremKind::EqualLineSegments,
        vec![
            TheoremObject::segment(ObjectId(0), ObjectId(3)),
            TheoremObject::segment(ObjectId(3), ObjectId(1)),
        ],
    );
    let theorem_b = Theorem::new(
        TheoremKind::EqualLineSegments,
        vec![
            TheoremObject::segment(ObjectId(1), ObjectId(3)),
            TheoremObject::segment(ObjectId(3), ObjectId(0)),
        ],
    );
    assert_eq!(theorem_a, theorem_b);
}

#[test]
fn theorems_display_with_object_names() {
    let config = midpoint_of(&triangle(), 0, 1, "M");
    let theorem = Theorem::new(
        TheoremKind::EqualLineSegments,
        vec![
            TheoremObject::segment(ObjectId(0), ObjectId(3)),
            TheoremObject::segment(ObjectId(1), ObjectId(3)),
        ],
    );
    assert_eq!(theorem.display(&config).to_string(), "EqualLineSegments(A-M, B-M)");
}

#[test]
fn composed_constructions_expose_their_loose_signature() {
    let sub = midpoint_of(&triangle(), 0, 1, "M");
    let composed = ComposedConstruction::new("MidAB".to_owned(), sub).unwrap();
    assert_eq!(composed.configuration.constructed_count(), 1);
    let construction = Construction::Composed(std::sync::Arc::new(composed));
    assert_eq!(construction.signature().len(), 3);
    assert_eq!(construction.output_type(), ObjectType::Point);
}
