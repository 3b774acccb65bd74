use super::*;
use crate::ast::{ConstructionType, Layout, ObjectId, TheoremKind};
use std::io::Cursor;

fn parse(text: &str) -> GeogenResult<GeneratorInput> {
    parse_input(Cursor::new(text))
}

#[test]
fn a_complete_input_parses() {
    let input = parse(
        "# A triangle with a midpoint\n\
         Triangle A B C\n\
         M = Midpoint({A, B})\n\
         l = LineFromPoints({A, M})  # redundant, but legal\n\
         \n\
         Rules:\n\
         Midpoint\n\
         LineFromPoints\n",
    )
    .unwrap();
    let config = &input.configuration;
    assert_eq!(config.layout(), Layout::Triangle);
    assert_eq!(config.loose_count(), 3);
    assert_eq!(config.constructed_count(), 2);
    assert_eq!(config.id_by_name("M"), Some(ObjectId(3)));
    assert_eq!(config.format_object(ObjectId(3)), "M = Midpoint({A, B})");
    assert_eq!(input.rules.len(), 2);
    assert_eq!(input.rules[0].name(), "Midpoint");
}

#[test]
fn output_indices_parse() {
    let input = parse(
        "Triangle A B C\n\
         c1 = CircleWithCenterThroughPoint(A, B)\n\
         c2 = CircleWithCenterThroughPoint(B, A)\n\
         X = IntersectionOfCircles({c1, c2})[1]\n\
         Rules:\n\
         Midpoint\n",
    )
    .unwrap();
    let (_, constructed) = input
        .configuration
        .constructed()
        .nth(2)
        .unwrap();
    assert_eq!(constructed.output_index, 1);
}

#[test]
fn undefined_identifiers_are_reported_with_their_position() {
    let result = parse("Triangle A B C\nM = Midpoint({A, D})\nRules:\nMidpoint\n");
    match result {
        Err(Error::Parser(ParserError::UndefinedIden(name), (line, _))) => {
            assert_eq!(name, "D");
            assert_eq!(line, 2);
        }
        other => panic!("expected an undefined identifier error, got {:?}", other),
    }
}

#[test]
fn unknown_constructions_are_rejected() {
    let result = parse("Triangle A B C\nM = Barycenter(A, B, C)\nRules:\nMidpoint\n");
    assert!(matches!(
        result,
        Err(Error::Parser(ParserError::UnknownConstruction(_), _))
    ));
    let result = parse("Triangle A B C\nRules:\nBarycenter\n");
    assert!(matches!(
        result,
        Err(Error::Parser(ParserError::UnknownConstruction(_), _))
    ));
}

#[test]
fn a_missing_rules_block_is_an_error() {
    let result = parse("Triangle A B C\nM = Midpoint({A, B})\n");
    assert!(matches!(
        result,
        Err(Error::Parser(ParserError::Expected(_), _))
    ));
}

#[test]
fn wrong_loose_counts_are_rejected() {
    let result = parse("Triangle A B\nRules:\nMidpoint\n");
    assert!(matches!(
        result,
        Err(Error::Parser(ParserError::WrongLooseCount { .. }, _))
    ));
}

#[test]
fn stray_characters_are_lexer_errors() {
    let result = parse("Triangle A B C\nM = Midpoint({A; B})\nRules:\n");
    assert!(matches!(
        result,
        Err(Error::Parser(ParserError::UnexpectedChar(';'), _))
    ));
}

#[test]
fn template_files_parse_into_numbered_blocks() {
    let text = "1.\n\
                LineSegment X Y\n\
                Z = Midpoint({X, Y})\n\
                Theorem: EqualLineSegments(X-Z, Y-Z)\n\
                \n\
                2.\n\
                ExplicitLineAndPoint l P\n\
                F = PerpendicularProjection(P, l)\n\
                Theorem: PerpendicularLines([P, F], l)\n";
    let templates = parse_templates(Cursor::new(text), "basics.txt").unwrap();
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].number, 1);
    assert_eq!(templates[0].file, "basics.txt");
    assert_eq!(templates[0].theorem.kind, TheoremKind::EqualLineSegments);
    assert_eq!(templates[1].number, 2);
    assert_eq!(templates[1].theorem.kind, TheoremKind::PerpendicularLines);
    assert_eq!(
        templates[1].configuration.layout(),
        Layout::ExplicitLineAndPoint
    );
}

#[test]
fn theorem_objects_cover_every_syntactic_form() {
    let text = "1.\n\
                Triangle A B C\n\
                M = Midpoint({A, B})\n\
                m = InternalAngleBisector(C, {A, B})\n\
                Theorem: EqualAngles(Angle(m, [C, A]), Angle(m, [C, B]))\n";
    let templates = parse_templates(Cursor::new(text), "angles.txt").unwrap();
    assert_eq!(templates[0].theorem.kind, TheoremKind::EqualAngles);
    assert_eq!(templates[0].theorem.objects.len(), 2);
}

#[test]
fn a_block_without_a_theorem_is_rejected() {
    let text = "1.\nTriangle A B C\nM = Midpoint({A, B})\n";
    match parse_templates(Cursor::new(text), "broken.txt") {
        Err(Error::Template { file, inner }) => {
            assert_eq!(file, "broken.txt");
            assert!(matches!(
                *inner,
                Error::Parser(ParserError::MissingTheorem, _)
            ));
        }
        other => panic!("expected a template error, got {:?}", other),
    }
}

#[test]
fn construction_names_are_known_to_the_registry() {
    for ty in ConstructionType::ALL {
        assert_eq!(ConstructionType::from_name(ty.name()), Some(ty));
    }
    assert_eq!(ConstructionType::from_name("Barycenter"), None);
}
