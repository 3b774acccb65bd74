//! The types for parser errors.

use crate::ast::{ObjectType, SignatureError};
use crate::parser::Token;
use thiserror::Error;

/// The error type for the input and template parsers.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The lexer encountered an unexpected character.
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),

    /// The lexer encountered a numeral too large to represent.
    #[error("invalid numeral: '{0}'")]
    InvalidNumeral(String),

    /// The parser encountered an unexpected token.
    #[error("unexpected token: '{0}'")]
    UnexpectedToken(Token),

    /// The parser expected a construct that was not there.
    #[error("expected {0}")]
    Expected(&'static str),

    /// The layout declaration names an unknown layout.
    #[error("unknown layout: '{0}'")]
    UnknownLayout(String),

    /// The layout declaration has the wrong number of loose identifiers.
    #[error("layout {layout} needs {expected} loose objects, got {got}")]
    WrongLooseCount {
        layout: &'static str,
        expected: usize,
        got: usize,
    },

    /// A construction name is not in the predefined catalogue.
    #[error("unknown construction: '{0}'")]
    UnknownConstruction(String),

    /// A theorem declaration names an unknown theorem type.
    #[error("unknown theorem type: '{0}'")]
    UnknownTheoremKind(String),

    /// An identifier was used before being declared.
    #[error("identifier '{0}' is not defined")]
    UndefinedIden(String),

    /// An identifier was declared twice.
    #[error("identifier '{0}' is declared twice")]
    RepeatedIden(String),

    /// An identifier names an object of the wrong type.
    #[error("'{0}' does not name a {1}")]
    WrongIdenType(String, ObjectType),

    /// The arguments of a constructed object do not match the construction's
    /// signature.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// A template block ended without a theorem declaration.
    #[error("template block is missing a theorem declaration")]
    MissingTheorem,
}
