#![deny(clippy::self_named_module_files)]
#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::from_iter_instead_of_collect)]
#![warn(clippy::get_unwrap)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::inconsistent_struct_constructor)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::manual_assert)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::str_to_string)]
#![warn(clippy::unnested_or_patterns)]

//! An automated generator and analyzer of Euclidean geometry theorems.
//!
//! Starting from a small configuration of geometric primitives and a
//! catalogue of allowed constructions, the generator enumerates every
//! configuration reachable within a bounded number of construction steps,
//! verifies analytically which theorems hold in each, and filters out those
//! that are trivial, template instances, definable in a simpler
//! configuration, or implied by transitivity.

pub mod analytic;
pub mod analyzer;
pub mod ast;
pub mod generator;
pub mod parser;
pub mod picture;
pub mod runner;

use parser::{ParserError, Position};
use std::io;
use std::time::Duration;
use thiserror::Error;

pub type GeogenResult<T> = Result<T, Error>;

/// The options that control a generation run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// How many construction steps the generator may take.
    pub iterations: usize,

    /// How many randomized pictures realize each configuration. At least two
    /// pictures are required; constructability and duplicate detection are
    /// defined by cross-picture agreement.
    pub pictures: usize,

    /// How many times a configuration's picture set is rebuilt after an
    /// analytic failure or a cross-picture inconsistency before the
    /// configuration is skipped.
    pub retries: usize,

    /// Size of the worker pool analyzing configurations. One worker,
    /// together with a fixed seed, makes runs byte-for-byte reproducible.
    pub workers: usize,

    /// Seed for picture randomness; a fresh random seed is drawn when absent.
    pub seed: Option<u64>,

    /// Soft wall-clock budget per configuration; configurations exceeding it
    /// are skipped without aborting the run.
    pub timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            iterations: 3,
            pictures: 5,
            retries: 5,
            workers: std::thread::available_parallelism().map_or(1, usize::from),
            seed: None,
            timeout: Duration::from_secs(10),
        }
    }
}

impl RunOptions {
    /// Checks the hard preconditions of the analyzer.
    pub fn validate(&self) -> GeogenResult<()> {
        if self.pictures < 2 {
            return Err(Error::BadOptions(
                "at least two pictures are required".to_owned(),
            ));
        }
        if self.workers == 0 {
            return Err(Error::BadOptions("at least one worker is required".to_owned()));
        }
        Ok(())
    }
}

fn format_parser_error(e: &ParserError, pos: &Position) -> String {
    format!("parse error: {} (on line {}, column {})", e, pos.0, pos.1)
}

/// The error type for the generator pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{}", format_parser_error(.0, .1))]
    Parser(ParserError, Position),

    #[error("template file '{file}': {inner}")]
    Template {
        file: String,
        #[source]
        inner: Box<Error>,
    },

    #[error("signature mismatch: {0}")]
    Signature(#[from] ast::SignatureError),

    #[error("invalid options: {0}")]
    BadOptions(String),

    #[error("the initial configuration could not be realized: {0}")]
    InitialConfiguration(String),
}
