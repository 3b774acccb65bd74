//! The plain-text report writer.
//!
//! One report per input: the initial configuration block, the run settings,
//! then a numbered section per generated configuration, separated by a
//! 48-character rule. Theorem lines carry their classification annotation
//! when the filters matched one.

use crate::analyzer::filters::ClassifiedTheorem;
use crate::ast::Theorem;
use crate::generator::GeneratedConfiguration;
use crate::parser::GeneratorInput;
use crate::RunOptions;
use std::io::{self, Write};

const RULE_WIDTH: usize = 48;

pub(super) struct Report<'a, W> {
    dest: &'a mut W,
}

impl<'a, W: Write> Report<'a, W> {
    pub fn new(dest: &'a mut W) -> Report<'a, W> {
        Report { dest }
    }

    pub fn write_header(
        &mut self,
        input: &GeneratorInput,
        options: &RunOptions,
        initial_theorems: &[Theorem],
    ) -> io::Result<()> {
        writeln!(self.dest, "Initial configuration:")?;
        writeln!(self.dest)?;
        writeln!(self.dest, "{}", input.configuration)?;
        writeln!(self.dest)?;
        writeln!(self.dest, "Theorems:")?;
        writeln!(self.dest)?;
        if initial_theorems.is_empty() {
            writeln!(self.dest, " (none)")?;
        }
        for (i, theorem) in initial_theorems.iter().enumerate() {
            writeln!(
                self.dest,
                " {}. {}",
                i + 1,
                theorem.display(&input.configuration)
            )?;
        }
        writeln!(self.dest)?;
        writeln!(self.dest, "Iterations: {}", options.iterations)?;
        writeln!(self.dest, "Pictures: {}", options.pictures)?;
        let constructions: Vec<&str> = input.rules.iter().map(|c| c.name()).collect();
        writeln!(self.dest, "Constructions: {}", constructions.join(", "))?;
        Ok(())
    }

    pub fn write_block(
        &mut self,
        number: usize,
        item: &GeneratedConfiguration,
        theorems: &[ClassifiedTheorem],
    ) -> io::Result<()> {
        writeln!(self.dest)?;
        writeln!(self.dest, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.dest)?;
        writeln!(self.dest, "Configuration {} (iteration {}):", number, item.iteration)?;
        writeln!(self.dest)?;
        writeln!(self.dest, "{}", item.configuration)?;
        writeln!(self.dest)?;
        writeln!(self.dest, "Theorems:")?;
        writeln!(self.dest)?;
        if theorems.is_empty() {
            writeln!(self.dest, " (none)")?;
        }
        for (i, classified) in theorems.iter().enumerate() {
            let formatted = classified.theorem.display(&item.configuration);
            match &classified.classification {
                Some(classification) => writeln!(
                    self.dest,
                    " {}. {} - {}",
                    i + 1,
                    formatted,
                    classification.annotation(&item.configuration)
                )?,
                None => writeln!(self.dest, " {}. {}", i + 1, formatted)?,
            }
        }
        Ok(())
    }

    pub fn finish(&mut self) -> io::Result<()> {
        self.dest.flush()
    }
}
