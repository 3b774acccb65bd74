//! Parsers for generator input files and template theorem files.
//!
//! Both formats are line-oriented: a layout declaration, one line per
//! constructed object (`M = Midpoint({A, B})`), and either a `Rules:` block
//! (inputs) or a `Theorem:` declaration (templates). `#` starts a comment.

mod error;
mod lexer;
#[cfg(test)]
mod tests;

pub use error::ParserError;
pub use lexer::{Lexer, Position, Token};

use crate::ast::{
    Argument, Configuration, Construction, ConstructionType, Layout, ObjectId, ObjectType,
    Theorem, TheoremKind, TheoremObject,
};
use crate::{Error, GeogenResult};
use std::io::BufRead;

/// A parsed generator input: the initial configuration and the constructions
/// allowed during generation.
#[derive(Debug)]
pub struct GeneratorInput {
    pub configuration: Configuration,
    pub rules: Vec<Construction>,
}

/// One template theorem: a configuration together with a theorem that holds
/// in it. Discovered theorems matching a template are classified as
/// sub-theorems.
#[derive(Debug)]
pub struct TemplateTheorem {
    pub number: usize,
    pub file: String,
    pub configuration: Configuration,
    pub theorem: Theorem,
}

/// Parses a generator input file.
pub fn parse_input<R: BufRead>(input: R) -> GeogenResult<GeneratorInput> {
    let mut parser = Parser::new(input)?;
    parser.skip_newlines()?;
    let mut configuration = parser.parse_layout_line()?;
    loop {
        parser.skip_newlines()?;
        let (token, position) = parser.next_token()?;
        match token {
            Token::Symbol(s) if s == "Rules" && parser.current_token == Token::Colon => {
                parser.next_token()?;
                let rules = parser.parse_rules()?;
                return Ok(GeneratorInput { configuration, rules });
            }
            Token::Symbol(name) => {
                configuration = parser.parse_constructed_line(configuration, name)?;
            }
            Token::Eof => {
                return Err(Error::Parser(ParserError::Expected("a 'Rules:' block"), position))
            }
            t => return Err(Error::Parser(ParserError::UnexpectedToken(t), position)),
        }
    }
}

/// Parses a template theorem file: a sequence of numbered blocks, each a
/// generator input followed by a theorem declaration. Errors are wrapped
/// with the file name, since template problems abort startup.
pub fn parse_templates<R: BufRead>(input: R, file_name: &str) -> GeogenResult<Vec<TemplateTheorem>> {
    parse_template_blocks(input, file_name).map_err(|inner| Error::Template {
        file: file_name.to_owned(),
        inner: Box::new(inner),
    })
}

fn parse_template_blocks<R: BufRead>(
    input: R,
    file_name: &str,
) -> GeogenResult<Vec<TemplateTheorem>> {
    let mut parser = Parser::new(input)?;
    let mut templates = Vec::new();
    loop {
        parser.skip_newlines()?;
        if parser.current_token == Token::Eof {
            return Ok(templates);
        }
        let number = match parser.next_token()? {
            (Token::Numeral(n), _) => n,
            (t, position) => return Err(Error::Parser(ParserError::UnexpectedToken(t), position)),
        };
        parser.expect(Token::Dot)?;
        parser.skip_newlines()?;
        let mut configuration = parser.parse_layout_line()?;
        let theorem = loop {
            parser.skip_newlines()?;
            let (token, position) = parser.next_token()?;
            match token {
                Token::Symbol(s) if s == "Theorem" && parser.current_token == Token::Colon => {
                    parser.next_token()?;
                    break parser.parse_theorem(&configuration)?;
                }
                Token::Symbol(name) => {
                    configuration = parser.parse_constructed_line(configuration, name)?;
                }
                Token::Eof => return Err(Error::Parser(ParserError::MissingTheorem, position)),
                t => return Err(Error::Parser(ParserError::UnexpectedToken(t), position)),
            }
        };
        templates.push(TemplateTheorem {
            number,
            file: file_name.to_owned(),
            configuration,
            theorem,
        });
    }
}

/// A parser for the generator formats.
pub struct Parser<R> {
    lexer: Lexer<R>,
    current_token: Token,
    current_position: Position,
}

impl<R: BufRead> Parser<R> {
    /// Constructs a new `Parser` from a type that implements `BufRead`.
    pub fn new(input: R) -> GeogenResult<Self> {
        let mut lexer = Lexer::new(input)?;
        let (current_token, current_position) = lexer.next_token()?;
        Ok(Parser { lexer, current_token, current_position })
    }

    /// Advances the parser one token, and returns the previous one.
    fn next_token(&mut self) -> GeogenResult<(Token, Position)> {
        let (token, position) = self.lexer.next_token()?;
        let previous = (
            std::mem::replace(&mut self.current_token, token),
            std::mem::replace(&mut self.current_position, position),
        );
        Ok(previous)
    }

    fn error(&self, err: ParserError) -> Error {
        Error::Parser(err, self.current_position)
    }

    fn expect(&mut self, expected: Token) -> GeogenResult<()> {
        if self.current_token == expected {
            self.next_token()?;
            Ok(())
        } else {
            Err(self.error(ParserError::UnexpectedToken(self.current_token.clone())))
        }
    }

    fn expect_symbol(&mut self) -> GeogenResult<String> {
        match self.next_token()? {
            (Token::Symbol(s), _) => Ok(s),
            (t, position) => Err(Error::Parser(ParserError::UnexpectedToken(t), position)),
        }
    }

    fn expect_end_of_line(&mut self) -> GeogenResult<()> {
        match &self.current_token {
            Token::Newline => {
                self.next_token()?;
                Ok(())
            }
            Token::Eof => Ok(()),
            t => Err(self.error(ParserError::UnexpectedToken(t.clone()))),
        }
    }

    fn skip_newlines(&mut self) -> GeogenResult<()> {
        while self.current_token == Token::Newline {
            self.next_token()?;
        }
        Ok(())
    }

    fn resolve(&self, config: &Configuration, name: &str) -> GeogenResult<ObjectId> {
        config
            .id_by_name(name)
            .ok_or_else(|| self.error(ParserError::UndefinedIden(name.to_owned())))
    }

    fn resolve_typed(
        &self,
        config: &Configuration,
        name: &str,
        ty: ObjectType,
    ) -> GeogenResult<ObjectId> {
        let id = self.resolve(config, name)?;
        if config.ty(id) != ty {
            return Err(self.error(ParserError::WrongIdenType(name.to_owned(), ty)));
        }
        Ok(id)
    }

    /// Parses the layout declaration: the layout name followed by the loose
    /// object identifiers.
    fn parse_layout_line(&mut self) -> GeogenResult<Configuration> {
        let name = self.expect_symbol()?;
        let layout = Layout::from_name(&name)
            .ok_or_else(|| self.error(ParserError::UnknownLayout(name)))?;
        let mut names: Vec<String> = Vec::new();
        while let Token::Symbol(_) = self.current_token {
            let iden = self.expect_symbol()?;
            if names.contains(&iden) {
                return Err(self.error(ParserError::RepeatedIden(iden)));
            }
            names.push(iden);
        }
        self.expect_end_of_line()?;
        let expected = layout.loose_types().len();
        if names.len() != expected {
            return Err(self.error(ParserError::WrongLooseCount {
                layout: layout.name(),
                expected,
                got: names.len(),
            }));
        }
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        Ok(Configuration::new(layout, &names))
    }

    /// Parses one constructed-object line after its leading identifier:
    /// `= Construction(arg, {a, b})[index]`.
    fn parse_constructed_line(
        &mut self,
        config: Configuration,
        name: String,
    ) -> GeogenResult<Configuration> {
        if config.id_by_name(&name).is_some() {
            return Err(self.error(ParserError::RepeatedIden(name)));
        }
        self.expect(Token::Equals)?;
        let construction_name = self.expect_symbol()?;
        let construction = ConstructionType::from_name(&construction_name)
            .ok_or_else(|| self.error(ParserError::UnknownConstruction(construction_name)))?;
        self.expect(Token::OpenParen)?;
        let mut args = Vec::new();
        if self.current_token != Token::CloseParen {
            loop {
                args.push(self.parse_argument(&config)?);
                if self.current_token != Token::Comma {
                    break;
                }
                self.next_token()?;
            }
        }
        self.expect(Token::CloseParen)?;
        let output_index = if self.current_token == Token::OpenBracket {
            self.next_token()?;
            let index = match self.next_token()? {
                (Token::Numeral(n), _) => n,
                (t, position) => {
                    return Err(Error::Parser(ParserError::UnexpectedToken(t), position))
                }
            };
            self.expect(Token::CloseBracket)?;
            index
        } else {
            0
        };
        self.expect_end_of_line()?;
        config
            .extended(Construction::Predefined(construction), args, output_index, name)
            .map_err(|e| self.error(ParserError::Signature(e)))
    }

    fn parse_argument(&mut self, config: &Configuration) -> GeogenResult<Argument> {
        match self.next_token()? {
            (Token::Symbol(name), _) => Ok(Argument::Object(self.resolve(config, &name)?)),
            (Token::OpenBrace, _) => {
                let mut elements = Vec::new();
                if self.current_token != Token::CloseBrace {
                    loop {
                        elements.push(self.parse_argument(config)?);
                        if self.current_token != Token::Comma {
                            break;
                        }
                        self.next_token()?;
                    }
                }
                self.expect(Token::CloseBrace)?;
                Ok(Argument::Set(elements))
            }
            (t, position) => Err(Error::Parser(ParserError::UnexpectedToken(t), position)),
        }
    }

    /// Parses the rules block: one construction name per line.
    fn parse_rules(&mut self) -> GeogenResult<Vec<Construction>> {
        let mut rules: Vec<Construction> = Vec::new();
        loop {
            self.skip_newlines()?;
            match &self.current_token {
                Token::Eof => return Ok(rules),
                Token::Symbol(_) => {
                    let name = self.expect_symbol()?;
                    let construction = ConstructionType::from_name(&name)
                        .ok_or_else(|| self.error(ParserError::UnknownConstruction(name)))?;
                    let construction = Construction::Predefined(construction);
                    if !rules.contains(&construction) {
                        rules.push(construction);
                    }
                }
                t => return Err(self.error(ParserError::UnexpectedToken(t.clone()))),
            }
        }
    }

    /// Parses a theorem declaration after the `Theorem:` keyword.
    fn parse_theorem(&mut self, config: &Configuration) -> GeogenResult<Theorem> {
        let kind_name = self.expect_symbol()?;
        let kind = TheoremKind::from_name(&kind_name)
            .ok_or_else(|| self.error(ParserError::UnknownTheoremKind(kind_name)))?;
        self.expect(Token::OpenParen)?;
        let mut objects = Vec::new();
        loop {
            objects.push(self.parse_theorem_object(config)?);
            if self.current_token != Token::Comma {
                break;
            }
            self.next_token()?;
        }
        self.expect(Token::CloseParen)?;
        self.expect_end_of_line()?;
        Ok(Theorem::new(kind, objects))
    }

    /// Parses one theorem object: `A` (an object by name), `[A, B]` (a line
    /// by two points), `(A, B, C)` (a circle by three points), `A-B` (a
    /// segment) or `Angle(l, m)` (an angle between two lines).
    fn parse_theorem_object(&mut self, config: &Configuration) -> GeogenResult<TheoremObject> {
        match self.next_token()? {
            (Token::OpenBracket, _) => self.parse_line_by_points(config),
            (Token::OpenParen, _) => {
                let a = self.parse_point(config)?;
                self.expect(Token::Comma)?;
                let b = self.parse_point(config)?;
                self.expect(Token::Comma)?;
                let c = self.parse_point(config)?;
                self.expect(Token::CloseParen)?;
                Ok(TheoremObject::circle_by_points(a, b, c))
            }
            (Token::Symbol(s), _) if s == "Angle" && self.current_token == Token::OpenParen => {
                self.next_token()?;
                let l1 = self.parse_line_entity(config)?;
                self.expect(Token::Comma)?;
                let l2 = self.parse_line_entity(config)?;
                self.expect(Token::CloseParen)?;
                Ok(TheoremObject::angle(l1, l2))
            }
            (Token::Symbol(name), _) => {
                if self.current_token == Token::Dash {
                    self.next_token()?;
                    let a = self.resolve_typed(config, &name, ObjectType::Point)?;
                    let b = self.parse_point(config)?;
                    return Ok(TheoremObject::segment(a, b));
                }
                let id = self.resolve(config, &name)?;
                Ok(match config.ty(id) {
                    ObjectType::Point => TheoremObject::Point(id),
                    ObjectType::Line => TheoremObject::Line(id),
                    ObjectType::Circle => TheoremObject::Circle(id),
                })
            }
            (t, position) => Err(Error::Parser(ParserError::UnexpectedToken(t), position)),
        }
    }

    fn parse_line_by_points(&mut self, config: &Configuration) -> GeogenResult<TheoremObject> {
        let a = self.parse_point(config)?;
        self.expect(Token::Comma)?;
        let b = self.parse_point(config)?;
        self.expect(Token::CloseBracket)?;
        Ok(TheoremObject::line_by_points(a, b))
    }

    /// Parses a line-valued theorem object: a line by name or `[A, B]`.
    fn parse_line_entity(&mut self, config: &Configuration) -> GeogenResult<TheoremObject> {
        match self.next_token()? {
            (Token::OpenBracket, _) => self.parse_line_by_points(config),
            (Token::Symbol(name), _) => {
                let id = self.resolve_typed(config, &name, ObjectType::Line)?;
                Ok(TheoremObject::Line(id))
            }
            (t, position) => Err(Error::Parser(ParserError::UnexpectedToken(t), position)),
        }
    }

    fn parse_point(&mut self, config: &Configuration) -> GeogenResult<ObjectId> {
        let name = self.expect_symbol()?;
        self.resolve_typed(config, &name, ObjectType::Point)
    }
}
