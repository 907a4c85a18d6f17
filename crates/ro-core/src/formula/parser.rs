//! Formula parser for R-style model formulas
//!
//! Supported syntax:
//! - Response and terms: `y ~ x1 + x2`
//! - Every other column: `y ~ .`
//! - Intercept control: `y ~ 1` (intercept only), `y ~ 0 + x1`, `y ~ x1 - 1`
//! - Term removal: `y ~ . - carb`

use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::{Formula, Term};
use std::iter::Peekable;
use std::str::Chars;

/// Formula parser
pub struct FormulaParser<'a> {
    chars: Peekable<Chars<'a>>,
    original: String,
    position: usize,
}

/// One signed item on the right-hand side
enum Item {
    Intercept(bool),
    Term(Term),
}

impl<'a> FormulaParser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            original: input.to_string(),
            position: 0,
        }
    }

    /// Parse a formula
    pub fn parse(formula: &str) -> FormulaResult<Formula> {
        let mut parser = FormulaParser::new(formula);
        parser.parse_formula()
    }

    /// Parse the entire formula
    fn parse_formula(&mut self) -> FormulaResult<Formula> {
        self.skip_whitespace();

        if self.chars.peek().is_none() {
            return Err(FormulaError::syntax(self.position, "Empty formula"));
        }

        let response = self.parse_response()?;
        self.parse_tilde()?;
        let (has_intercept, terms, removed) = self.parse_rhs()?;

        self.skip_whitespace();
        if self.chars.peek().is_some() {
            let remaining: String = self.chars.clone().collect();
            return Err(FormulaError::syntax_with_context(
                self.position,
                "Trailing characters after formula",
                format!("Unexpected: '{}'", remaining),
            ));
        }

        Ok(Formula {
            response,
            terms,
            removed,
            has_intercept,
            original: self.original.trim().to_string(),
        })
    }

    /// Parse response variable (left side of ~)
    fn parse_response(&mut self) -> FormulaResult<Option<String>> {
        self.skip_whitespace();

        if self.peek_char() == Some('~') {
            return Ok(None);
        }

        let ident = self.parse_identifier()?;

        self.skip_whitespace();
        if self.peek_char() == Some('~') {
            Ok(Some(ident))
        } else {
            Err(FormulaError::syntax_with_context(
                self.position,
                "Expected '~' after response variable",
                format!("Found '{}' instead", self.peek_char().unwrap_or(' ')),
            ))
        }
    }

    /// Parse right-hand side: signed items separated by '+' or '-'
    fn parse_rhs(&mut self) -> FormulaResult<(bool, Vec<Term>, Vec<String>)> {
        let mut has_intercept = true;
        let mut terms: Vec<Term> = Vec::new();
        let mut removed: Vec<String> = Vec::new();

        self.skip_whitespace();
        if self.chars.peek().is_none() {
            return Err(FormulaError::syntax(
                self.position,
                "Expected terms after '~'",
            ));
        }

        let mut first = true;
        loop {
            self.skip_whitespace();

            let negated = match self.peek_char() {
                Some('+') if !first => {
                    self.advance();
                    false
                }
                Some('-') => {
                    self.advance();
                    true
                }
                None => break,
                Some(c) if !first => {
                    return Err(FormulaError::syntax(
                        self.position,
                        format!("Expected '+' or '-', found '{}'", c),
                    ));
                }
                _ => false,
            };
            first = false;

            self.skip_whitespace();
            let start = self.position;
            match self.parse_item()? {
                Item::Intercept(present) => has_intercept = present != negated,
                Item::Term(term) if negated => match term {
                    Term::Variable(name) => removed.push(name),
                    Term::Dot => {
                        return Err(FormulaError::syntax(start, "Cannot remove '.'"));
                    }
                },
                Item::Term(term) => {
                    if !terms.contains(&term) {
                        terms.push(term);
                    }
                }
            }
        }

        Ok((has_intercept, terms, removed))
    }

    /// Parse a single item: `0`, `1`, `.` or a variable name
    fn parse_item(&mut self) -> FormulaResult<Item> {
        match self.peek_char() {
            Some('0') => {
                self.advance();
                Ok(Item::Intercept(false))
            }
            Some('1') => {
                self.advance();
                Ok(Item::Intercept(true))
            }
            Some('.') => {
                self.advance();
                Ok(Item::Term(Term::Dot))
            }
            Some(c) if c.is_alphabetic() => Ok(Item::Term(Term::Variable(self.parse_identifier()?))),
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Unexpected character '{}' in term", c),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of input, expected term",
            )),
        }
    }

    /// Parse an identifier
    fn parse_identifier(&mut self) -> FormulaResult<String> {
        let mut ident = String::new();
        let start_pos = self.position;

        // First character must be alphabetic
        match self.chars.next() {
            Some(c) if c.is_alphabetic() => {
                self.position += 1;
                ident.push(c);
            }
            Some(c) => {
                return Err(FormulaError::syntax(
                    start_pos,
                    format!("Identifier must start with a letter, found '{}'", c),
                ));
            }
            None => {
                return Err(FormulaError::syntax(
                    start_pos,
                    "Unexpected end of input, expected identifier",
                ));
            }
        }

        // Subsequent characters can be alphanumeric, underscore, or period
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        Ok(ident)
    }

    /// Parse tilde operator
    fn parse_tilde(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();

        match self.chars.next() {
            Some('~') => {
                self.position += 1;
                Ok(())
            }
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Expected '~', found '{}'", c),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of formula, expected '~'",
            )),
        }
    }

    fn advance(&mut self) {
        if self.chars.next().is_some() {
            self.position += 1;
        }
    }

    /// Skip whitespace
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Peek at next character
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}
