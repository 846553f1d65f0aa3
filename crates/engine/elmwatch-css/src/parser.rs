//! Selector parser
//!
//! Hand-written recursive descent over the selector grammar used by
//! `querySelector`: selector lists, complex selectors with the four
//! combinators, compound selectors and the supported pseudo-classes.

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorList,
};
use crate::SelectorError;

/// Selector parser
pub struct SelectorParser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Parse the whole input as a selector list
    pub fn parse(mut self) -> Result<SelectorList, SelectorError> {
        if self.input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let list = self.parse_list(None)?;
        if self.pos < self.chars.len() {
            return Err(self.unexpected());
        }
        Ok(list)
    }

    fn parse_list(&mut self, close: Option<char>) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex(close)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                None if close.is_none() => break,
                Some(c) if Some(c) == close => break,
                _ => return Err(self.unexpected()),
            }
        }
        Ok(SelectorList { selectors })
    }

    fn parse_complex(&mut self, close: Option<char>) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some(c) if Some(c) == close => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }

            match self.peek() {
                None | Some(',') => {
                    return Err(SelectorError::DanglingCombinator(self.input.to_string()));
                }
                Some(c) if Some(c) == close => {
                    return Err(SelectorError::DanglingCombinator(self.input.to_string()));
                }
                _ => {}
            }

            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let start = self.pos;
        let mut compound = CompoundSelector::default();

        match self.peek() {
            Some('*') => self.pos += 1,
            Some(c) if is_ident_start(c) => {
                compound.tag = Some(self.parse_ident()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.parse_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.parse_ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attributes.push(self.parse_attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.pseudo_classes.push(self.parse_pseudo_class()?);
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(compound)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector {
                name,
                matcher: None,
                case_insensitive: false,
            });
        }

        let op = match self.peek() {
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                Some(c)
            }
            _ => return Err(self.unexpected()),
        };
        if !self.eat('=') {
            return Err(self.unexpected());
        }
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                self.parse_string(quote)?
            }
            _ => self.parse_ident()?,
        };
        self.skip_whitespace();

        let mut case_insensitive = false;
        match self.peek() {
            Some('i' | 'I') => {
                self.pos += 1;
                case_insensitive = true;
                self.skip_whitespace();
            }
            Some('s' | 'S') => {
                self.pos += 1;
                self.skip_whitespace();
            }
            _ => {}
        }
        if !self.eat(']') {
            return Err(self.unexpected());
        }

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            Some(_) => AttributeMatcher::Substring(value),
        };

        Ok(AttributeSelector {
            name,
            matcher: Some(matcher),
            case_insensitive,
        })
    }

    fn parse_pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.eat(':') {
            let name = self.parse_ident()?;
            return Err(SelectorError::UnsupportedPseudo(format!(":{name}")));
        }
        let name = self.parse_ident()?.to_ascii_lowercase();

        if self.eat('(') {
            let pseudo = match name.as_str() {
                "not" | "is" | "where" => {
                    let list = self.parse_list(Some(')'))?;
                    match name.as_str() {
                        "not" => PseudoClass::Not(list),
                        "is" => PseudoClass::Is(list),
                        _ => PseudoClass::Where(list),
                    }
                }
                "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                    let arg = self.take_until(')');
                    let expr = NthExpression::parse(&arg)
                        .ok_or_else(|| SelectorError::InvalidNth(arg.trim().to_string()))?;
                    match name.as_str() {
                        "nth-child" => PseudoClass::NthChild(expr),
                        "nth-last-child" => PseudoClass::NthLastChild(expr),
                        "nth-of-type" => PseudoClass::NthOfType(expr),
                        _ => PseudoClass::NthLastOfType(expr),
                    }
                }
                _ => return Err(SelectorError::UnsupportedPseudo(name)),
            };
            self.skip_whitespace();
            if !self.eat(')') {
                return Err(self.unexpected());
            }
            return Ok(pseudo);
        }

        match name.as_str() {
            "root" => Ok(PseudoClass::Root),
            "empty" => Ok(PseudoClass::Empty),
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "first-of-type" => Ok(PseudoClass::FirstOfType),
            "last-of-type" => Ok(PseudoClass::LastOfType),
            "only-of-type" => Ok(PseudoClass::OnlyOfType),
            "scope" => Ok(PseudoClass::Scope),
            _ => Err(SelectorError::UnsupportedPseudo(name)),
        }
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();

        match self.peek() {
            Some('-') => {
                // "-" followed by a digit is not an identifier
                if self.chars.get(self.pos + 1).is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.unexpected());
                }
            }
            Some('\\') => {}
            Some(c) if is_ident_start(c) => {}
            _ => return Err(self.unexpected()),
        }

        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                match self.peek() {
                    Some(escaped) => {
                        out.push(escaped);
                        self.pos += 1;
                    }
                    None => return Err(self.unexpected()),
                }
            } else if is_ident_char(c) {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }

        if out.is_empty() {
            return Err(self.unexpected());
        }
        Ok(out)
    }

    fn parse_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '\\' => match self.peek() {
                    Some(escaped) => {
                        out.push(escaped);
                        self.pos += 1;
                    }
                    None => break,
                },
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        Err(self.unexpected())
    }

    fn take_until(&mut self, end: char) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == end {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> SelectorError {
        SelectorError::UnexpectedToken {
            selector: self.input.to_string(),
            position: self.pos,
            found: self
                .peek()
                .map_or_else(|| "end of input".to_string(), |c| format!("'{c}'")),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}
