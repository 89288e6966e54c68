use super::Token;
use crate::{Source, SrcLabel};
use logos::{Lexer as LogosLexer, Logos};

/// The first price token found on a line. Offsets are bytes relative to the
/// start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSpan<'source> {
    pub text: &'source str,
    pub start: usize,
    pub end: usize,
}

/// One physical line of recognized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'source> {
    /// The full line, untrimmed, without its newline.
    pub text: &'source str,
    /// 1-based line number.
    pub number: usize,
    pub price: Option<PriceSpan<'source>>,
}

/// Walks the token stream of a block of recognized text and regroups it
/// into per-line records, keeping the span of the first price token on each
/// line.
///
/// Generic over the token type so a locale-specific token set can be
/// substituted without touching the line bookkeeping.
pub struct Scanner<'source, Token: Logos<'source>> {
    llex: LogosLexer<'source, Token>,
    src: &'source str,
    label: SrcLabel,
    line: usize,
    line_start: usize,
    done: bool,
}

impl<'source> Scanner<'source, Token> {
    pub fn new(src: &'source str, label: SrcLabel) -> Self {
        Scanner {
            llex: Token::lexer(src),
            src,
            label,
            line: 1,
            line_start: 0,
            done: false,
        }
    }

    pub fn label(&self) -> &SrcLabel {
        &self.label
    }

    /// Returns the next physical line, or `None` at the end of input.
    pub fn next_line(&mut self) -> Option<Line<'source>> {
        if self.done {
            return None;
        }
        let mut price = None;
        loop {
            match self.llex.next() {
                Some(Token::NewLine) => {
                    let span = self.llex.span();
                    let line = self.line_record(span.start, price);
                    self.line_start = span.end;
                    self.line += 1;
                    return Some(line);
                }
                Some(Token::Price) => {
                    if price.is_none() {
                        let span = self.llex.span();
                        price = Some(PriceSpan {
                            text: self.llex.slice(),
                            start: span.start - self.line_start,
                            end: span.end - self.line_start,
                        });
                    }
                }
                Some(_) => {}
                None => {
                    self.done = true;
                    if self.line_start < self.src.len() {
                        return Some(self.line_record(self.src.len(), price));
                    }
                    return None;
                }
            }
        }
    }

    /// Returns the origin of `line` within the scanned text.
    pub fn source_for(&self, line: &Line) -> Source {
        Source {
            label: self.label.clone(),
            start: (line.number, 1).into(),
            end: (line.number, line.text.chars().count() + 1).into(),
        }
    }

    fn line_record(&self, end: usize, price: Option<PriceSpan<'source>>) -> Line<'source> {
        Line {
            text: &self.src[self.line_start..end],
            number: self.line,
            price,
        }
    }
}
