use super::lexer::{Line, Scanner};
use super::token::Token;
use crate::utils::parse_price;
use crate::{Decimal, Error, ErrorLevel, ErrorType, Source, SrcLabel};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A candidate line item recognized from one line of scanned receipt text.
/// Accepted drafts carry a non-empty name and a positive price; the ledger
/// turns them into [`LineItem`](crate::LineItem)s.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub price: Decimal,
    pub src: Source,
}

/// Best-effort parser for recognized receipt text.
///
/// Each line is examined for the first price-shaped substring; the rest of
/// the line becomes the item name. Lines without a usable name and positive
/// price are dropped with an `Info` diagnostic. Tax, subtotal, and total
/// lines receive no special handling.
pub struct ReceiptParser<'source> {
    scanner: Scanner<'source, Token>,
}

impl<'source> ReceiptParser<'source> {
    /// Parses a block of recognized text into candidate line items.
    ///
    /// Returns the accepted drafts in input order together with the
    /// diagnostics for the discarded lines. Never fails: unparseable input
    /// produces an empty draft list.
    pub fn parse(text: &'source str, label: &str) -> (Vec<ItemDraft>, Vec<Error>) {
        let label: SrcLabel = Arc::new(label.to_string());
        let mut parser = ReceiptParser {
            scanner: Scanner::new(text, label),
        };
        parser.run()
    }

    fn run(&mut self) -> (Vec<ItemDraft>, Vec<Error>) {
        let mut drafts = vec![];
        let mut errors = vec![];
        while let Some(line) = self.scanner.next_line() {
            if line.text.trim().is_empty() {
                continue;
            }
            let src = self.scanner.source_for(&line);
            if let Some(draft) = Self::parse_line(&line, src, &mut errors) {
                drafts.push(draft);
            }
        }
        (drafts, errors)
    }

    fn parse_line(line: &Line, src: Source, errors: &mut Vec<Error>) -> Option<ItemDraft> {
        let span = match line.price {
            Some(span) => span,
            None => {
                errors.push(Error {
                    msg: "Ignored line: no price found.".to_string(),
                    src,
                    r#type: ErrorType::Price,
                    level: ErrorLevel::Info,
                });
                return None;
            }
        };
        let price = parse_price(span.text, &src, errors)?;
        if price <= Decimal::ZERO {
            errors.push(Error {
                msg: format!("Ignored line: price {} is not positive.", price),
                src,
                r#type: ErrorType::Price,
                level: ErrorLevel::Info,
            });
            return None;
        }
        let mut name = String::with_capacity(line.text.len());
        name.push_str(&line.text[..span.start]);
        name.push_str(&line.text[span.end..]);
        let name = name.trim();
        if name.is_empty() {
            errors.push(Error {
                msg: "Ignored line: price without an item name.".to_string(),
                src,
                r#type: ErrorType::Name,
                level: ErrorLevel::Info,
            });
            return None;
        }
        Some(ItemDraft {
            name: name.to_string(),
            price,
            src,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn parse(text: &str) -> (Vec<ItemDraft>, Vec<Error>) {
        ReceiptParser::parse(text, "receipt")
    }

    #[test]
    fn accepts_dollar_and_bare_prices() {
        let (drafts, errors) = parse("Coffee $4.50\nBagel 3.25\nSUBTOTAL");
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name, "Coffee");
        assert_eq!(drafts[0].price, dec("4.50"));
        assert_eq!(drafts[1].name, "Bagel");
        assert_eq!(drafts[1].price, dec("3.25"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].r#type, ErrorType::Price);
        assert_eq!(errors[0].level, ErrorLevel::Info);
    }

    #[test]
    fn drafts_carry_line_provenance() {
        let (drafts, _) = parse("Coffee $4.50\nBagel 3.25");
        assert_eq!(drafts[0].src.start.line, 1);
        assert_eq!(drafts[1].src.start.line, 2);
        assert_eq!(drafts[1].src.label.as_str(), "receipt");
    }

    #[test]
    fn blank_lines_are_skipped_silently() {
        let (drafts, errors) = parse("\n   \n\nCoffee $4.50\n\n");
        assert_eq!(drafts.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn priced_line_without_a_name_is_dropped() {
        let (drafts, errors) = parse("$4.50");
        assert!(drafts.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].r#type, ErrorType::Name);
    }

    #[test]
    fn zero_price_is_dropped() {
        let (drafts, errors) = parse("Freebie 0.00");
        assert!(drafts.is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].r#type, ErrorType::Price);
    }

    #[test]
    fn first_price_on_the_line_wins() {
        let (drafts, _) = parse("Combo 5.00 10.00");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].price, dec("5.00"));
        assert_eq!(drafts[0].name, "Combo  10.00");
    }

    #[test]
    fn price_glued_to_the_name_is_found() {
        let (drafts, _) = parse("Latte$4.50");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Latte");
        assert_eq!(drafts[0].price, dec("4.50"));
    }

    #[test]
    fn long_mantissa_is_cut_at_two_decimals() {
        let (drafts, _) = parse("Weighed 1234.567");
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].price, dec("1234.56"));
        assert_eq!(drafts[0].name, "Weighed 7");
    }

    #[test]
    fn all_noise_input_yields_empty_result() {
        let (drafts, errors) = parse("RECEIPT\n====\nTHANK YOU");
        assert!(drafts.is_empty());
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.level == ErrorLevel::Info));
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let (drafts, errors) = parse("");
        assert!(drafts.is_empty());
        assert!(errors.is_empty());
    }
}
