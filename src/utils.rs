//! Useful functions for parsing receipt text.

use crate::{Decimal, Error, ErrorLevel, ErrorType, Source};

/// Parses a [`Decimal`](crate::Decimal) price from a matched price token,
/// stripping the leading currency sign, and pushes the error into `errors`
/// on failure.
pub fn parse_price(text: &str, src: &Source, errors: &mut Vec<Error>) -> Option<Decimal> {
    match text.trim_start_matches('$').parse::<Decimal>() {
        Ok(price) => Some(price),
        Err(_) => {
            errors.push(Error {
                msg: "Invalid price.".to_string(),
                src: src.clone(),
                r#type: ErrorType::Price,
                level: ErrorLevel::Error,
            });
            None
        }
    }
}
