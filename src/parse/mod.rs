mod lexer;
mod parser;
mod token;

pub use lexer::{Line, PriceSpan, Scanner};
pub use parser::*;
pub use token::Token;
