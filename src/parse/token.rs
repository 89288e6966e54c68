use logos::Logos;

/// Tokens of a block of recognized receipt text.
///
/// The `Price` rules form an ordered, prioritized list; adding a
/// locale-specific currency format means adding a rule here. The
/// single-character `Text` fallback keeps the scanner moving one character
/// at a time between matches, so a price is found wherever it starts on a
/// line, glued to other text or not.
#[derive(Debug, PartialEq, Logos, Clone, Copy)]
pub enum Token {
    #[regex(r"[ \f\r\t\v]+", priority = 3)]
    WhiteSpace,

    #[token("\n")]
    NewLine,

    #[regex(r"\$\d+\.\d\d", priority = 6)]
    #[regex(r"\d+\.\d\d", priority = 6)]
    Price,

    #[regex(r".", priority = 1)]
    Text,

    #[error]
    Error,
}
