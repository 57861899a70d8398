pub mod parser;

pub use parser::{
    format_piece, format_square, format_uci_move, parse_uci_message, parse_uci_move, UciMessage,
};

#[derive(Debug, thiserror::Error)]
pub enum UciError {
    #[error("Malformed UCI message: {0}")]
    MalformedMessage(String),
    #[error("Unhandled UCI message: {0}")]
    UnhandledMessage(String),
    #[error("Invalid move: {0}")]
    InvalidMove(String),
    #[error("Invalid square: {0}")]
    InvalidSquare(String),
    #[error("Invalid promotion: {0}")]
    InvalidPromotion(String),
}
