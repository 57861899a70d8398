use cozy_chess::{File, Move, Piece, Rank, Square};

/// Incoming message from the worker. Only the handshake acknowledgements and
/// the search result are modeled; every other line the process emits is
/// surfaced as [`crate::UciError::UnhandledMessage`] and dropped by the
/// reader.
#[derive(Debug, Clone)]
pub enum UciMessage {
    UciOk,
    ReadyOk,
    BestMove(Move),
}

/// Parse one line of worker output.
pub fn parse_uci_message(line: &str) -> Result<UciMessage, crate::UciError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.first() {
        Some(&"uciok") => Ok(UciMessage::UciOk),
        Some(&"readyok") => Ok(UciMessage::ReadyOk),

        // The move token is the second whitespace-separated field; trailing
        // fields ("ponder ...") are not interpreted.
        Some(&"bestmove") => {
            if tokens.len() < 2 {
                return Err(crate::UciError::MalformedMessage(line.to_string()));
            }
            Ok(UciMessage::BestMove(parse_uci_move(tokens[1])?))
        }

        _ => Err(crate::UciError::UnhandledMessage(line.to_string())),
    }
}

/// Parse UCI move format (e2e4, e7e8q)
pub fn parse_uci_move(s: &str) -> Result<Move, crate::UciError> {
    if s.len() != 4 && s.len() != 5 {
        return Err(crate::UciError::InvalidMove(s.to_string()));
    }

    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;

    let promotion = if s.len() == 5 {
        Some(match &s[4..5] {
            "q" => Piece::Queen,
            "r" => Piece::Rook,
            "b" => Piece::Bishop,
            "n" => Piece::Knight,
            _ => return Err(crate::UciError::InvalidPromotion(s.to_string())),
        })
    } else {
        None
    };

    Ok(Move {
        from,
        to,
        promotion,
    })
}

fn parse_square(s: &str) -> Result<Square, crate::UciError> {
    if s.len() != 2 {
        return Err(crate::UciError::InvalidSquare(s.to_string()));
    }

    let file = match s.chars().next().unwrap() {
        'a' => File::A,
        'b' => File::B,
        'c' => File::C,
        'd' => File::D,
        'e' => File::E,
        'f' => File::F,
        'g' => File::G,
        'h' => File::H,
        _ => return Err(crate::UciError::InvalidSquare(s.to_string())),
    };

    let rank = match s.chars().nth(1).unwrap() {
        '1' => Rank::First,
        '2' => Rank::Second,
        '3' => Rank::Third,
        '4' => Rank::Fourth,
        '5' => Rank::Fifth,
        '6' => Rank::Sixth,
        '7' => Rank::Seventh,
        '8' => Rank::Eighth,
        _ => return Err(crate::UciError::InvalidSquare(s.to_string())),
    };

    Ok(Square::new(file, rank))
}

/// Format move for UCI (cozy-chess Move → "e2e4")
pub fn format_uci_move(mv: &Move) -> String {
    let mut s = format!("{}{}", format_square(mv.from), format_square(mv.to));
    if let Some(promo) = mv.promotion {
        s.push(format_piece(promo));
    }
    s
}

/// Lowercase piece letter as it appears in a UCI move token.
pub fn format_piece(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

pub fn format_square(sq: Square) -> String {
    let file = match sq.file() {
        File::A => 'a',
        File::B => 'b',
        File::C => 'c',
        File::D => 'd',
        File::E => 'e',
        File::F => 'f',
        File::G => 'g',
        File::H => 'h',
    };
    let rank = match sq.rank() {
        Rank::First => '1',
        Rank::Second => '2',
        Rank::Third => '3',
        Rank::Fourth => '4',
        Rank::Fifth => '5',
        Rank::Sixth => '6',
        Rank::Seventh => '7',
        Rank::Eighth => '8',
    };
    format!("{}{}", file, rank)
}
