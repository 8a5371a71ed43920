use serde::{Deserialize, Serialize};

/// Width and height of the board.
pub const BOARD_SIZE: u8 = 9;
/// Number of squares on the board.
pub const SQUARE_COUNT: usize = 81;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
    /// Row delta of a forward pawn step. White advances toward row 0.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
    /// Row of this color's back rank.
    pub fn home_row(self) -> u8 {
        match self {
            Color::White => BOARD_SIZE - 1,
            Color::Black => 0,
        }
    }
    /// Row on which this color's pawns promote.
    pub fn promotion_row(self) -> u8 {
        self.other().home_row()
    }
    /// Row on which this color's pawns start.
    pub fn pawn_row(self) -> u8 {
        match self {
            Color::White => BOARD_SIZE - 2,
            Color::Black => 1,
        }
    }
    pub fn to_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// Bishop + knight.
    Archbishop,
    /// Rook + knight.
    Chancellor,
    /// Queen + knight.
    Angel,
}

impl PieceKind {
    pub const COUNT: usize = 9;
    pub const ALL: [PieceKind; 9] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Archbishop,
        PieceKind::Chancellor,
        PieceKind::Angel,
    ];

    pub fn idx(self) -> usize {
        self as usize
    }

    /// Lowercase letter used in diagrams and move text.
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
            PieceKind::Archbishop => 'a',
            PieceKind::Chancellor => 'c',
            PieceKind::Angel => 'e',
        }
    }

    /// Parses a piece letter, case-insensitive.
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            'a' => Some(PieceKind::Archbishop),
            'c' => Some(PieceKind::Chancellor),
            'e' => Some(PieceKind::Angel),
            _ => None,
        }
    }

    /// Whether the piece has the knight's leap.
    pub fn leaps_like_knight(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Archbishop | PieceKind::Chancellor | PieceKind::Angel
        )
    }

    /// Whether the piece slides diagonally.
    pub fn slides_diagonally(self) -> bool {
        matches!(
            self,
            PieceKind::Bishop | PieceKind::Queen | PieceKind::Archbishop | PieceKind::Angel
        )
    }

    /// Whether the piece slides along rows and columns.
    pub fn slides_orthogonally(self) -> bool {
        matches!(
            self,
            PieceKind::Rook | PieceKind::Queen | PieceKind::Chancellor | PieceKind::Angel
        )
    }
}

/// A piece on the board. Replaced wholesale on every mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    pub has_moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            color,
            kind,
            has_moved: false,
        }
    }

    /// Same piece with `has_moved` set.
    pub fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    /// Diagram letter: uppercase for White, lowercase for Black.
    pub fn to_char(self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq)]
pub struct Move {
    pub from: u8, // 0..81
    pub to: u8,   // 0..81
    pub promo: Option<PieceKind>,
    /// Piece removed by this move. Filled in by the generator or `make_move`.
    pub captured: Option<Piece>,
    pub is_castle: bool,
}

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            promo: None,
            captured: None,
            is_castle: false,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Captures and promotions.
    pub fn is_tactical(&self) -> bool {
        self.captured.is_some() || self.promo.is_some()
    }
}

// `captured` is informational and does not identify the move.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.promo == other.promo
            && self.is_castle == other.is_castle
    }
}

impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
        self.promo.hash(state);
        self.is_castle.hash(state);
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", sq_to_coord(self.from), sq_to_coord(self.to))?;
        if let Some(p) = self.promo {
            write!(f, "{}", p.to_char())?;
        }
        Ok(())
    }
}

/// Search difficulty label. Maps to depth, pruning and randomization settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Hard,
    #[default]
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown difficulty: {s}"))
    }
}

// Helpers
pub fn row_of(sq: u8) -> i8 {
    (sq / BOARD_SIZE) as i8
}
pub fn col_of(sq: u8) -> i8 {
    (sq % BOARD_SIZE) as i8
}
pub fn sq(row: i8, col: i8) -> Option<u8> {
    let n = BOARD_SIZE as i8;
    if (0..n).contains(&row) && (0..n).contains(&col) {
        Some((row as u8) * BOARD_SIZE + (col as u8))
    } else {
        None
    }
}

/// Mirrors a square across the horizontal center line.
pub fn mirror_sq(s: u8) -> u8 {
    (BOARD_SIZE - 1 - row_of(s) as u8) * BOARD_SIZE + col_of(s) as u8
}

/// Square name, e.g. `e1` for White's king square (row 8, column 4).
pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq % BOARD_SIZE)) as char;
    let r = (b'1' + (BOARD_SIZE - 1 - sq / BOARD_SIZE)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<u8> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'i').contains(&f) || !(b'1'..=b'9').contains(&r) {
        return None;
    }
    let col = f - b'a';
    let row = BOARD_SIZE - 1 - (r - b'1');
    Some(row * BOARD_SIZE + col)
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
