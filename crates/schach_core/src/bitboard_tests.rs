use super::*;

#[test]
fn test_from_square() {
    assert_eq!(Bitboard::from_square(0).0, 1);
    assert_eq!(Bitboard::from_square(8).0, 256);
    assert_eq!(Bitboard::from_square(80).0, 1 << 80);
}

#[test]
fn test_popcount() {
    assert_eq!(Bitboard::EMPTY.popcount(), 0);
    assert_eq!(Bitboard::from_square(0).popcount(), 1);
    assert_eq!(Bitboard::column(0).popcount(), 9);
    assert_eq!(Bitboard::row(8).popcount(), 9);
    assert_eq!(Bitboard::ALL.popcount(), 81);
}

#[test]
fn test_iterator() {
    let bb = Bitboard(0b1010) | Bitboard::from_square(80);
    let squares: Vec<u8> = bb.collect();
    assert_eq!(squares, vec![1, 3, 80]);
}

#[test]
fn test_not_stays_on_board() {
    let inverted = !Bitboard::EMPTY;
    assert_eq!(inverted, Bitboard::ALL);
    assert_eq!((!Bitboard::row(4)).popcount(), 72);
}

#[test]
fn test_row_and_column_intersect_once() {
    let cross = Bitboard::row(3) & Bitboard::column(5);
    assert_eq!(cross.lsb(), Some(3 * 9 + 5));
    assert_eq!(cross.popcount(), 1);
}
