//! Diagnostic text renderings of a position. None of them is parsed back.

use std::fmt::{self, Write as _};

use super::moves::column_name;
use super::{Color, Direction, Piece, Position};

const RED: &str = "\x1b[31m";
const WHITE: &str = "\x1b[37m";
const RESET: &str = "\x1b[0m";

/// Width of the [`Position::to_string_64x64`] window
const WINDOW: i32 = 8;

/// One colored block per edge color, the glyph in the middle
fn large_tile(piece: Piece) -> [String; 3] {
    if piece.is_empty() {
        return ["   ".into(), " . ".into(), "   ".into()];
    }
    let paint = |dir: Direction| {
        let color = match piece.edge(dir) {
            Some(Color::Red) => RED,
            _ => WHITE,
        };
        format!("{color}#{RESET}")
    };
    [
        format!(" {} ", paint(Direction::North)),
        format!("{}{}{}", paint(Direction::West), piece.glyph(), paint(Direction::East)),
        format!(" {} ", paint(Direction::South)),
    ]
}

impl Position {
    /// Board including the empty ring, with column letters and row numbers.
    /// `pretty` draws every cell as a 3x3 block with ANSI colors.
    pub fn dump(&self, pretty: bool) -> String {
        let mut out = String::new();
        if self.is_empty_board() {
            return out;
        }
        let columns = -1..=self.max_x;

        if pretty {
            out.push_str("   ");
            for x in columns.clone() {
                let _ = write!(out, "{:^3}", column_name(x));
            }
            out.push('\n');
            for y in -1..=self.max_y {
                let rows: Vec<[String; 3]> = columns.clone().map(|x| large_tile(self.at(x, y))).collect();
                for k in 0..3 {
                    if k == 1 {
                        let _ = write!(out, "{:>3}", y + 1);
                    } else {
                        out.push_str("   ");
                    }
                    for tile in &rows {
                        out.push_str(&tile[k]);
                    }
                    out.push('\n');
                }
            }
        } else {
            out.push_str("   ");
            for x in columns.clone() {
                let _ = write!(out, "{:>3}", column_name(x));
            }
            out.push('\n');
            for y in -1..=self.max_y {
                let _ = write!(out, "{:>3}", y + 1);
                for x in columns.clone() {
                    let _ = write!(out, "{:>3}", self.at(x, y).glyph());
                }
                out.push('\n');
            }
        }
        out
    }

    /// 8x8 window around the center of the board, one digit per tile code
    /// and one `|`-separated segment per column
    pub fn to_string_64x64(&self) -> String {
        let offset_x = self.max_x / 2 - WINDOW / 2;
        let offset_y = self.max_y / 2 - WINDOW / 2;
        (0..WINDOW)
            .map(|i| {
                (0..WINDOW)
                    .map(|j| char::from(b'0' + self.at(i + offset_x, j + offset_y).code()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump(false))?;
        write!(f, "{} to move", if self.red_to_move { "red" } else { "white" })?;
        match self.winner() {
            Some(winner) => write!(f, ", winner {winner} by {}", self.winning_reason().as_str()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;

    #[test]
    fn test_plain_dump() {
        let p = Position::new().do_move(Move::new(0, 0, Piece::RedSouthEast)).unwrap();
        let text = p.dump(false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "     @  A  B");
        assert_eq!(lines[2], "  1  .  /  .");
    }

    #[test]
    fn test_pretty_dump_colors_edges() {
        let p = Position::new().do_move(Move::new(0, 0, Piece::RedEastWest)).unwrap();
        let text = p.dump(true);
        // Header plus three text rows per board row
        assert_eq!(text.lines().count(), 1 + 3 * 3);
        assert!(text.contains(RED));
        assert!(text.contains(WHITE));
    }

    #[test]
    fn test_string_64x64() {
        let p = Position::new().do_move(Move::new(0, 0, Piece::RedEastWest)).unwrap();
        let s = p.to_string_64x64();
        let columns: Vec<&str> = s.split('|').collect();
        assert_eq!(columns.len(), 8);
        // Offset is -4 on both axes, so the tile lands at (4, 4)
        assert_eq!(columns[4], "00001000");
        assert_eq!(columns[0], "00000000");
    }

    #[test]
    fn test_display_status() {
        let p = Position::new().do_move(Move::new(0, 0, Piece::RedEastWest)).unwrap();
        assert!(p.to_string().ends_with("red to move"));
        let r = p.resign();
        assert!(r.to_string().ends_with("winner white by RESIGN"));
    }
}
