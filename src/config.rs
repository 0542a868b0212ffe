//! Rule variants
//!
//! Standard Trax is played on an unbounded board. 8x8 Trax caps both axes at
//! eight cells and declares a draw when the board fills up without a winner.
//! Two corner cases are not settled by the rules themselves and are exposed
//! as policies instead.

/// Both colours complete a winning structure with the same move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoubleWinPolicy {
    /// The player who made the move wins
    #[default]
    MoverWins,
    /// The game is drawn
    Draw,
}

/// A bounded board filled up without a loop or line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FullBoardPolicy {
    /// The game is drawn
    #[default]
    Draw,
    /// The colour owning the longest connected track wins; equal lengths draw
    LongestTrack,
}

/// Rule configuration carried by every position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleConfig {
    /// Maximum span of each axis, `None` for the unbounded game
    pub board_limit: Option<i32>,
    /// Minimum span of an axis before a line along it can win
    pub min_line_span: i32,
    pub double_win: DoubleWinPolicy,
    pub full_board: FullBoardPolicy,
}

impl RuleConfig {
    /// Standard (unbounded) Trax
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            board_limit: None,
            min_line_span: 8,
            double_win: DoubleWinPolicy::MoverWins,
            full_board: FullBoardPolicy::Draw,
        }
    }

    /// 8x8 Trax
    #[must_use]
    pub const fn eight_by_eight() -> Self {
        Self {
            board_limit: Some(8),
            ..Self::standard()
        }
    }

    #[must_use]
    pub const fn with_double_win(mut self, policy: DoubleWinPolicy) -> Self {
        self.double_win = policy;
        self
    }

    #[must_use]
    pub const fn with_full_board(mut self, policy: FullBoardPolicy) -> Self {
        self.full_board = policy;
        self
    }

    #[must_use]
    pub const fn with_min_line_span(mut self, span: i32) -> Self {
        self.min_line_span = span;
        self
    }

    /// True when a move touching column/row `-1` or `max` would exceed the limit
    #[inline]
    pub fn blocks_extension(&self, span: i32) -> bool {
        matches!(self.board_limit, Some(limit) if span >= limit)
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_has_no_limit() {
        let rules = RuleConfig::default();
        assert_eq!(rules.board_limit, None);
        assert!(!rules.blocks_extension(100));
    }

    #[test]
    fn test_eight_by_eight_blocks_at_limit() {
        let rules = RuleConfig::eight_by_eight();
        assert!(!rules.blocks_extension(7));
        assert!(rules.blocks_extension(8));
        assert_eq!(rules.double_win, DoubleWinPolicy::MoverWins);
    }

    #[test]
    fn test_builders() {
        let rules = RuleConfig::standard()
            .with_double_win(DoubleWinPolicy::Draw)
            .with_full_board(FullBoardPolicy::LongestTrack)
            .with_min_line_span(4);
        assert_eq!(rules.double_win, DoubleWinPolicy::Draw);
        assert_eq!(rules.full_board, FullBoardPolicy::LongestTrack);
        assert_eq!(rules.min_line_span, 4);
    }
}
