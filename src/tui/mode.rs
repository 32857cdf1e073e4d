use ratatui::layout::Rect;

use crate::shared::GRID_SIZE;

// state local to the tui: the keyboard cursor, and where the grid was last
// drawn so mouse clicks can be mapped back to cells
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    pub cursor: usize, // row-major cell index
    pub grid_area: Rect,
}

impl TuiState {
    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let n = GRID_SIZE as isize;
        let row = (self.cursor as isize / n + d_row).clamp(0, n - 1);
        let col = (self.cursor as isize % n + d_col).clamp(0, n - 1);
        self.cursor = (row * n + col) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_on_grid() {
        let mut ts = TuiState::default();
        ts.move_cursor(-1, -1);
        assert_eq!(ts.cursor, 0);
        ts.move_cursor(0, 1);
        ts.move_cursor(1, 0);
        assert_eq!(ts.cursor, 7);
        for _ in 0..10 {
            ts.move_cursor(1, 1);
        }
        assert_eq!(ts.cursor, 35);
    }
}
