use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::shared::{CellView, GRID_SIZE, LedState, NUM_CELLS, PadCategory};

pub fn category_color(category: PadCategory) -> Color {
    match category {
        PadCategory::Bass => Color::Rgb(44, 191, 123),
        PadCategory::Drum => Color::Rgb(242, 164, 19),
        PadCategory::Sounds => Color::Rgb(242, 81, 22),
    }
}

// Cells are laid out by hand (not with Layout) so that drawing and mouse
// hit-testing agree on the exact same rectangles.
pub fn cell_rect(area: Rect, index: usize) -> Rect {
    let cell_w = area.width / GRID_SIZE as u16;
    let cell_h = area.height / GRID_SIZE as u16;
    let row = (index / GRID_SIZE) as u16;
    let col = (index % GRID_SIZE) as u16;
    Rect::new(area.x + col * cell_w, area.y + row * cell_h, cell_w, cell_h)
}

/// Which cell, if any, the terminal position `(x, y)` falls in.
pub fn cell_at(area: Rect, x: u16, y: u16) -> Option<usize> {
    (0..NUM_CELLS).find(|&i| {
        let r = cell_rect(area, i);
        x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height
    })
}

pub fn draw_pad_grid(
    frame: &mut Frame,
    area: Rect,
    cells: &[CellView; NUM_CELLS],
    cursor: usize,
    blink_on: bool,
) {
    for (index, cell) in cells.iter().enumerate() {
        let color = category_color(cell.pad.category);
        let lit = match cell.led {
            LedState::OnHigh => true,
            LedState::Blink => blink_on,
            LedState::Off => false,
        };
        let style = if lit {
            Style::default().fg(Color::Black).bg(color)
        } else {
            Style::default().fg(color)
        };
        let border = if index == cursor { BorderType::Thick } else { BorderType::Rounded };
        let block = Block::bordered()
            .border_type(border)
            .border_style(Style::default().fg(color))
            .style(style);
        let label = Paragraph::new(format!("{}", cell.pad.slot + 1))
            .alignment(Alignment::Center)
            .style(style.add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(label, cell_rect(area, index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_matches_layout() {
        let area = Rect::new(2, 1, 60, 30);
        for i in 0..NUM_CELLS {
            let r = cell_rect(area, i);
            assert_eq!(cell_at(area, r.x, r.y), Some(i));
            assert_eq!(cell_at(area, r.x + r.width - 1, r.y + r.height - 1), Some(i));
        }
        assert_eq!(cell_at(area, 0, 0), None);
        assert_eq!(cell_at(area, 62, 10), None);
    }
}
