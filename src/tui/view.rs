use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Gauge, Paragraph};

use super::grid::{category_color, draw_pad_grid};
use super::mode::TuiState;
use crate::shared::{DisplayState, GRID_SIZE, Lifecycle, PadCategory};

// each grid cell is this many columns wide per row of height, so pads look square
const CELL_ASPECT: u16 = 2;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &mut TuiState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title + capacity line
            Constraint::Min(12),   // pad grid
            Constraint::Length(1), // loop progress
            Constraint::Length(1), // key help
        ])
        .split(area);

    draw_header(frame, sections[0], state);
    ts.grid_area = grid_area(sections[1]);
    draw_pad_grid(frame, ts.grid_area, &state.cells, ts.cursor, state.blink_on);
    draw_progress(frame, sections[2], state);
    draw_footer(frame, sections[3]);

    if state.lifecycle == Lifecycle::Paused {
        draw_pause_overlay(frame, ts.grid_area);
    }
}

// largest square-looking grid that fits, centred
fn grid_area(area: Rect) -> Rect {
    let n = GRID_SIZE as u16;
    let cell_h = (area.height / n).min(area.width / n / CELL_ASPECT).max(1);
    let width = cell_h * CELL_ASPECT * n;
    let height = cell_h * n;
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width.min(area.width),
        height.min(area.height),
    )
}

fn category_span(category: PadCategory, pulse: bool) -> Span<'static> {
    let mut style = Style::default().fg(category_color(category));
    if pulse {
        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    Span::styled(category.label(), style)
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let [bass, drum, sounds] = state.pulse;
    let lines = vec![
        Line::from(Span::styled(
            state.status_text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("You can have one "),
            category_span(PadCategory::Bass, bass),
            Span::raw(", one "),
            category_span(PadCategory::Drum, drum),
            Span::raw(", and 3 "),
            category_span(PadCategory::Sounds, sounds),
        ]),
        Line::from(format!(
            "[{}] Immediately stop sample on click",
            if state.immediate_stop { "x" } else { " " }
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_progress(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::Black))
        .ratio(state.loop_progress.clamp(0.0, 1.0))
        .label(state.lifecycle.label());
    frame.render_widget(gauge, area);
}

fn draw_footer(frame: &mut Frame, area: Rect) {
    let help = "arrows/click: pad  enter: queue  p: pause  s: stop  i: immediate stop  q: quit";
    frame.render_widget(
        Paragraph::new(help)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_pause_overlay(frame: &mut Frame, area: Rect) {
    let width = area.width.min(24);
    let height = area.height.min(3);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new("paused - p to resume")
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_area_fits_and_centres() {
        let area = Rect::new(0, 3, 100, 30);
        let grid = grid_area(area);
        assert_eq!(grid.height, 30);
        assert_eq!(grid.width, 60);
        assert_eq!(grid.x, 20);
    }

    #[test]
    fn grid_area_in_narrow_terminal() {
        let grid = grid_area(Rect::new(0, 0, 24, 40));
        assert_eq!(grid.width, 24);
        assert_eq!(grid.height, 12);
        assert_eq!(grid.y, 14);
    }
}
