use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};

use super::grid::cell_at;
use super::mode::TuiState;
use crate::shared::InputEvent;

// poll for input from the terminal; cursor movement is handled here, and
// everything else is resolved into semantic events for the middle layer
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(key.code, ts)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Ok(handle_click(mouse.column, mouse.row, ts).into_iter().collect())
            }
            _ => Ok(vec![]),
        },
        _ => Ok(vec![]),
    }
}

fn handle_key(code: KeyCode, ts: &mut TuiState) -> Vec<InputEvent> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],

        KeyCode::Up => { ts.move_cursor(-1, 0); vec![] }
        KeyCode::Down => { ts.move_cursor(1, 0); vec![] }
        KeyCode::Left => { ts.move_cursor(0, -1); vec![] }
        KeyCode::Right => { ts.move_cursor(0, 1); vec![] }
        KeyCode::Enter | KeyCode::Char(' ') => vec![InputEvent::RequestCell(ts.cursor as u8)],

        KeyCode::Char('p') => vec![InputEvent::TogglePause],
        KeyCode::Char('s') => vec![InputEvent::Stop],
        KeyCode::Char('i') => vec![InputEvent::ToggleImmediateStop],

        _ => vec![],
    }
}

// a click also moves the cursor, so keyboard and mouse stay in step
fn handle_click(x: u16, y: u16, ts: &mut TuiState) -> Option<InputEvent> {
    let cell = cell_at(ts.grid_area, x, y)?;
    ts.cursor = cell;
    Some(InputEvent::RequestCell(cell as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::grid::cell_rect;
    use ratatui::layout::Rect;

    #[test]
    fn enter_requests_cursor_cell() {
        let mut ts = TuiState::default();
        assert!(handle_key(KeyCode::Right, &mut ts).is_empty());
        assert!(handle_key(KeyCode::Down, &mut ts).is_empty());
        assert_eq!(handle_key(KeyCode::Enter, &mut ts), vec![InputEvent::RequestCell(7)]);
    }

    #[test]
    fn control_keys() {
        let mut ts = TuiState::default();
        assert_eq!(handle_key(KeyCode::Char('p'), &mut ts), vec![InputEvent::TogglePause]);
        assert_eq!(handle_key(KeyCode::Char('s'), &mut ts), vec![InputEvent::Stop]);
        assert_eq!(handle_key(KeyCode::Char('i'), &mut ts), vec![InputEvent::ToggleImmediateStop]);
        assert_eq!(handle_key(KeyCode::Esc, &mut ts), vec![InputEvent::Quit]);
        assert!(handle_key(KeyCode::Char('z'), &mut ts).is_empty());
    }

    #[test]
    fn click_maps_to_cell_and_moves_cursor() {
        let mut ts = TuiState { cursor: 0, grid_area: Rect::new(0, 0, 36, 18) };
        let r = cell_rect(ts.grid_area, 20);
        assert_eq!(handle_click(r.x + 1, r.y + 1, &mut ts), Some(InputEvent::RequestCell(20)));
        assert_eq!(ts.cursor, 20);
        assert_eq!(handle_click(100, 100, &mut ts), None);
    }
}
