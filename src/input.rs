use crate::render::BoardLayout;
use crate::sim::{Key, PlayerAction};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum InputEvent {
    Key { key: KeyCode, mods: KeyModifiers },
    Mouse { kind: MouseEventKind, col: u16, row: u16 },
}

pub(crate) fn collect_input_nonblocking(
    max_frame_time: Duration,
) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) => {
                if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                    out.push(InputEvent::Key {
                        key: k.code,
                        mods: k.modifiers,
                    });
                }
            }
            Event::Mouse(m) => out.push(InputEvent::Mouse {
                kind: m.kind,
                col: m.column,
                row: m.row,
            }),
            _ => {}
        }
        if out.len() >= 64 {
            break;
        }
    }
    Ok(out)
}

/// Turns terminal events into simulation actions. Remembers whether the
/// pointer was last seen over the board so leaving it fires exactly once.
#[derive(Debug, Default)]
pub(crate) struct InputMapper {
    inside: bool,
}

impl InputMapper {
    pub(crate) fn map(&mut self, layout: BoardLayout, ev: InputEvent) -> Option<PlayerAction> {
        match ev {
            InputEvent::Key { key, mods } => map_key(key, mods),
            InputEvent::Mouse { kind, col, row } => self.map_mouse(layout, kind, col, row),
        }
    }

    fn map_mouse(
        &mut self,
        layout: BoardLayout,
        kind: MouseEventKind,
        col: u16,
        row: u16,
    ) -> Option<PlayerAction> {
        let hit = layout.hit(col, row);
        let was_inside = self.inside;
        self.inside = hit.is_some();

        match (kind, hit) {
            (MouseEventKind::Up(MouseButton::Left), _) => Some(PlayerAction::PointerUp),
            (MouseEventKind::Down(MouseButton::Left), Some((x, y))) => {
                Some(PlayerAction::PointerDown(x, y))
            }
            (MouseEventKind::Drag(_) | MouseEventKind::Moved, Some((x, y))) => {
                Some(PlayerAction::PointerMove(x, y))
            }
            (_, None) if was_inside => Some(PlayerAction::PointerExit),
            _ => None,
        }
    }
}

fn map_key(key: KeyCode, mods: KeyModifiers) -> Option<PlayerAction> {
    if key == KeyCode::Char('c') && mods.contains(KeyModifiers::CONTROL) {
        return Some(PlayerAction::Quit);
    }
    let action = match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => PlayerAction::Quit,
        KeyCode::Esc => PlayerAction::Key(Key::Escape),
        KeyCode::Char(ch) if ch.is_ascii_digit() => PlayerAction::Key(Key::Digit(ch as u8 - b'0')),
        KeyCode::Char(' ') => PlayerAction::ToggleRain,
        KeyCode::Left => PlayerAction::NudgeOrigin(-1, 0),
        KeyCode::Right => PlayerAction::NudgeOrigin(1, 0),
        KeyCode::Up => PlayerAction::NudgeOrigin(0, -1),
        KeyCode::Down => PlayerAction::NudgeOrigin(0, 1),
        _ => PlayerAction::Key(Key::Other),
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BoardLayout {
        BoardLayout::centered(80, 24)
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key {
            key: code,
            mods: KeyModifiers::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, col: u16, row: u16) -> InputEvent {
        InputEvent::Mouse { kind, col, row }
    }

    #[test]
    fn keys_map_to_actions() {
        let mut m = InputMapper::default();
        let l = layout();
        assert_eq!(
            m.map(l, key(KeyCode::Char('1'))),
            Some(PlayerAction::Key(Key::Digit(1)))
        );
        assert_eq!(
            m.map(l, key(KeyCode::Char('9'))),
            Some(PlayerAction::Key(Key::Digit(9)))
        );
        assert_eq!(
            m.map(l, key(KeyCode::Esc)),
            Some(PlayerAction::Key(Key::Escape))
        );
        assert_eq!(m.map(l, key(KeyCode::Char('q'))), Some(PlayerAction::Quit));
        assert_eq!(
            m.map(
                l,
                InputEvent::Key {
                    key: KeyCode::Char('c'),
                    mods: KeyModifiers::CONTROL
                }
            ),
            Some(PlayerAction::Quit)
        );
        assert_eq!(m.map(l, key(KeyCode::Char(' '))), Some(PlayerAction::ToggleRain));
        assert_eq!(
            m.map(l, key(KeyCode::Up)),
            Some(PlayerAction::NudgeOrigin(0, -1))
        );
        assert_eq!(
            m.map(l, key(KeyCode::Char('x'))),
            Some(PlayerAction::Key(Key::Other))
        );
    }

    #[test]
    fn mouse_over_board_drives_rain() {
        let mut m = InputMapper::default();
        let l = layout();
        let (c0, r0) = (l.x0, l.y0);

        assert_eq!(
            m.map(l, mouse(MouseEventKind::Down(MouseButton::Left), c0 + 5, r0 + 2)),
            Some(PlayerAction::PointerDown(2, 2))
        );
        assert_eq!(
            m.map(l, mouse(MouseEventKind::Drag(MouseButton::Left), c0 + 6, r0 + 3)),
            Some(PlayerAction::PointerMove(3, 3))
        );
        assert_eq!(
            m.map(l, mouse(MouseEventKind::Up(MouseButton::Left), c0 + 6, r0 + 3)),
            Some(PlayerAction::PointerUp)
        );
        assert_eq!(
            m.map(l, mouse(MouseEventKind::Moved, c0, r0)),
            Some(PlayerAction::PointerMove(0, 0))
        );
    }

    #[test]
    fn leaving_board_fires_exit_once() {
        let mut m = InputMapper::default();
        let l = layout();
        m.map(l, mouse(MouseEventKind::Moved, l.x0, l.y0));

        assert_eq!(
            m.map(l, mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0)),
            Some(PlayerAction::PointerExit)
        );
        assert_eq!(m.map(l, mouse(MouseEventKind::Moved, 1, 0)), None);
        assert_eq!(
            m.map(l, mouse(MouseEventKind::Down(MouseButton::Left), 0, 0)),
            None
        );
    }

    #[test]
    fn right_button_is_ignored() {
        let mut m = InputMapper::default();
        let l = layout();
        assert_eq!(
            m.map(l, mouse(MouseEventKind::Down(MouseButton::Right), l.x0, l.y0)),
            None
        );
    }
}
