//! Terminal input mapped to diagram commands.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};

/// A keyboard command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    ExpandAll,
    CollapseAll,
    Maximize,
    ExitFullscreen,
    /// Pan by a number of cells.
    Pan { dx: i16, dy: i16 },
    /// Zoom around the centre of the diagram; `true` zooms in.
    Zoom { zoom_in: bool },
}

/// A mouse gesture, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Press { x: u16, y: u16 },
    Drag { x: u16, y: u16 },
    Release { x: u16, y: u16 },
    Move { x: u16, y: u16 },
    Wheel { x: u16, y: u16, zoom_in: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Command(Command),
    Pointer(Pointer),
    Resize { width: u16, height: u16 },
}

impl Input {
    /// Map a crossterm event; unbound keys and other buttons give None.
    pub fn from_crossterm(event: &CrosstermEvent, pan_step: u16) -> Option<Input> {
        match event {
            CrosstermEvent::Key(key) => command_for_key(key, pan_step).map(Input::Command),
            CrosstermEvent::Mouse(mouse) => pointer_for_mouse(mouse).map(Input::Pointer),
            CrosstermEvent::Resize(width, height) => Some(Input::Resize {
                width: *width,
                height: *height,
            }),
            _ => None,
        }
    }
}

fn command_for_key(key: &KeyEvent, pan_step: u16) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let step = pan_step.min(i16::MAX as u16) as i16;
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }
    let command = match key.code {
        KeyCode::Char('q') => Command::Quit,
        KeyCode::Char('e') => Command::ExpandAll,
        KeyCode::Char('c') => Command::CollapseAll,
        KeyCode::Char('f') => Command::Maximize,
        KeyCode::Esc => Command::ExitFullscreen,
        KeyCode::Char('+') | KeyCode::Char('=') => Command::Zoom { zoom_in: true },
        KeyCode::Char('-') => Command::Zoom { zoom_in: false },
        // Arrows move the view over the diagram, so the diagram shifts the other way
        KeyCode::Left | KeyCode::Char('h') => Command::Pan { dx: step, dy: 0 },
        KeyCode::Right | KeyCode::Char('l') => Command::Pan { dx: -step, dy: 0 },
        KeyCode::Up | KeyCode::Char('k') => Command::Pan { dx: 0, dy: step },
        KeyCode::Down | KeyCode::Char('j') => Command::Pan { dx: 0, dy: -step },
        _ => return None,
    };
    Some(command)
}

fn pointer_for_mouse(mouse: &MouseEvent) -> Option<Pointer> {
    let (x, y) = (mouse.column, mouse.row);
    let pointer = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Pointer::Press { x, y },
        MouseEventKind::Drag(MouseButton::Left) => Pointer::Drag { x, y },
        MouseEventKind::Up(MouseButton::Left) => Pointer::Release { x, y },
        MouseEventKind::Moved => Pointer::Move { x, y },
        MouseEventKind::ScrollUp => Pointer::Wheel {
            x,
            y,
            zoom_in: true,
        },
        MouseEventKind::ScrollDown => Pointer::Wheel {
            x,
            y,
            zoom_in: false,
        },
        _ => return None,
    };
    Some(pointer)
}
