mod game;
mod renderer;

use std::{
    io::{Stdout, Write},
    path::Path,
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    execute, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    generators::{MAX_MAZE_DIM, MIN_DIM},
    settings::Settings,
};

/// View depths offered at startup
const VIEW_DEPTHS: [usize; 4] = [3, 5, 7, 9];

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Entry point of the app: ask for the maze setup, then play until the player quits
pub fn run(stdout: &mut Stdout, settings: &mut Settings, settings_path: &Path) -> std::io::Result<()> {
    queue!(
        stdout,
        style::SetAttribute(Attribute::Reverse),
        style::PrintStyledContent("mazewalk\r\n".with(Color::Yellow)),
        style::SetAttribute(Attribute::NoReverse),
    )?;
    stdout.flush()?;

    let maze_dim = match ask_maze_dimension(stdout, settings.maze_dim)? {
        Some(dim) => dim,
        None => return Ok(()),
    };
    stdout.execute(style::PrintStyledContent(
        format!("Maze size set to {}x{}\r\n", maze_dim, maze_dim)
            .with(Color::Green)
            .attribute(Attribute::Bold),
    ))?;

    // Offer the current depth first so Enter keeps it
    let depths = std::iter::once(settings.view_depth)
        .chain(VIEW_DEPTHS.into_iter().filter(|&d| d != settings.view_depth))
        .collect::<Vec<_>>();
    let view_depth = match select_from_menu(
        stdout,
        "Select how many cells you can see down a corridor (use arrow keys and Enter, or Esc to exit):",
        &depths,
    )? {
        Some(depth) => depth,
        None => return Ok(()),
    };
    stdout.execute(style::PrintStyledContent(
        format!("View depth set to {}\r\n", view_depth)
            .with(Color::Green)
            .attribute(Attribute::Bold),
    ))?;

    if (settings.maze_dim, settings.view_depth) != (maze_dim, view_depth) {
        settings.maze_dim = maze_dim;
        settings.view_depth = view_depth;
        if let Err(e) = settings.save(settings_path) {
            tracing::warn!("[app] could not save settings: {}", e);
        }
    }

    execute!(
        stdout,
        style::PrintStyledContent(
            "Find your way to the exit of the maze!\r\n"
                .with(Color::Yellow)
                .attribute(Attribute::Bold)
        ),
        style::PrintStyledContent("Controls:\r\n".with(Color::Yellow).attribute(Attribute::Bold)),
        style::PrintStyledContent(
            "  Bound keys (W/A/D/M by default): move, turn, open the map\r\n".with(Color::Cyan)
        ),
        style::PrintStyledContent("  Tab: key bindings\r\n".with(Color::Cyan)),
        style::PrintStyledContent("  Esc: Exit\r\n\r\n".with(Color::Cyan)),
    )?;

    match select_from_menu(
        stdout,
        "Ready? (use arrow keys and Enter, or Esc to exit):",
        &["Enter the maze", "Quit"],
    )? {
        Some("Enter the maze") => game::run(stdout, settings, settings_path),
        _ => Ok(()),
    }
}

/// Check a typed maze size. An empty input keeps `default`, which must be
/// in range too.
fn validate_maze_dimension(input: &str, default: u16) -> Result<u16, String> {
    let error_msg = format!(
        "Please enter an odd number between {} and {}.",
        MIN_DIM, MAX_MAZE_DIM
    );
    let input = input.trim();
    let dim = match input {
        "" => default,
        _ => input.parse::<u16>().map_err(|_| error_msg.clone())?,
    };
    match dim {
        MIN_DIM..=MAX_MAZE_DIM if dim % 2 == 1 => Ok(dim),
        _ => Err(error_msg),
    }
}

/// Ask for the maze side. `None` if the player presses Esc.
fn ask_maze_dimension(stdout: &mut Stdout, default: u16) -> std::io::Result<Option<u16>> {
    stdout.execute(style::PrintStyledContent(
        format!(
            "Enter the maze size (an odd number between {} and {}), or press Esc to exit. \
Leave empty to keep {}.\r\n",
            MIN_DIM, MAX_MAZE_DIM, default
        )
        .with(Color::Blue),
    ))?;
    prompt_with_validation(stdout, "Size: ", |s| validate_maze_dimension(s, default))
}

/// Block until the next key press and return its code.
fn next_key_press() -> std::io::Result<KeyCode> {
    loop {
        if let event::Event::Key(event::KeyEvent {
            code,
            kind: event::KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            return Ok(code);
        }
    }
}

/// Move back to the saved cursor and clear everything drawn below it.
fn rewind(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown)
    )
}

/// Read a line, redrawing it green or red as `validate` accepts or rejects it.
/// Enter only submits an accepted line. Esc gives `None`.
fn prompt_with_validation<F, T>(
    stdout: &mut Stdout,
    prompt: &str,
    validate: F,
) -> std::io::Result<Option<T>>
where
    F: Fn(&str) -> Result<T, String>,
{
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;
    let mut typed = String::new();

    let accepted = loop {
        rewind(stdout)?;
        stdout.queue(style::PrintStyledContent(
            prompt.with(Color::Cyan).attribute(Attribute::Bold),
        ))?;

        let checked = validate(&typed);
        let color = if checked.is_ok() { Color::Green } else { Color::Red };
        queue!(
            stdout,
            style::PrintStyledContent(typed.as_str().with(color)),
            style::Print(" \r\n")
        )?;
        if let Err(hint) = checked {
            stdout.queue(style::PrintStyledContent(
                hint.with(Color::DarkGrey).attribute(Attribute::Dim),
            ))?;
        }
        stdout.flush()?;

        match next_key_press()? {
            KeyCode::Enter => {
                if let Ok(value) = validate(&typed) {
                    break Some(value);
                }
            }
            KeyCode::Char(c) if !c.is_whitespace() && !c.is_control() => typed.push(c),
            KeyCode::Backspace => {
                typed.pop();
            }
            KeyCode::Esc => break None,
            _ => {}
        }
    };

    rewind(stdout)?;
    stdout.queue(cursor::Show)?;
    stdout.flush()?;
    Ok(accepted)
}

/// Arrow-key menu with the highlighted entry in reverse video.
/// Up and Down wrap around. Enter picks, Esc gives `None`.
fn select_from_menu<T: std::fmt::Display + Copy>(
    stdout: &mut Stdout,
    prompt: &str,
    options: &[T],
) -> std::io::Result<Option<T>> {
    if options.is_empty() {
        return Ok(None);
    }
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;
    let mut highlighted = 0;

    let picked = loop {
        rewind(stdout)?;
        stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;
        for (i, option) in options.iter().enumerate() {
            let line = format!("\r\n{}", option);
            if i == highlighted {
                stdout.queue(style::PrintStyledContent(line.reverse()))?;
            } else {
                stdout.queue(style::Print(line))?;
            }
        }
        stdout.queue(style::Print("\r\n"))?;
        stdout.flush()?;

        match next_key_press()? {
            KeyCode::Up => highlighted = highlighted.checked_sub(1).unwrap_or(options.len() - 1),
            KeyCode::Down => highlighted = (highlighted + 1) % options.len(),
            KeyCode::Enter => break Some(options[highlighted]),
            KeyCode::Esc => break None,
            _ => {}
        }
    };

    rewind(stdout)?;
    stdout.queue(cursor::Show)?;
    stdout.flush()?;
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_maze_dimension() {
        assert_eq!(validate_maze_dimension("", 51), Ok(51));
        assert_eq!(validate_maze_dimension("  ", 21), Ok(21));
        assert_eq!(validate_maze_dimension("5", 51), Ok(5));
        assert_eq!(validate_maze_dimension("255", 51), Ok(255));
        assert!(validate_maze_dimension("3", 51).is_err());
        assert!(validate_maze_dimension("20", 51).is_err());
        assert!(validate_maze_dimension("257", 51).is_err());
        assert!(validate_maze_dimension("abc", 51).is_err());
        assert!(validate_maze_dimension("-5", 51).is_err());
    }

    #[test]
    fn test_empty_input_rejects_out_of_range_default() {
        assert!(validate_maze_dimension("", 65535).is_err());
        assert!(validate_maze_dimension("", 4).is_err());
        assert!(validate_maze_dimension("", 3).is_err());
        assert_eq!(validate_maze_dimension("7", 65535), Ok(7));
    }
}
