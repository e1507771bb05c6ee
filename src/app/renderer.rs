use std::{
    io::{self, Write},
    ops::Range,
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;
use unicode_width::UnicodeWidthStr;

use crate::{
    app::game::game_state::{Feedback, GameState, Mode},
    controls::{Action, ControlMap},
    error::RemapError,
    maze::{Cell, Facing},
    navigator::{CorridorScan, MAX_MINIMAP_RADIUS, MoveOutcome},
    view::{Bounds, CorridorView, Point, Surface, ViewConfig},
};

/// The width of each map tile when rendered, in character widths.
pub const TILE_WIDTH: u16 = 2;
/// Rows below the view reserved for the status and help lines.
pub const STATUS_ROWS: u16 = 2;
/// A terminal cell is about twice as tall as it is wide.
const ROW_ASPECT: f32 = 2.0;
/// Narrowest first-person view worth drawing, in columns.
const MIN_VIEW_COLS: u16 = 16;

/// Paints one frame of the game: the first-person view (or the overlay for the
/// current mode), the compass and minimap beside it, and the status lines below.
pub struct Renderer {
    view_depth: usize,
    minimap_radius: usize,
}

impl Renderer {
    pub fn new(view_depth: usize, minimap_radius: usize) -> Self {
        Self {
            view_depth,
            minimap_radius: minimap_radius.min(MAX_MINIMAP_RADIUS),
        }
    }

    /// Draw the whole frame sized to the current terminal.
    pub fn draw<W: Write>(&self, out: &mut W, state: &mut GameState) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.draw_sized(out, state, cols, rows)
    }

    fn sidebar_cols(&self) -> u16 {
        (2 * self.minimap_radius as u16 + 1) * TILE_WIDTH + 2
    }

    fn draw_sized<W: Write>(
        &self,
        out: &mut W,
        state: &mut GameState,
        cols: u16,
        rows: u16,
    ) -> io::Result<()> {
        let minimap_rows = 2 * self.minimap_radius as u16 + 1;
        let sidebar_cols = self.sidebar_cols();
        if cols < sidebar_cols + MIN_VIEW_COLS || rows < minimap_rows + 2 + STATUS_ROWS {
            tracing::debug!("[render] terminal {}x{} too small", cols, rows);
            queue!(
                out,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(
                    "Terminal is too small to draw the maze. Please resize the terminal.\r\n"
                        .with(Color::Yellow)
                        .attribute(Attribute::Bold)
                ),
            )?;
            return out.flush();
        }

        let view_cols = cols - sidebar_cols;
        let view_rows = rows - STATUS_ROWS;
        let viewport = Bounds::new(0.0, 0.0, view_cols as f32, view_rows as f32 * ROW_ASPECT);
        let config = ViewConfig::fit(viewport, self.view_depth);

        // Queries run after the input has been applied, scan first, then the
        // minimap that marks cells as discovered
        let scan = state.navigator().scan_corridors(config.scan_depth());
        let minimap = state.navigator_mut().get_minimap(self.minimap_radius);

        queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        match state.mode() {
            Mode::Exploring => {
                let view = CorridorView::project(&scan, viewport, &config);
                paint_view(out, &view, view_cols, view_rows)?;
            }
            Mode::MapOpen => paint_full_map(out, state, view_cols, view_rows)?,
            Mode::Settings | Mode::Remapping(_) => paint_settings(out, state, view_cols)?,
        }
        if state.is_won() {
            paint_win_pane(out, view_cols, view_rows)?;
        }
        paint_sidebar(out, view_cols + 1, state.navigator().facing(), &minimap)?;

        let status = status_line(state, &scan);
        let help = help_line(state);
        queue!(
            out,
            cursor::MoveTo(0, view_rows),
            style::PrintStyledContent(fit_line(&status, cols).with(Color::White)),
            cursor::MoveTo(0, view_rows + 1),
            style::PrintStyledContent(
                fit_line(&help, cols)
                    .with(Color::DarkGrey)
                    .attribute(Attribute::Dim)
            ),
        )?;
        out.flush()
    }
}

fn surface_color(surface: Surface) -> Color {
    match surface {
        Surface::Ceiling => Color::Black,
        Surface::Floor => Color::DarkGrey,
        Surface::LeftWall | Surface::RightWall => Color::Grey,
        Surface::LeftOpening | Surface::RightOpening => Color::Black,
        Surface::BackWall => Color::White,
        Surface::Goal => Color::Cyan,
        Surface::Fog => Color::DarkBlue,
    }
}

/// Samples the projected view once per terminal cell and paints runs of equal color.
fn paint_view<W: Write>(
    out: &mut W,
    view: &CorridorView,
    view_cols: u16,
    view_rows: u16,
) -> io::Result<()> {
    for row in 0..view_rows {
        out.queue(cursor::MoveTo(0, row))?;
        let y = (row as f32 + 0.5) * ROW_ASPECT;
        let mut current = None;
        let mut run = String::new();
        for col in 0..view_cols {
            let color = view
                .surface_at(Point::new(col as f32 + 0.5, y))
                .map_or(Color::Reset, surface_color);
            if current != Some(color) {
                if let Some(prev) = current {
                    out.queue(style::PrintStyledContent(run.as_str().on(prev)))?;
                    run.clear();
                }
                current = Some(color);
            }
            run.push(' ');
        }
        if let Some(color) = current {
            out.queue(style::PrintStyledContent(run.as_str().on(color)))?;
        }
    }
    Ok(())
}

/// One map symbol as a tile exactly [`TILE_WIDTH`] columns wide.
fn map_tile(symbol: char, facing: Facing) -> StyledContent<String> {
    let blank = |color: Color| "  ".to_string().on(color);
    let tile = match symbol {
        '#' => blank(Color::Grey),
        ' ' => blank(Color::White),
        'S' => blank(Color::Red),
        'E' => blank(Color::Cyan),
        Cell::OUT_OF_BOUNDS | Cell::UNKNOWN => blank(Color::Black),
        c if c == facing.glyph() => format!("{} ", c).with(Color::White).on(Color::Blue),
        _ => blank(Color::Magenta),
    };

    #[cfg(debug_assertions)]
    {
        assert_eq!(
            tile.content().width(),
            TILE_WIDTH as usize,
            "Each tile must occupy exactly two character widths."
        );
    }

    tile
}

/// Compass letters with the facing one highlighted, then the minimap below.
fn paint_sidebar<W: Write>(
    out: &mut W,
    x: u16,
    facing: Facing,
    minimap: &[Vec<char>],
) -> io::Result<()> {
    out.queue(cursor::MoveTo(x, 0))?;
    for direction in Facing::ALL {
        let letter = format!("{} ", direction.letter());
        if direction == facing {
            out.queue(style::PrintStyledContent(
                letter.with(Color::White).on(Color::Blue).attribute(Attribute::Bold),
            ))?;
        } else {
            out.queue(style::PrintStyledContent(letter.with(Color::DarkGrey)))?;
        }
    }
    for (i, row) in minimap.iter().enumerate() {
        out.queue(cursor::MoveTo(x, 2 + i as u16))?;
        for &symbol in row {
            out.queue(style::PrintStyledContent(map_tile(symbol, facing)))?;
        }
    }
    Ok(())
}

/// The `avail` long slice of `0..len` that keeps `center` as close to the middle as possible.
fn window(len: usize, avail: usize, center: usize) -> Range<usize> {
    if len <= avail {
        return 0..len;
    }
    let start = center.saturating_sub(avail / 2).min(len - avail);
    start..start + avail
}

/// The discovered part of the maze, clipped around the player when it does not fit.
fn paint_full_map<W: Write>(
    out: &mut W,
    state: &GameState,
    view_cols: u16,
    view_rows: u16,
) -> io::Result<()> {
    let navigator = state.navigator();
    let map = navigator.full_map();
    let (px, py) = navigator.position();
    let xs = window(map.len(), (view_cols / TILE_WIDTH) as usize, px as usize);
    let ys = window(map.len(), view_rows as usize, py as usize);
    for (row, y) in ys.enumerate() {
        out.queue(cursor::MoveTo(0, row as u16))?;
        for x in xs.clone() {
            out.queue(style::PrintStyledContent(map_tile(
                map[y][x],
                navigator.facing(),
            )))?;
        }
    }
    Ok(())
}

fn paint_settings<W: Write>(out: &mut W, state: &GameState, view_cols: u16) -> io::Result<()> {
    let width = view_cols as usize;
    queue!(
        out,
        cursor::MoveTo(0, 0),
        style::PrintStyledContent(
            fit_line("Key bindings", view_cols)
                .with(Color::Yellow)
                .attribute(Attribute::Reverse)
        ),
    )?;

    let controls = state.controls();
    for (i, action) in Action::ALL.into_iter().enumerate() {
        let line = format!("  {:<14}{}", action.to_string(), controls.key_for(action));
        let line = fit_line(&line, view_cols);
        out.queue(cursor::MoveTo(0, 2 + i as u16))?;
        if state.mode() == Mode::Remapping(action) {
            out.queue(style::PrintStyledContent(
                line.with(Color::Black).on(Color::Yellow),
            ))?;
        } else {
            out.queue(style::PrintStyledContent(line.with(Color::Cyan)))?;
        }
    }

    let prompt = match state.mode() {
        Mode::Remapping(action) => {
            format!("Press the new key for {}. Tab cancels.", action)
        }
        _ => "Press a bound key to change it. Backspace restores the defaults.".to_string(),
    };
    let row = 3 + Action::ALL.len() as u16;
    queue!(
        out,
        cursor::MoveTo(0, row),
        style::PrintStyledContent(truncate(&prompt, width).with(Color::White)),
    )?;

    if let Some(feedback) = state.feedback() {
        let (text, color) = feedback_message(feedback);
        queue!(
            out,
            cursor::MoveTo(0, row + 2),
            style::PrintStyledContent(
                truncate(&text, width)
                    .with(color)
                    .attribute(Attribute::Bold)
            ),
        )?;
    }
    Ok(())
}

fn feedback_message(feedback: Feedback) -> (String, Color) {
    match feedback {
        Feedback::Remapped { action, key } => (format!("{} is now {}", action, key), Color::Green),
        Feedback::Reset => ("Controls restored to defaults".to_string(), Color::Green),
        Feedback::Rejected(e @ RemapError::KeyTaken { .. }) => (e.to_string(), Color::Yellow),
        Feedback::Rejected(e @ RemapError::InvalidKey) => (e.to_string(), Color::Red),
    }
}

fn paint_win_pane<W: Write>(out: &mut W, view_cols: u16, view_rows: u16) -> io::Result<()> {
    let lines = [
        "You found the way out!",
        "Enter: new maze    Esc: quit",
    ];
    let top = (view_rows / 2).saturating_sub(1);
    for (i, line) in lines.iter().enumerate() {
        let text = truncate(line, view_cols as usize);
        let x = (view_cols as usize).saturating_sub(text.width()) / 2;
        queue!(
            out,
            cursor::MoveTo(x as u16, top + i as u16),
            style::PrintStyledContent(
                text.with(Color::Black)
                    .on(Color::Green)
                    .attribute(Attribute::Bold)
            ),
        )?;
    }
    Ok(())
}

fn status_line(state: &GameState, scan: &CorridorScan) -> String {
    let navigator = state.navigator();
    let facing = navigator.facing();
    let (x, y) = navigator.position();
    let mut status = format!("Facing {} {} | ({}, {})", facing, facing.glyph(), x, y);
    if let Some(distance) = scan.goal_distance() {
        status.push_str(&format!(" | exit {} ahead", distance));
    }
    match state.last_move() {
        Some(MoveOutcome::Blocked) => status.push_str(" | a wall blocks the way"),
        Some(MoveOutcome::ReachedEnd) => status.push_str(" | you reached the exit"),
        Some(MoveOutcome::Moved(_)) | None => {}
    }
    status
}

fn help_line(state: &GameState) -> String {
    if state.is_won() {
        return "Enter: new maze  Esc: quit".to_string();
    }
    match state.mode() {
        Mode::Exploring => {
            let controls: &ControlMap = state.controls();
            format!(
                "{}: forward  {}/{}: turn  {}: map  Tab: settings  Esc: quit",
                controls.key_for(Action::Forward),
                controls.key_for(Action::TurnLeft),
                controls.key_for(Action::TurnRight),
                controls.key_for(Action::OpenMap),
            )
        }
        Mode::MapOpen => "Any key: close map  Esc: quit".to_string(),
        Mode::Settings | Mode::Remapping(_) => "Tab: back to the maze  Esc: quit".to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    let (truncated, _) = text.unicode_truncate(width);
    truncated.to_string()
}

/// Truncate or pad `text` to exactly `cols` columns.
fn fit_line(text: &str, cols: u16) -> String {
    let (truncated, width) = text.unicode_truncate(cols as usize);
    let mut line = truncated.to_string();
    line.extend(std::iter::repeat_n(' ', cols as usize - width));
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::game::game_state::Input,
        controls::Key,
        maze::Maze,
        navigator::MazeNavigator,
    };

    fn state() -> GameState {
        let maze = Maze::from_rows(&["#####", "#S  #", "### #", "#E  #", "#####"]);
        GameState::new(MazeNavigator::new(maze), ControlMap::default())
    }

    #[test]
    fn test_tiles_are_two_columns_wide() {
        for symbol in ['#', ' ', 'S', 'E', Cell::OUT_OF_BOUNDS, Cell::UNKNOWN, '?'] {
            assert_eq!(map_tile(symbol, Facing::North).content().width(), 2);
        }
        for facing in Facing::ALL {
            assert_eq!(map_tile(facing.glyph(), facing).content().width(), 2);
        }
    }

    #[test]
    fn test_window_keeps_center_visible() {
        assert_eq!(window(5, 10, 2), 0..5);
        assert_eq!(window(51, 10, 0), 0..10);
        assert_eq!(window(51, 10, 25), 20..30);
        assert_eq!(window(51, 10, 50), 41..51);
    }

    #[test]
    fn test_fit_line() {
        assert_eq!(fit_line("abc", 5), "abc  ");
        assert_eq!(fit_line("abcdef", 4), "abcd");
        assert_eq!(fit_line("→→→", 2).width(), 2);
    }

    #[test]
    fn test_draw_marks_minimap_discovered() {
        let mut state = state();
        let renderer = Renderer::new(5, 2);
        let mut out = Vec::new();
        renderer.draw_sized(&mut out, &mut state, 80, 24).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("Facing South"));
        assert!(state.navigator().is_discovered((1, 1)));
        assert!(state.navigator().is_discovered((3, 3)));
        assert!(!state.navigator().is_discovered((4, 4)));
    }

    #[test]
    fn test_draw_every_mode() {
        let mut state = state();
        let renderer = Renderer::new(5, 2);
        for input in [
            Input::Key(Key::Char('M')),
            Input::Key(Key::Char('M')),
            Input::ToggleSettings,
            Input::Key(Key::Char('W')),
            Input::Unbindable,
        ] {
            state.handle(input);
            let mut out = Vec::new();
            renderer.draw_sized(&mut out, &mut state, 80, 24).unwrap();
            assert!(!out.is_empty());
        }
        assert!(matches!(state.feedback(), Some(Feedback::Rejected(_))));
    }

    #[test]
    fn test_small_terminal_gets_a_message() {
        let mut state = state();
        let mut out = Vec::new();
        Renderer::new(5, 2)
            .draw_sized(&mut out, &mut state, 20, 5)
            .unwrap();
        assert!(String::from_utf8_lossy(&out).contains("too small"));
        assert!(!state.navigator().is_discovered((1, 1)));
    }

    #[test]
    fn test_oversized_minimap_radius_is_capped() {
        let renderer = Renderer::new(5, 40_000);
        assert_eq!(renderer.sidebar_cols(), 44);
        let mut state = state();
        let mut out = Vec::new();
        renderer.draw_sized(&mut out, &mut state, 80, 30).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("Facing South"));
    }

    #[test]
    fn test_status_line_reports_goal_and_bumps() {
        let mut state = state();
        state.handle(Input::Key(Key::Char('W')));
        let scan = state.navigator().scan_corridors(4);
        let status = status_line(&state, &scan);
        assert!(status.starts_with("Facing South"));
        assert!(status.contains("wall"));
        assert!(!status.contains("exit"));
    }
}
