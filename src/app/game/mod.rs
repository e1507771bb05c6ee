pub(crate) mod game_state;

use std::{
    io::{Stdout, Write},
    path::Path,
    sync::{
        Arc,
        atomic::AtomicBool,
        mpsc::{Receiver, Sender},
    },
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    execute,
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::Renderer,
    controls::Key,
    generators::get_rng,
    navigator::MazeNavigator,
    settings::Settings,
};
use game_state::{GameState, Input, Update};

#[derive(Debug)]
enum UserInputEvent {
    KeyPress(event::KeyEvent),
    Resize,
}

#[derive(Debug, PartialEq)]
enum GameRunResult {
    /// The exit was reached and the player asked for a new maze
    NewMaze,
    /// Game is canceled by user
    Canceled,
}

/// Timeout for polling input events in the input thread, a.k.a.
/// how often to check whether the game asked it to stop
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// Timeout for receiving input events in the game loop
const INPUT_RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Translate a terminal key code into game input.
/// Returns `None` for keys the game loop handles itself or ignores.
fn to_input(code: KeyCode) -> Option<Input> {
    let input = match code {
        KeyCode::Tab => Input::ToggleSettings,
        KeyCode::Backspace => Input::ResetControls,
        KeyCode::Up => Input::Key(Key::Up),
        KeyCode::Down => Input::Key(Key::Down),
        KeyCode::Left => Input::Key(Key::Left),
        KeyCode::Right => Input::Key(Key::Right),
        KeyCode::Char(c) => match Key::from_char(c) {
            Ok(key) => Input::Key(key),
            Err(_) => Input::Unbindable,
        },
        _ => return None,
    };
    Some(input)
}

/// Play one maze until it is won and the player moves on, or the player quits
fn start_game(
    stdout: &mut Stdout,
    settings: &mut Settings,
    settings_path: &Path,
) -> std::io::Result<GameRunResult> {
    execute!(
        stdout,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    let mut rng = get_rng(None);
    let navigator = match MazeNavigator::generate(settings.maze_dim, &mut rng) {
        Ok(navigator) => navigator,
        Err(e) => {
            // Settings are validated before the game starts, so this is a bug
            tracing::error!("[game] could not generate maze: {}", e);
            return Ok(GameRunResult::Canceled);
        }
    };
    let mut game_state = GameState::new(navigator, settings.controls);
    let renderer = Renderer::new(settings.view_depth, settings.minimap_radius);
    renderer.draw(stdout, &mut game_state)?;

    // Flag to let the input thread stop. Enabled by the main thread only.
    let should_stop = Arc::new(AtomicBool::new(false));
    let (user_input_event_tx, user_input_event_rx) = std::sync::mpsc::channel::<UserInputEvent>();

    let should_stop_for_input = should_stop.clone();
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(
            user_input_event_tx,
            USER_INPUT_EVENT_POLL_TIMEOUT,
            &should_stop_for_input,
        )
    });

    let game_result = game_loop(
        stdout,
        game_state,
        &renderer,
        settings,
        settings_path,
        user_input_event_rx,
        INPUT_RECV_TIMEOUT,
        &should_stop,
    );
    // Make sure the input thread stops even if the game loop failed
    should_stop.store(true, std::sync::atomic::Ordering::Release);
    tracing::debug!("[game] Game loop exited with result: {:?}", game_result);

    match input_thread_handle.join() {
        Ok(result) => result?,
        Err(_) => tracing::error!("[game] Input thread panicked"),
    }
    tracing::debug!("[game] Input thread finished");
    game_result
}

/// Main game loop, running in the main thread.
/// Applies each key press to the game state, then redraws.
/// Exits when the player quits, or asks for a new maze after winning.
#[allow(clippy::too_many_arguments)]
fn game_loop(
    stdout: &mut Stdout,
    mut game_state: GameState,
    renderer: &Renderer,
    settings: &mut Settings,
    settings_path: &Path,
    user_input_event_rx: Receiver<UserInputEvent>,
    input_recv_timeout: Duration,
    should_stop: &AtomicBool,
) -> std::io::Result<GameRunResult> {
    loop {
        let event = match user_input_event_rx.recv_timeout(input_recv_timeout) {
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                // Input thread has exited
                should_stop.store(true, std::sync::atomic::Ordering::Release);
                return Ok(GameRunResult::Canceled);
            }
            Ok(event) => event,
        };

        let key_event = match event {
            UserInputEvent::Resize => {
                renderer.draw(stdout, &mut game_state)?;
                continue;
            }
            UserInputEvent::KeyPress(key_event) => key_event,
        };

        match key_event.code {
            KeyCode::Esc => {
                should_stop.store(true, std::sync::atomic::Ordering::Release);
                return Ok(GameRunResult::Canceled);
            }
            KeyCode::Enter if game_state.is_won() => {
                tracing::info!("[game loop] New maze requested");
                should_stop.store(true, std::sync::atomic::Ordering::Release);
                return Ok(GameRunResult::NewMaze);
            }
            code => {
                let Some(input) = to_input(code) else {
                    continue;
                };
                match game_state.handle(input) {
                    Update::Ignored => continue,
                    Update::Redraw => {}
                    Update::ControlsChanged => {
                        settings.controls = *game_state.controls();
                        if let Err(e) = settings.save(settings_path) {
                            tracing::warn!("[game loop] could not save settings: {}", e);
                        }
                    }
                }
                renderer.draw(stdout, &mut game_state)?;
                if game_state.is_won() {
                    tracing::info!("[game loop] Exit reached!");
                }
            }
        }
    }
}

/// Listen for user input events (key presses and resize)
/// This function runs in a separate thread, and is the only place where user input is read
fn listen_to_user_input(
    user_input_event_tx: Sender<UserInputEvent>,
    event_poll_timeout: Duration,
    should_stop: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        // Check if we should stop
        if should_stop.load(std::sync::atomic::Ordering::Acquire) {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(event_poll_timeout)? {
            continue;
        }

        let input_event = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                UserInputEvent::KeyPress(key_event)
            }
            event::Event::Resize(_, _) => UserInputEvent::Resize,
            _ => continue,
        };

        // Should exit input thread on Esc key
        let should_exit = matches!(
            input_event,
            UserInputEvent::KeyPress(event::KeyEvent {
                code: KeyCode::Esc,
                ..
            })
        );

        if user_input_event_tx.send(input_event).is_err() {
            // Receiver has been dropped, exit the thread
            return Ok(());
        }

        if should_exit {
            tracing::debug!("[input loop] Esc key pressed, exiting");
            return Ok(());
        }
    }
}

/// Keep playing fresh mazes until the player quits
pub fn run(stdout: &mut Stdout, settings: &mut Settings, settings_path: &Path) -> std::io::Result<()> {
    tracing::info!(
        "[game] Starting with maze size {}x{}, view depth {}",
        settings.maze_dim,
        settings.maze_dim,
        settings.view_depth
    );

    loop {
        let game_result = start_game(stdout, settings, settings_path)?;
        if game_result == GameRunResult::Canceled {
            break;
        }
        tracing::info!("[game] Game result: {:?} Starting a new maze...", game_result);
    }
    tracing::info!("[game] Game was canceled by user, exiting...");
    stdout.flush()
}
