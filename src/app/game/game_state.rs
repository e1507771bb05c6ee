use crate::{
    controls::{Action, ControlMap, Key},
    error::RemapError,
    navigator::{MazeNavigator, MoveOutcome},
};

/// What the player is currently interacting with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Walking the maze with the bound keys.
    Exploring,
    /// The full map overlay is open. Any key closes it.
    MapOpen,
    /// The key binding pane. Pressing a bound key selects that action for remapping.
    Settings,
    /// Waiting for the new key for the given action.
    Remapping(Action),
}

/// Result of the last settings interaction, shown in the settings pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Remapped { action: Action, key: Key },
    Rejected(RemapError),
    Reset,
}

/// A key press already translated from the terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A key that could be bound to an action.
    Key(Key),
    /// A key that can never be bound, like punctuation.
    Unbindable,
    /// Open or close the settings pane.
    ToggleSettings,
    /// Restore the default bindings while in the settings pane.
    ResetControls,
}

/// What the game loop should do after an input is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Nothing changed.
    Ignored,
    Redraw,
    /// The bindings changed and should be persisted, then redrawn.
    ControlsChanged,
}

pub struct GameState {
    navigator: MazeNavigator,
    controls: ControlMap,
    mode: Mode,
    feedback: Option<Feedback>,
    last_move: Option<MoveOutcome>,
}

impl GameState {
    pub fn new(navigator: MazeNavigator, controls: ControlMap) -> Self {
        GameState {
            navigator,
            controls,
            mode: Mode::Exploring,
            feedback: None,
            last_move: None,
        }
    }

    pub fn navigator(&self) -> &MazeNavigator {
        &self.navigator
    }

    /// Mutable access for the queries that mark cells as discovered.
    pub fn navigator_mut(&mut self) -> &mut MazeNavigator {
        &mut self.navigator
    }

    pub fn controls(&self) -> &ControlMap {
        &self.controls
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn last_move(&self) -> Option<MoveOutcome> {
        self.last_move
    }

    pub fn is_won(&self) -> bool {
        self.navigator.check_win()
    }

    /// Apply one input to the state.
    /// Once the maze is won every input is ignored; the game loop decides
    /// between a new maze and quitting.
    pub fn handle(&mut self, input: Input) -> Update {
        if self.is_won() {
            return Update::Ignored;
        }
        match self.mode {
            Mode::Exploring => self.handle_exploring(input),
            Mode::MapOpen => {
                self.mode = Mode::Exploring;
                Update::Redraw
            }
            Mode::Settings => self.handle_settings(input),
            Mode::Remapping(action) => self.handle_remapping(action, input),
        }
    }

    fn handle_exploring(&mut self, input: Input) -> Update {
        let key = match input {
            Input::Key(key) => key,
            Input::ToggleSettings => {
                self.mode = Mode::Settings;
                self.feedback = None;
                return Update::Redraw;
            }
            Input::Unbindable | Input::ResetControls => return Update::Ignored,
        };
        let Some(action) = self.controls.action_for(key) else {
            return Update::Ignored;
        };
        match action {
            Action::Forward => {
                let outcome = self.navigator.move_forward();
                tracing::trace!("[game] forward: {:?}", outcome);
                self.last_move = Some(outcome);
            }
            Action::TurnLeft => {
                self.navigator.turn_left();
                self.last_move = None;
            }
            Action::TurnRight => {
                self.navigator.turn_right();
                self.last_move = None;
            }
            Action::OpenMap => self.mode = Mode::MapOpen,
        }
        Update::Redraw
    }

    fn handle_settings(&mut self, input: Input) -> Update {
        match input {
            Input::ToggleSettings => {
                self.mode = Mode::Exploring;
                self.feedback = None;
                Update::Redraw
            }
            Input::ResetControls => {
                self.controls.reset();
                self.feedback = Some(Feedback::Reset);
                tracing::info!("[game] controls reset to defaults");
                Update::ControlsChanged
            }
            Input::Key(key) => match self.controls.action_for(key) {
                Some(action) => {
                    self.mode = Mode::Remapping(action);
                    self.feedback = None;
                    Update::Redraw
                }
                None => Update::Ignored,
            },
            Input::Unbindable => Update::Ignored,
        }
    }

    /// Remapping always returns to the settings pane, whether the new key was accepted or not.
    fn handle_remapping(&mut self, action: Action, input: Input) -> Update {
        self.mode = Mode::Settings;
        let result = match input {
            Input::ToggleSettings => {
                self.feedback = None;
                return Update::Redraw;
            }
            Input::Key(key) => self.controls.remap(action, key).map(|()| key),
            Input::Unbindable | Input::ResetControls => Err(RemapError::InvalidKey),
        };
        match result {
            Ok(key) => {
                self.feedback = Some(Feedback::Remapped { action, key });
                Update::ControlsChanged
            }
            Err(e) => {
                tracing::debug!("[game] remapping {} rejected: {}", action, e);
                self.feedback = Some(Feedback::Rejected(e));
                Update::Redraw
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Facing, Maze};

    fn state() -> GameState {
        let maze = Maze::from_rows(&["#####", "#S  #", "### #", "#E  #", "#####"]);
        GameState::new(MazeNavigator::new(maze), ControlMap::default())
    }

    fn press(state: &mut GameState, c: char) -> Update {
        state.handle(Input::Key(Key::Char(c)))
    }

    #[test]
    fn test_bound_keys_drive_the_navigator() {
        let mut state = state();
        assert_eq!(state.navigator().facing(), Facing::South);
        assert_eq!(press(&mut state, 'W'), Update::Redraw);
        assert_eq!(state.last_move(), Some(MoveOutcome::Blocked));

        assert_eq!(press(&mut state, 'A'), Update::Redraw);
        assert_eq!(state.navigator().facing(), Facing::East);
        press(&mut state, 'W');
        assert_eq!(state.last_move(), Some(MoveOutcome::Moved((2, 1))));
        assert_eq!(state.navigator().position(), (2, 1));

        assert_eq!(press(&mut state, 'D'), Update::Redraw);
        assert_eq!(state.navigator().facing(), Facing::South);
        assert_eq!(state.last_move(), None);

        assert_eq!(press(&mut state, 'Q'), Update::Ignored);
        assert_eq!(state.handle(Input::Unbindable), Update::Ignored);
    }

    #[test]
    fn test_map_opens_and_any_key_closes_it() {
        let mut state = state();
        press(&mut state, 'M');
        assert_eq!(state.mode(), Mode::MapOpen);
        // The key that closes the map does nothing else
        assert_eq!(press(&mut state, 'A'), Update::Redraw);
        assert_eq!(state.mode(), Mode::Exploring);
        assert_eq!(state.navigator().facing(), Facing::South);
    }

    #[test]
    fn test_remap_flow() {
        let mut state = state();
        state.handle(Input::ToggleSettings);
        assert_eq!(state.mode(), Mode::Settings);

        press(&mut state, 'W');
        assert_eq!(state.mode(), Mode::Remapping(Action::Forward));
        assert_eq!(state.handle(Input::Key(Key::Up)), Update::ControlsChanged);
        assert_eq!(state.mode(), Mode::Settings);
        assert_eq!(
            state.feedback(),
            Some(Feedback::Remapped {
                action: Action::Forward,
                key: Key::Up
            })
        );

        state.handle(Input::ToggleSettings);
        assert_eq!(state.mode(), Mode::Exploring);
        assert_eq!(press(&mut state, 'W'), Update::Ignored);
        assert_eq!(state.handle(Input::Key(Key::Up)), Update::Redraw);
        assert_eq!(state.last_move(), Some(MoveOutcome::Blocked));
    }

    #[test]
    fn test_remap_rejections_return_to_settings() {
        let mut state = state();
        state.handle(Input::ToggleSettings);

        press(&mut state, 'W');
        assert_eq!(press(&mut state, 'D'), Update::Redraw);
        assert_eq!(state.mode(), Mode::Settings);
        assert_eq!(
            state.feedback(),
            Some(Feedback::Rejected(RemapError::KeyTaken {
                action: Action::TurnRight
            }))
        );

        press(&mut state, 'W');
        state.handle(Input::Unbindable);
        assert_eq!(
            state.feedback(),
            Some(Feedback::Rejected(RemapError::InvalidKey))
        );
        assert_eq!(state.controls(), &ControlMap::default());
    }

    #[test]
    fn test_tab_aborts_remapping() {
        let mut state = state();
        state.handle(Input::ToggleSettings);
        press(&mut state, 'M');
        assert_eq!(state.handle(Input::ToggleSettings), Update::Redraw);
        assert_eq!(state.mode(), Mode::Settings);
        assert_eq!(state.feedback(), None);
    }

    #[test]
    fn test_reset_controls() {
        let mut state = state();
        state.handle(Input::ToggleSettings);
        press(&mut state, 'A');
        state.handle(Input::Key(Key::Left));
        assert_eq!(state.handle(Input::ResetControls), Update::ControlsChanged);
        assert_eq!(state.controls(), &ControlMap::default());
        assert_eq!(state.feedback(), Some(Feedback::Reset));
    }

    #[test]
    fn test_input_ignored_after_win() {
        let maze = Maze::from_rows(&["#####", "#S  #", "#E# #", "#   #", "#####"]);
        let mut state = GameState::new(MazeNavigator::new(maze), ControlMap::default());
        press(&mut state, 'W');
        assert!(state.is_won());
        assert_eq!(state.last_move(), Some(MoveOutcome::ReachedEnd));

        assert_eq!(press(&mut state, 'A'), Update::Ignored);
        assert_eq!(state.handle(Input::ToggleSettings), Update::Ignored);
        assert_eq!(state.navigator().facing(), Facing::South);
    }
}
