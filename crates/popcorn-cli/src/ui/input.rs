use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use popcorn_core::{Action, KeyListener, SidePanel, ViewModel};
use popcorn_models::{SearchResultItem, WatchedEntry};

/// Which list the cursor keys move when the search input is not focused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Results,
    Side,
}

/// Presentation-only state; everything else lives in the controller
#[derive(Debug, Default)]
pub struct UiState {
    pub panel: Panel,
    pub results_cursor: usize,
    pub watched_cursor: usize,
    pub results_collapsed: bool,
    pub side_collapsed: bool,
}

#[derive(Debug, PartialEq)]
pub enum KeyOutcome {
    Quit,
    /// A registered key handler ran
    Handled,
    Action(Action),
    Ignored,
}

impl UiState {
    /// Keep cursors inside lists that may have shrunk since the last frame
    pub fn clamp(&mut self, view: &ViewModel) {
        self.results_cursor = self.results_cursor.min(view.results.items().len().saturating_sub(1));
        self.watched_cursor = self.watched_cursor.min(watched_entries(view).len().saturating_sub(1));
    }

    pub fn highlighted_result<'a>(&self, view: &'a ViewModel) -> Option<&'a SearchResultItem> {
        view.results.items().get(self.results_cursor)
    }

    pub fn highlighted_watched<'a>(&self, view: &'a ViewModel) -> Option<&'a WatchedEntry> {
        watched_entries(view).get(self.watched_cursor)
    }

    pub fn is_collapsed(&self, panel: Panel) -> bool {
        match panel {
            Panel::Results => self.results_collapsed,
            Panel::Side => self.side_collapsed,
        }
    }

    /// Fold or unfold the focused panel
    fn toggle_collapsed(&mut self) {
        let collapsed = match self.panel {
            Panel::Results => &mut self.results_collapsed,
            Panel::Side => &mut self.side_collapsed,
        };
        *collapsed = !*collapsed;
    }

    fn move_cursor(&mut self, view: &ViewModel, down: bool) {
        let (cursor, len) = match self.panel {
            Panel::Results => (&mut self.results_cursor, view.results.items().len()),
            Panel::Side => (&mut self.watched_cursor, watched_entries(view).len()),
        };
        if down {
            if *cursor + 1 < len {
                *cursor += 1;
            }
        } else {
            *cursor = cursor.saturating_sub(1);
        }
    }
}

fn watched_entries(view: &ViewModel) -> &[WatchedEntry] {
    match &view.side {
        SidePanel::Watched { entries, .. } => entries,
        SidePanel::Detail(_) => &[],
    }
}

/// Name a key the way handlers register for it ("Enter", "Escape", "a", ...)
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Tab => "Tab",
        KeyCode::BackTab => "BackTab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Char(' ') => "Space",
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) => return Some(format!("F{}", n)),
        _ => return None,
    };
    Some(name.to_string())
}

/// Route one key press.
///
/// Registered handlers win; keys nobody is bound to fall through to the
/// focused widget.
pub fn handle_key(key: KeyEvent, keys: &KeyListener, ui: &mut UiState, view: &ViewModel) -> KeyOutcome {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }

    if let Some(name) = key_name(key.code) {
        if keys.dispatch(&name) > 0 {
            return KeyOutcome::Handled;
        }
    }

    if view.search_focused {
        search_key(key, ui, view)
    } else {
        panel_key(key, ui, view)
    }
}

fn search_key(key: KeyEvent, ui: &mut UiState, view: &ViewModel) -> KeyOutcome {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut query = view.query.clone();
            query.push(c);
            KeyOutcome::Action(Action::SetQuery(query))
        }
        KeyCode::Backspace => {
            let mut query = view.query.clone();
            if query.pop().is_none() {
                return KeyOutcome::Ignored;
            }
            KeyOutcome::Action(Action::SetQuery(query))
        }
        KeyCode::Tab | KeyCode::Down | KeyCode::Esc => {
            ui.panel = Panel::Results;
            KeyOutcome::Action(Action::BlurSearch)
        }
        KeyCode::BackTab => {
            ui.panel = Panel::Side;
            KeyOutcome::Action(Action::BlurSearch)
        }
        _ => KeyOutcome::Ignored,
    }
}

fn panel_key(key: KeyEvent, ui: &mut UiState, view: &ViewModel) -> KeyOutcome {
    let detail_open = matches!(view.side, SidePanel::Detail(_));
    let folded = ui.is_collapsed(ui.panel);

    match key.code {
        KeyCode::Char('q') => KeyOutcome::Quit,
        KeyCode::Char('-') => {
            ui.toggle_collapsed();
            KeyOutcome::Handled
        }
        KeyCode::Char('/') => KeyOutcome::Action(Action::ResumeSearch),
        KeyCode::Tab => match ui.panel {
            Panel::Results => {
                ui.panel = Panel::Side;
                KeyOutcome::Handled
            }
            Panel::Side => {
                ui.panel = Panel::Results;
                KeyOutcome::Action(Action::ResumeSearch)
            }
        },
        KeyCode::BackTab => match ui.panel {
            Panel::Results => KeyOutcome::Action(Action::ResumeSearch),
            Panel::Side => {
                ui.panel = Panel::Results;
                KeyOutcome::Handled
            }
        },
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Down | KeyCode::Char('j') | KeyCode::Right | KeyCode::Char('o')
            if folded =>
        {
            KeyOutcome::Ignored
        }
        KeyCode::Up | KeyCode::Char('k') => {
            ui.move_cursor(view, false);
            KeyOutcome::Handled
        }
        KeyCode::Down | KeyCode::Char('j') => {
            ui.move_cursor(view, true);
            KeyOutcome::Handled
        }
        KeyCode::Right | KeyCode::Char('o') => {
            let id = match ui.panel {
                Panel::Results => ui.highlighted_result(view).map(|m| m.imdb_id.clone()),
                Panel::Side => ui.highlighted_watched(view).map(|m| m.imdb_id.clone()),
            };
            id.map_or(KeyOutcome::Ignored, |id| KeyOutcome::Action(Action::Select(id)))
        }
        KeyCode::Left if detail_open => KeyOutcome::Action(Action::Close),
        KeyCode::Char(c @ '0'..='9') if detail_open => {
            let rating = match c.to_digit(10) {
                Some(0) => 10,
                Some(d) => d as u8,
                None => return KeyOutcome::Ignored,
            };
            KeyOutcome::Action(Action::SetUserRating(rating))
        }
        KeyCode::Char('a') | KeyCode::Char('+') if detail_open => KeyOutcome::Action(Action::AddWatched),
        KeyCode::Char('d') | KeyCode::Delete if ui.panel == Panel::Side && !folded => ui
            .highlighted_watched(view)
            .map_or(KeyOutcome::Ignored, |m| KeyOutcome::Action(Action::RemoveWatched(m.imdb_id.clone()))),
        _ => KeyOutcome::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_core::{DetailPanel, ResultsPanel, WatchedSummary};
    use popcorn_models::MovieDetail;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn view(search_focused: bool, side: SidePanel) -> ViewModel {
        let results = vec![
            SearchResultItem {
                imdb_id: "tt0372784".to_string(),
                title: "Batman Begins".to_string(),
                year: "2005".to_string(),
                poster: "N/A".to_string(),
            },
            SearchResultItem {
                imdb_id: "tt1877830".to_string(),
                title: "The Batman".to_string(),
                year: "2022".to_string(),
                poster: "N/A".to_string(),
            },
        ];
        ViewModel {
            query: "bat".to_string(),
            search_focused,
            result_count: results.len(),
            results: ResultsPanel::List(results),
            side,
        }
    }

    fn watched_side() -> SidePanel {
        let entry = WatchedEntry {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster: "N/A".to_string(),
            imdb_rating: 8.8,
            user_rating: 10,
            runtime: 148,
            added_at: None,
        };
        SidePanel::Watched {
            summary: WatchedSummary::from_entries(std::slice::from_ref(&entry)),
            entries: vec![entry],
        }
    }

    fn detail_side() -> SidePanel {
        SidePanel::Detail(DetailPanel::Loaded {
            detail: MovieDetail::default(),
            watched_rating: None,
            draft_rating: None,
        })
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(KeyCode::Enter).as_deref(), Some("Enter"));
        assert_eq!(key_name(KeyCode::Esc).as_deref(), Some("Escape"));
        assert_eq!(key_name(KeyCode::Char('a')).as_deref(), Some("a"));
        assert_eq!(key_name(KeyCode::F(5)).as_deref(), Some("F5"));
        assert_eq!(key_name(KeyCode::Null), None);
    }

    #[test]
    fn test_registered_handler_takes_precedence() {
        let keys = KeyListener::new();
        let _enter = keys.on_key("Enter", || {});
        let mut ui = UiState::default();

        let outcome = handle_key(press(KeyCode::Enter), &keys, &mut ui, &view(true, watched_side()));
        assert_eq!(outcome, KeyOutcome::Handled);
    }

    #[test]
    fn test_typing_edits_query() {
        let keys = KeyListener::new();
        let mut ui = UiState::default();
        let v = view(true, watched_side());

        assert_eq!(
            handle_key(press(KeyCode::Char('m')), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::SetQuery("batm".to_string()))
        );
        assert_eq!(
            handle_key(press(KeyCode::Backspace), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::SetQuery("ba".to_string()))
        );
        // 'q' is text while typing
        assert_eq!(
            handle_key(press(KeyCode::Char('q')), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::SetQuery("batq".to_string()))
        );
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let keys = KeyListener::new();
        let mut ui = UiState::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ctrl_c, &keys, &mut ui, &view(true, watched_side())), KeyOutcome::Quit);
        assert_eq!(handle_key(ctrl_c, &keys, &mut ui, &view(false, watched_side())), KeyOutcome::Quit);
    }

    #[test]
    fn test_cursor_and_select() {
        let keys = KeyListener::new();
        let mut ui = UiState::default();
        let v = view(false, watched_side());

        handle_key(press(KeyCode::Down), &keys, &mut ui, &v);
        handle_key(press(KeyCode::Down), &keys, &mut ui, &v);
        assert_eq!(ui.results_cursor, 1);

        assert_eq!(
            handle_key(press(KeyCode::Right), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::Select("tt1877830".to_string()))
        );
    }

    #[test]
    fn test_zero_key_rates_ten() {
        let keys = KeyListener::new();
        let mut ui = UiState::default();
        let v = view(false, detail_side());

        assert_eq!(
            handle_key(press(KeyCode::Char('0')), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::SetUserRating(10))
        );
        assert_eq!(
            handle_key(press(KeyCode::Char('7')), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::SetUserRating(7))
        );
        // Without an open movie digits do nothing
        assert_eq!(
            handle_key(press(KeyCode::Char('7')), &keys, &mut ui, &view(false, watched_side())),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn test_delete_highlighted_watched_entry() {
        let keys = KeyListener::new();
        let mut ui = UiState::default();
        let v = view(false, watched_side());

        assert_eq!(handle_key(press(KeyCode::Tab), &keys, &mut ui, &v), KeyOutcome::Handled);
        assert_eq!(ui.panel, Panel::Side);
        assert_eq!(
            handle_key(press(KeyCode::Char('d')), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::RemoveWatched("tt1375666".to_string()))
        );
        assert_eq!(
            handle_key(press(KeyCode::Tab), &keys, &mut ui, &v),
            KeyOutcome::Action(Action::ResumeSearch)
        );
    }

    #[test]
    fn test_clamp_after_list_shrinks() {
        let mut ui = UiState {
            panel: Panel::Results,
            results_cursor: 5,
            watched_cursor: 3,
            ..Default::default()
        };
        ui.clamp(&view(false, watched_side()));
        assert_eq!(ui.results_cursor, 1);
        assert_eq!(ui.watched_cursor, 0);
    }

    #[test]
    fn test_minus_folds_focused_panel() {
        let keys = KeyListener::new();
        let mut ui = UiState::default();
        let v = view(false, watched_side());

        assert_eq!(handle_key(press(KeyCode::Char('-')), &keys, &mut ui, &v), KeyOutcome::Handled);
        assert!(ui.is_collapsed(Panel::Results));
        assert!(!ui.is_collapsed(Panel::Side));
        // A folded list cannot be navigated
        assert_eq!(handle_key(press(KeyCode::Down), &keys, &mut ui, &v), KeyOutcome::Ignored);
        assert_eq!(handle_key(press(KeyCode::Right), &keys, &mut ui, &v), KeyOutcome::Ignored);
        assert_eq!(ui.results_cursor, 0);

        handle_key(press(KeyCode::Tab), &keys, &mut ui, &v);
        handle_key(press(KeyCode::Char('-')), &keys, &mut ui, &v);
        assert!(ui.is_collapsed(Panel::Side));
        assert_eq!(handle_key(press(KeyCode::Char('d')), &keys, &mut ui, &v), KeyOutcome::Ignored);

        handle_key(press(KeyCode::Char('-')), &keys, &mut ui, &v);
        assert!(!ui.is_collapsed(Panel::Side));
        assert!(ui.is_collapsed(Panel::Results));
    }
}
