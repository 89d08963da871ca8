use crate::bridge::{self, COPY_FAILED};
use crate::notification::Notifier;
use crate::runner::{AppCommand, AppEvent};
use crate::scenario_ui;
use crate::state::ScenarioStore;
use crate::storage::KeyValueStorage;
use ratatui::Frame;
use std::time::Instant;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use unicode_segmentation::UnicodeSegmentation;

/// The field keyboard input currently goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    NewScenario,
    Input { scenario: String },
    Output { scenario: String, key: String },
    NewKey { scenario: String },
}

impl Focus {
    pub fn scenario(&self) -> Option<&str> {
        match self {
            Focus::NewScenario => None,
            Focus::Input { scenario }
            | Focus::Output { scenario, .. }
            | Focus::NewKey { scenario } => Some(scenario),
        }
    }

    /// Name fields are single-line; text areas accept newlines.
    pub fn is_text_area(&self) -> bool {
        matches!(self, Focus::Input { .. } | Focus::Output { .. })
    }
}

pub struct App<S: KeyValueStorage> {
    pub store: ScenarioStore<S>,
    pub notifier: Notifier,

    pub new_scenario_name: String,
    /// Shared by every scenario's "new output key" field.
    pub new_key_name: String,

    pub focus: Focus,
    pub cursor_g: usize,

    pub tx: UnboundedSender<AppCommand>,
    pub rx: UnboundedReceiver<AppEvent>,
}

impl<S: KeyValueStorage> App<S> {
    pub fn new(
        store: ScenarioStore<S>,
        notifier: Notifier,
        tx: UnboundedSender<AppCommand>,
        rx: UnboundedReceiver<AppEvent>,
    ) -> Self {
        Self {
            store,
            notifier,
            new_scenario_name: String::new(),
            new_key_name: String::new(),
            focus: Focus::NewScenario,
            cursor_g: 0,
            tx,
            rx,
        }
    }

    pub fn tick(&mut self) {
        self.notifier.tick(Instant::now());
    }

    /// Apply every clipboard outcome the worker has reported so far.
    pub fn drain_events(&mut self) {
        while let Ok(ev) = self.rx.try_recv() {
            match ev {
                AppEvent::CopyFinished(result) => bridge::finish_copy(result, &mut self.notifier),
                AppEvent::PasteFinished(result) => {
                    bridge::finish_paste(result, &mut self.store, &mut self.notifier);
                    self.fix_focus();
                }
            }
        }
    }

    /// Returns `true` when the user asked to quit.
    pub fn on_event(&mut self, ev: crossterm::event::Event) -> bool {
        use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
        match ev {
            Event::Key(k) => {
                if k.kind != KeyEventKind::Press {
                    return false;
                }
                if k.modifiers.contains(KeyModifiers::CONTROL) {
                    match k.code {
                        KeyCode::Char('c') | KeyCode::Char('q') => return true,
                        KeyCode::Char('y') => self.copy_to_clipboard(),
                        KeyCode::Char('p') => self.paste_from_clipboard(),
                        KeyCode::Char('d') => self.delete_focused_scenario(),
                        _ => {}
                    }
                    return false;
                }
                match k.code {
                    KeyCode::Tab | KeyCode::Down => self.move_focus(1),
                    KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
                    KeyCode::Enter => self.submit(),
                    KeyCode::Char(c) => self.insert_str(&c.to_string()),
                    KeyCode::Backspace => self.backspace(),
                    KeyCode::Left => self.left(),
                    KeyCode::Right => self.right(),
                    KeyCode::Home => self.cursor_g = 0,
                    KeyCode::End => self.cursor_g = self.focused_text().graphemes(true).count(),
                    _ => {}
                }
            }
            Event::Paste(s) => self.insert_str(&s),
            _ => {}
        }
        false
    }

    pub fn render(&self, f: &mut Frame) {
        scenario_ui::render(f, self);
    }

    /// Every focusable field, top to bottom.
    pub fn focus_targets(&self) -> Vec<Focus> {
        let mut targets = vec![Focus::NewScenario];
        for (name, scenario) in self.store.scenarios() {
            targets.push(Focus::Input {
                scenario: name.clone(),
            });
            for key in scenario.output.keys() {
                targets.push(Focus::Output {
                    scenario: name.clone(),
                    key: key.clone(),
                });
            }
            targets.push(Focus::NewKey {
                scenario: name.clone(),
            });
        }
        targets
    }

    pub fn focused_text(&self) -> String {
        match &self.focus {
            Focus::NewScenario => self.new_scenario_name.clone(),
            Focus::NewKey { .. } => self.new_key_name.clone(),
            Focus::Input { scenario } => self
                .store
                .get(scenario)
                .map(|s| s.input.clone())
                .unwrap_or_default(),
            Focus::Output { scenario, key } => self
                .store
                .get(scenario)
                .and_then(|s| s.output.get(key).cloned())
                .unwrap_or_default(),
        }
    }

    fn set_focused_text(&mut self, text: String) {
        match self.focus.clone() {
            Focus::NewScenario => self.new_scenario_name = text,
            Focus::NewKey { .. } => self.new_key_name = text,
            Focus::Input { scenario } => {
                self.store.set_input(&scenario, &text);
            }
            Focus::Output { scenario, key } => {
                self.store.set_output_value(&scenario, &key, &text);
            }
        }
    }

    fn move_focus(&mut self, step: isize) {
        let targets = self.focus_targets();
        let current = targets.iter().position(|t| *t == self.focus).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(targets.len() as isize) as usize;
        self.focus = targets[next].clone();
        self.cursor_g = self.focused_text().graphemes(true).count();
    }

    /// Fall back to the new-scenario field when the focused field is gone.
    fn fix_focus(&mut self) {
        if !self.focus_targets().contains(&self.focus) {
            self.focus = Focus::NewScenario;
        }
        let n = self.focused_text().graphemes(true).count();
        self.cursor_g = self.cursor_g.min(n);
    }

    fn submit(&mut self) {
        match self.focus.clone() {
            Focus::NewScenario => {
                let name = self.new_scenario_name.clone();
                if self.store.add_scenario(&name) {
                    info!("Added scenario '{}'", name);
                    self.new_scenario_name.clear();
                    self.cursor_g = 0;
                }
            }
            Focus::NewKey { scenario } => {
                let key = self.new_key_name.clone();
                if self.store.add_output_key(&scenario, &key) {
                    debug!("Added output key '{}' to '{}'", key, scenario);
                    self.new_key_name.clear();
                    self.cursor_g = 0;
                }
            }
            Focus::Input { .. } | Focus::Output { .. } => self.insert_str("\n"),
        }
    }

    fn delete_focused_scenario(&mut self) {
        let Some(name) = self.focus.scenario().map(str::to_string) else {
            return;
        };
        if self.store.delete_scenario(&name) {
            info!("Deleted scenario '{}'", name);
            self.fix_focus();
        }
    }

    fn copy_to_clipboard(&mut self) {
        match bridge::export_payload(self.store.scenarios()) {
            Ok(payload) => {
                if self.tx.send(AppCommand::CopyToClipboard { payload }).is_err() {
                    warn!("Clipboard worker is gone");
                    self.notifier.error(COPY_FAILED);
                }
            }
            Err(e) => {
                warn!("Failed to serialize scenarios: {}", e);
                self.notifier.error(COPY_FAILED);
            }
        }
    }

    fn paste_from_clipboard(&mut self) {
        if self.tx.send(AppCommand::PasteFromClipboard).is_err() {
            warn!("Clipboard worker is gone");
            self.notifier.error(bridge::READ_FAILED);
        }
    }

    fn left(&mut self) {
        if self.cursor_g > 0 {
            self.cursor_g -= 1;
        }
    }

    fn right(&mut self) {
        let n = self.focused_text().graphemes(true).count();
        if self.cursor_g < n {
            self.cursor_g += 1;
        }
    }

    fn insert_str(&mut self, s: &str) {
        let s: String = if self.focus.is_text_area() {
            s.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            s.chars().filter(|c| *c != '\n' && *c != '\r').collect()
        };
        if s.is_empty() {
            return;
        }
        let mut text = self.focused_text();
        let bi = byte_idx_for_g(&text, self.cursor_g);
        text.insert_str(bi, &s);
        // graphemes can merge across the boundary, so recount from the start
        self.cursor_g = text[..bi + s.len()].graphemes(true).count();
        self.set_focused_text(text);
    }

    fn backspace(&mut self) {
        if self.cursor_g == 0 {
            return;
        }
        let mut text = self.focused_text();
        let l = byte_idx_for_g(&text, self.cursor_g - 1);
        let r = byte_idx_for_g(&text, self.cursor_g);
        text.replace_range(l..r, "");
        self.set_focused_text(text);
        self.left();
    }
}

fn grapheme_boundaries(s: &str) -> Vec<usize> {
    let mut idxs = vec![0];
    for (i, _) in s.grapheme_indices(true) {
        if i != 0 {
            idxs.push(i);
        }
    }
    idxs.push(s.len());
    idxs.sort_unstable();
    idxs.dedup();
    idxs
}

pub(crate) fn byte_idx_for_g(s: &str, g: usize) -> usize {
    let v = grapheme_boundaries(s);
    *v.get(g).unwrap_or(&s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::storage::MemoryStorage;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use tokio::sync::mpsc;

    fn app_with(
        raw: Option<&str>,
    ) -> (
        App<MemoryStorage>,
        mpsc::UnboundedReceiver<AppCommand>,
        mpsc::UnboundedSender<AppEvent>,
    ) {
        let mut storage = MemoryStorage::new();
        if let Some(raw) = raw {
            storage.set_item("jsonPromptData", raw).unwrap();
        }
        let store = ScenarioStore::load(storage, "jsonPromptData");
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (evt_tx, evt_rx) = mpsc::unbounded_channel();
        (App::new(store, Notifier::default(), cmd_tx, evt_rx), cmd_rx, evt_tx)
    }

    fn key(app: &mut App<MemoryStorage>, code: KeyCode) -> bool {
        app.on_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn ctrl(app: &mut App<MemoryStorage>, c: char) -> bool {
        app.on_event(Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)))
    }

    fn type_str(app: &mut App<MemoryStorage>, s: &str) {
        for c in s.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_add_scenario_from_name_field() {
        let (mut app, _cmd, _evt) = app_with(Some("{}"));
        type_str(&mut app, "Greeting");
        key(&mut app, KeyCode::Enter);

        assert!(app.store.get("Greeting").is_some());
        assert!(app.new_scenario_name.is_empty());

        // duplicate name keeps the buffer
        type_str(&mut app, "Greeting");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.new_scenario_name, "Greeting");
    }

    #[test]
    fn test_edit_input_and_outputs() {
        let (mut app, _cmd, _evt) = app_with(Some("{}"));
        type_str(&mut app, "A");
        key(&mut app, KeyCode::Enter);

        key(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Input { scenario: "A".into() });
        type_str(&mut app, "hi");
        key(&mut app, KeyCode::Enter);
        type_str(&mut app, "there");
        assert_eq!(app.store.get("A").unwrap().input, "hi\nthere");

        key(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::NewKey { scenario: "A".into() });
        type_str(&mut app, "x");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.store.get("A").unwrap().output["x"], "");
        assert!(app.new_key_name.is_empty());

        key(&mut app, KeyCode::BackTab);
        assert_eq!(
            app.focus,
            Focus::Output {
                scenario: "A".into(),
                key: "x".into()
            }
        );
        type_str(&mut app, "y1");
        assert_eq!(app.store.get("A").unwrap().output["x"], "y1");
    }

    #[test]
    fn test_cursor_editing() {
        let (mut app, _cmd, _evt) = app_with(Some("{}"));
        type_str(&mut app, "héllo");
        key(&mut app, KeyCode::Left);
        key(&mut app, KeyCode::Left);
        key(&mut app, KeyCode::Backspace);
        assert_eq!(app.new_scenario_name, "hélo");
        key(&mut app, KeyCode::Home);
        type_str(&mut app, ">");
        assert_eq!(app.new_scenario_name, ">hélo");
    }

    #[test]
    fn test_paste_event_strips_newlines_in_name_field() {
        let (mut app, _cmd, _evt) = app_with(Some("{}"));
        app.on_event(Event::Paste("multi\nline".into()));
        assert_eq!(app.new_scenario_name, "multiline");
    }

    #[test]
    fn test_delete_focused_scenario() {
        let (mut app, _cmd, _evt) = app_with(None);
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.focus.scenario(), Some("Add one simple scenario"));

        ctrl(&mut app, 'd');
        assert!(app.store.get("Add one simple scenario").is_none());
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.focus, Focus::NewScenario);
    }

    #[test]
    fn test_clipboard_commands_and_results() {
        let (mut app, mut cmd_rx, evt_tx) = app_with(Some("{}"));

        ctrl(&mut app, 'y');
        assert_eq!(
            cmd_rx.try_recv().unwrap(),
            AppCommand::CopyToClipboard {
                payload: "{}".into()
            }
        );
        evt_tx.send(AppEvent::CopyFinished(Ok(()))).unwrap();
        app.drain_events();
        assert_eq!(app.notifier.current().unwrap().kind, NotificationKind::Success);

        ctrl(&mut app, 'p');
        assert_eq!(cmd_rx.try_recv().unwrap(), AppCommand::PasteFromClipboard);
        evt_tx
            .send(AppEvent::PasteFinished(Ok(r#"{"P":{"input":"","output":{}}}"#.into())))
            .unwrap();
        app.drain_events();
        assert!(app.store.get("P").is_some());
        assert_eq!(app.notifier.current().unwrap().message, bridge::PASTE_SUCCESS);
    }

    #[test]
    fn test_paste_removing_focused_field_resets_focus() {
        let (mut app, _cmd, evt_tx) = app_with(None);
        key(&mut app, KeyCode::Tab);
        evt_tx.send(AppEvent::PasteFinished(Ok("{}".into()))).unwrap();
        app.drain_events();
        assert!(app.store.is_empty());
        assert_eq!(app.focus, Focus::NewScenario);
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _cmd, _evt) = app_with(Some("{}"));
        assert!(!key(&mut app, KeyCode::Char('q')));
        assert!(ctrl(&mut app, 'q'));
        assert!(ctrl(&mut app, 'c'));
    }

    #[test]
    fn test_byte_idx_for_g() {
        assert_eq!(byte_idx_for_g("aé b", 0), 0);
        assert_eq!(byte_idx_for_g("aé b", 2), 3);
        assert_eq!(byte_idx_for_g("aé b", 99), 5);
    }
}
