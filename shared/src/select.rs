//! Headless select engine.
//!
//! Holds open/highlight/selection state for a single-select list and
//! generates the ids and ARIA values a shell needs to render accessible
//! markup. It never touches the DOM; a shell feeds it [`SelectAction`]s and
//! renders from its state.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

static NEXT_INSTANCE: AtomicUsize = AtomicUsize::new(1);

/// Element ids for one select instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectIds {
    prefix: String,
}

impl SelectIds {
    /// Ids for a fresh instance, unique within the page.
    pub fn next() -> Self {
        let n = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        Self::with_prefix(format!("select-{}", n))
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn label(&self) -> String {
        format!("{}-label", self.prefix)
    }

    pub fn toggle_button(&self) -> String {
        format!("{}-toggle-button", self.prefix)
    }

    pub fn menu(&self) -> String {
        format!("{}-menu", self.prefix)
    }

    pub fn item(&self, index: usize) -> String {
        format!("{}-item-{}", self.prefix, index)
    }

    /// `aria-labelledby` for the toggle button: the label, then the button
    /// itself so the current value is announced.
    pub fn toggle_button_labelledby(&self) -> String {
        format!("{} {}", self.label(), self.toggle_button())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKey {
    ArrowDown,
    ArrowUp,
    Home,
    End,
    Enter,
    Space,
    Escape,
    Character(char),
}

impl SelectKey {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(SelectKey::ArrowDown),
            "ArrowUp" => Some(SelectKey::ArrowUp),
            "Home" => Some(SelectKey::Home),
            "End" => Some(SelectKey::End),
            "Enter" => Some(SelectKey::Enter),
            " " | "Spacebar" => Some(SelectKey::Space),
            "Escape" | "Esc" => Some(SelectKey::Escape),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Some(SelectKey::Character(c)),
                    _ => None,
                }
            }
        }
    }

    /// Map a key press, dropping characters typed with Ctrl, Meta or Alt held
    /// so browser shortcuts do not run type-ahead.
    pub fn from_key_event(key: &str, command_modifier: bool) -> Option<Self> {
        match Self::from_key(key)? {
            SelectKey::Character(_) if command_modifier => None,
            key => Some(key),
        }
    }

    /// Whether the browser's own handling of this key must be suppressed.
    /// Characters are left to the browser.
    pub fn suppresses_default(self) -> bool {
        !matches!(self, SelectKey::Character(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAction {
    ToggleButtonClick,
    ItemClick(usize),
    ItemMouseMove(usize),
    MenuMouseLeave,
    Blur,
    Key(SelectKey),
}

/// What caused a selection change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    ItemClick,
    KeyDownEnter,
    KeyDownSpace,
    KeyDownCharacter,
}

/// Emitted when the selected item changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionChange<T> {
    pub change_type: ChangeType,
    pub selected_item: Option<T>,
    pub highlighted_index: Option<usize>,
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectState<T> {
    pub is_open: bool,
    pub highlighted_index: Option<usize>,
    pub selected_item: Option<T>,
}

impl<T> Default for SelectState<T> {
    fn default() -> Self {
        Self {
            is_open: false,
            highlighted_index: None,
            selected_item: None,
        }
    }
}

impl<T: Clone + PartialEq> SelectState<T> {
    pub fn new(initial_selected_item: Option<T>) -> Self {
        Self {
            selected_item: initial_selected_item,
            ..Default::default()
        }
    }

    pub fn selected_index(&self, items: &[T]) -> Option<usize> {
        let selected = self.selected_item.as_ref()?;
        items.iter().position(|item| item == selected)
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlighted_index == Some(index)
    }

    /// `aria-activedescendant` for the menu while it is open.
    pub fn active_descendant(&self, ids: &SelectIds) -> Option<String> {
        if !self.is_open {
            return None;
        }
        self.highlighted_index.map(|index| ids.item(index))
    }

    /// Apply an action. Returns an event when the selected item changed.
    pub fn dispatch<L>(
        &mut self,
        action: SelectAction,
        items: &[T],
        label: L,
    ) -> Option<SelectionChange<T>>
    where
        L: Fn(&T) -> String,
    {
        let len = items.len();

        match action {
            SelectAction::ToggleButtonClick => {
                if self.is_open {
                    self.close();
                } else {
                    let highlight = self.selected_index(items);
                    self.open_at(highlight);
                }
                None
            }
            SelectAction::ItemClick(index) if index < len => {
                self.select(index, items, ChangeType::ItemClick)
            }
            SelectAction::ItemClick(index) => {
                log::warn!("item click out of range: {} of {}", index, len);
                None
            }
            SelectAction::ItemMouseMove(index) => {
                if self.is_open && index < len {
                    self.highlighted_index = Some(index);
                }
                None
            }
            SelectAction::MenuMouseLeave => {
                self.highlighted_index = None;
                None
            }
            SelectAction::Blur => {
                self.close();
                None
            }
            SelectAction::Key(key) => self.key_down(key, items, label),
        }
    }

    fn key_down<L>(&mut self, key: SelectKey, items: &[T], label: L) -> Option<SelectionChange<T>>
    where
        L: Fn(&T) -> String,
    {
        let len = items.len();
        let last = len.checked_sub(1);

        match key {
            SelectKey::ArrowDown => {
                if self.is_open {
                    self.highlighted_index = match self.highlighted_index {
                        Some(index) if index + 1 < len => Some(index + 1),
                        _ if len > 0 => Some(0),
                        _ => None,
                    };
                } else {
                    let highlight = self.selected_index(items).or(if len > 0 { Some(0) } else { None });
                    self.open_at(highlight);
                }
                None
            }
            SelectKey::ArrowUp => {
                if self.is_open {
                    self.highlighted_index = match self.highlighted_index {
                        Some(index) if index > 0 => Some(index - 1),
                        _ => last,
                    };
                } else {
                    let highlight = self.selected_index(items).or(last);
                    self.open_at(highlight);
                }
                None
            }
            SelectKey::Home => {
                self.open_at(if len > 0 { Some(0) } else { None });
                None
            }
            SelectKey::End => {
                self.open_at(last);
                None
            }
            SelectKey::Enter | SelectKey::Space => {
                let change_type = if key == SelectKey::Enter {
                    ChangeType::KeyDownEnter
                } else {
                    ChangeType::KeyDownSpace
                };

                if !self.is_open {
                    let highlight = self.selected_index(items);
                    self.open_at(highlight);
                    return None;
                }

                match self.highlighted_index {
                    Some(index) if index < len => self.select(index, items, change_type),
                    _ => {
                        self.close();
                        None
                    }
                }
            }
            SelectKey::Escape => {
                self.close();
                None
            }
            SelectKey::Character(c) => {
                let start = self.highlighted_index.or_else(|| self.selected_index(items));
                let index = find_by_prefix(items, start, c, &label)?;

                if self.is_open {
                    self.highlighted_index = Some(index);
                    None
                } else {
                    self.select(index, items, ChangeType::KeyDownCharacter)
                }
            }
        }
    }

    fn open_at(&mut self, highlight: Option<usize>) {
        self.is_open = true;
        self.highlighted_index = highlight;
    }

    fn close(&mut self) {
        self.is_open = false;
        self.highlighted_index = None;
    }

    fn select(&mut self, index: usize, items: &[T], change_type: ChangeType) -> Option<SelectionChange<T>> {
        let item = items.get(index)?.clone();
        self.close();

        if self.selected_item.as_ref() == Some(&item) {
            return None;
        }

        self.selected_item = Some(item);
        Some(SelectionChange {
            change_type,
            selected_item: self.selected_item.clone(),
            highlighted_index: self.highlighted_index,
            is_open: self.is_open,
        })
    }
}

/// Next item after `start` (wrapping) whose label starts with `c`.
fn find_by_prefix<T, L>(items: &[T], start: Option<usize>, c: char, label: &L) -> Option<usize>
where
    L: Fn(&T) -> String,
{
    let len = items.len();
    if len == 0 {
        return None;
    }

    let needle: String = c.to_lowercase().collect();
    let first = start.map(|index| index + 1).unwrap_or(0);

    (0..len)
        .map(|offset| (first + offset) % len)
        .find(|&index| label(&items[index]).to_lowercase().starts_with(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn books() -> Vec<Value> {
        vec![
            json!({"label": "Harry Potter"}),
            json!({"label": "Net Moves"}),
            json!({"label": "Half of a yellow sun"}),
            json!({"label": "The Da Vinci Code"}),
            json!({"label": "Born a crime"}),
        ]
    }

    fn book_label(item: &Value) -> String {
        item["label"].as_str().unwrap_or_default().to_string()
    }

    fn names() -> Vec<String> {
        ["Ada", "Grace", "Alan", "Barbara"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn run(state: &mut SelectState<String>, action: SelectAction) -> Option<SelectionChange<String>> {
        state.dispatch(action, &names(), |s| s.clone())
    }

    #[test]
    fn test_item_click_emits_selection_event() {
        let items = books();
        let mut state = SelectState::new(None);

        state.dispatch(SelectAction::ToggleButtonClick, &items, book_label);
        assert!(state.is_open);

        let change = state
            .dispatch(SelectAction::ItemClick(0), &items, book_label)
            .expect("selection should change");

        assert_eq!(
            change,
            SelectionChange {
                change_type: ChangeType::ItemClick,
                selected_item: Some(json!({"label": "Harry Potter"})),
                highlighted_index: None,
                is_open: false,
            }
        );
        assert_eq!(state.selected_item, Some(json!({"label": "Harry Potter"})));
    }

    #[test]
    fn test_reselecting_same_item_is_silent() {
        let mut state = SelectState::new(Some("Grace".to_string()));
        run(&mut state, SelectAction::ToggleButtonClick);
        assert!(run(&mut state, SelectAction::ItemClick(1)).is_none());
        assert!(!state.is_open);
    }

    #[test]
    fn test_toggle_click_highlights_selected_item() {
        let mut state = SelectState::new(Some("Alan".to_string()));
        run(&mut state, SelectAction::ToggleButtonClick);
        assert_eq!(state.highlighted_index, Some(2));
        run(&mut state, SelectAction::ToggleButtonClick);
        assert!(!state.is_open);
        assert_eq!(state.highlighted_index, None);
    }

    #[test]
    fn test_arrow_keys_open_and_wrap() {
        let mut state = SelectState::new(None);

        run(&mut state, SelectAction::Key(SelectKey::ArrowDown));
        assert!(state.is_open);
        assert_eq!(state.highlighted_index, Some(0));

        run(&mut state, SelectAction::Key(SelectKey::ArrowUp));
        assert_eq!(state.highlighted_index, Some(3));

        run(&mut state, SelectAction::Key(SelectKey::ArrowDown));
        assert_eq!(state.highlighted_index, Some(0));

        run(&mut state, SelectAction::Key(SelectKey::Escape));
        run(&mut state, SelectAction::Key(SelectKey::ArrowUp));
        assert_eq!(state.highlighted_index, Some(3));
    }

    #[test]
    fn test_home_end_jump() {
        let mut state = SelectState::new(None);
        run(&mut state, SelectAction::Key(SelectKey::End));
        assert_eq!(state.highlighted_index, Some(3));
        run(&mut state, SelectAction::Key(SelectKey::Home));
        assert_eq!(state.highlighted_index, Some(0));
    }

    #[test]
    fn test_enter_selects_highlighted_item() {
        let mut state = SelectState::new(None);

        assert!(run(&mut state, SelectAction::Key(SelectKey::Enter)).is_none());
        assert!(state.is_open);

        run(&mut state, SelectAction::ItemMouseMove(1));
        let change = run(&mut state, SelectAction::Key(SelectKey::Enter)).unwrap();
        assert_eq!(change.change_type, ChangeType::KeyDownEnter);
        assert_eq!(change.selected_item.as_deref(), Some("Grace"));
        assert!(!state.is_open);
    }

    #[test]
    fn test_space_without_highlight_closes() {
        let mut state = SelectState::new(None);
        run(&mut state, SelectAction::ToggleButtonClick);
        assert!(run(&mut state, SelectAction::Key(SelectKey::Space)).is_none());
        assert!(!state.is_open);
    }

    #[test]
    fn test_mouse_move_only_highlights_when_open() {
        let mut state = SelectState::new(None);
        run(&mut state, SelectAction::ItemMouseMove(2));
        assert_eq!(state.highlighted_index, None);

        run(&mut state, SelectAction::ToggleButtonClick);
        run(&mut state, SelectAction::ItemMouseMove(2));
        assert!(state.is_highlighted(2));
        run(&mut state, SelectAction::MenuMouseLeave);
        assert_eq!(state.highlighted_index, None);
    }

    #[test]
    fn test_character_typeahead() {
        let mut state = SelectState::new(None);
        run(&mut state, SelectAction::ToggleButtonClick);

        run(&mut state, SelectAction::Key(SelectKey::Character('a')));
        assert_eq!(state.highlighted_index, Some(0));
        run(&mut state, SelectAction::Key(SelectKey::Character('A')));
        assert_eq!(state.highlighted_index, Some(2));
        run(&mut state, SelectAction::Key(SelectKey::Character('a')));
        assert_eq!(state.highlighted_index, Some(0));
        run(&mut state, SelectAction::Key(SelectKey::Character('z')));
        assert_eq!(state.highlighted_index, Some(0));
    }

    #[test]
    fn test_character_selects_when_closed() {
        let mut state = SelectState::new(None);
        let change = run(&mut state, SelectAction::Key(SelectKey::Character('b'))).unwrap();
        assert_eq!(change.change_type, ChangeType::KeyDownCharacter);
        assert_eq!(change.selected_item.as_deref(), Some("Barbara"));
        assert!(!state.is_open);
    }

    #[test]
    fn test_empty_items() {
        let mut state: SelectState<String> = SelectState::new(None);
        let empty: Vec<String> = Vec::new();

        state.dispatch(SelectAction::Key(SelectKey::ArrowDown), &empty, |s| s.clone());
        assert!(state.is_open);
        assert_eq!(state.highlighted_index, None);

        state.dispatch(SelectAction::Key(SelectKey::ArrowUp), &empty, |s| s.clone());
        assert_eq!(state.highlighted_index, None);
        assert!(state
            .dispatch(SelectAction::ItemClick(0), &empty, |s| s.clone())
            .is_none());
    }

    #[test]
    fn test_blur_closes() {
        let mut state = SelectState::new(None);
        run(&mut state, SelectAction::Key(SelectKey::ArrowDown));
        run(&mut state, SelectAction::Blur);
        assert!(!state.is_open);
        assert_eq!(state.highlighted_index, None);
    }

    #[test]
    fn test_ids_and_active_descendant() {
        let ids = SelectIds::with_prefix("select-7");
        assert_eq!(ids.label(), "select-7-label");
        assert_eq!(ids.toggle_button(), "select-7-toggle-button");
        assert_eq!(ids.menu(), "select-7-menu");
        assert_eq!(ids.item(0), "select-7-item-0");
        assert_eq!(
            ids.toggle_button_labelledby(),
            "select-7-label select-7-toggle-button"
        );

        let mut state = SelectState::new(None);
        assert_eq!(state.active_descendant(&ids), None);
        run(&mut state, SelectAction::Key(SelectKey::End));
        assert_eq!(state.active_descendant(&ids).as_deref(), Some("select-7-item-3"));
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(SelectIds::next(), SelectIds::next());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(SelectKey::from_key("ArrowDown"), Some(SelectKey::ArrowDown));
        assert_eq!(SelectKey::from_key(" "), Some(SelectKey::Space));
        assert_eq!(SelectKey::from_key("Esc"), Some(SelectKey::Escape));
        assert_eq!(SelectKey::from_key("h"), Some(SelectKey::Character('h')));
        assert_eq!(SelectKey::from_key("Tab"), None);
        assert_eq!(SelectKey::from_key("Shift"), None);
    }

    #[test]
    fn test_shortcut_characters_are_ignored() {
        assert_eq!(SelectKey::from_key_event("c", true), None);
        assert_eq!(SelectKey::from_key_event("c", false), Some(SelectKey::Character('c')));
        assert_eq!(SelectKey::from_key_event("ArrowDown", true), Some(SelectKey::ArrowDown));
        assert_eq!(SelectKey::from_key_event("Enter", true), Some(SelectKey::Enter));
    }

    #[test]
    fn test_only_control_keys_suppress_default() {
        for key in [
            SelectKey::ArrowDown,
            SelectKey::ArrowUp,
            SelectKey::Home,
            SelectKey::End,
            SelectKey::Enter,
            SelectKey::Space,
            SelectKey::Escape,
        ] {
            assert!(key.suppresses_default(), "{:?}", key);
        }
        assert!(!SelectKey::Character('h').suppresses_default());
    }
}
