//! Menu entries and vertical entry lists.

use std::ops::{Index, IndexMut};

use crate::engine::{Button, Color, InputSource};

use super::option_id::OptionKey;

#[derive(Clone, Debug, PartialEq)]
pub struct MenuOption {
    pub text: String,
    pub value: i64,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntryKind {
    /// Placeholder at index 0 of each tab, standing for the tab strip.
    Dummy,
    Title,
    Section,
    Label { color: Color },
    Options,
    /// Options entry highlighted when set away from its default.
    AdvancedOption { default_value: i64 },
    UpdateCheck,
    Soundtrack,
    SoundtrackDownload,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MenuEntry {
    pub kind: EntryKind,
    pub key: Option<OptionKey>,
    pub text: String,
    pub options: Vec<MenuOption>,
    pub selected_index: usize,
    pub small_font: bool,
    pub margin_above: i32,
    pub margin_below: i32,
    visible: bool,
    interactable: bool,
}

impl MenuEntry {
    fn new(kind: EntryKind, text: &str, key: Option<OptionKey>) -> Self {
        let interactable = !matches!(kind, EntryKind::Title | EntryKind::Section | EntryKind::Label { .. });
        MenuEntry {
            kind,
            key,
            text: text.to_string(),
            options: Vec::new(),
            selected_index: 0,
            small_font: false,
            margin_above: 0,
            margin_below: 0,
            visible: true,
            interactable,
        }
    }

    pub fn dummy() -> Self {
        Self::new(EntryKind::Dummy, "", None)
    }

    pub fn title(text: &str) -> Self {
        Self::new(EntryKind::Title, text, None)
    }

    pub fn section(text: &str) -> Self {
        Self::new(EntryKind::Section, text, None)
    }

    pub fn label(text: &str, color: Color) -> Self {
        Self::new(EntryKind::Label { color }, text, None)
    }

    pub fn options(text: &str, key: impl Into<OptionKey>) -> Self {
        Self::new(EntryKind::Options, text, Some(key.into()))
    }

    pub fn advanced(text: &str, key: impl Into<OptionKey>, default_value: i64) -> Self {
        let mut entry = Self::new(EntryKind::AdvancedOption { default_value }, text, Some(key.into()));
        entry.small_font = true;
        entry
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    // ── Builders ──

    pub fn option(mut self, text: &str, value: i64) -> Self {
        self.add_option(text, value);
        self
    }

    /// "Off" followed by `from..=to` percentages.
    pub fn percent_options(mut self, from: i64, to: i64, step: i64) -> Self {
        let mut value = from;
        while value <= to {
            let text = if value == 0 { "Off".to_string() } else { format!("{value} %") };
            self.add_option(&text, value);
            value += step;
        }
        self
    }

    pub fn number_options(mut self, from: i64, to: i64, step: i64) -> Self {
        let mut value = from;
        while value <= to {
            self.add_option(&value.to_string(), value);
            value += step;
        }
        self
    }

    pub fn small(mut self) -> Self {
        self.small_font = true;
        self
    }

    pub fn add_option(&mut self, text: &str, value: i64) {
        self.options.push(MenuOption { text: text.to_string(), value, visible: true });
    }

    // ── State ──

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    pub fn set_interactable(&mut self, interactable: bool) {
        self.interactable = interactable;
    }

    pub fn is_fully_interactable(&self) -> bool {
        self.visible && self.interactable
    }

    pub fn is_title(&self) -> bool {
        self.kind == EntryKind::Title
    }

    pub fn selected(&self) -> Option<&MenuOption> {
        self.options.get(self.selected_index)
    }

    pub fn selected_value(&self) -> Option<i64> {
        self.selected().map(|o| o.value)
    }

    /// Select the option with the given value. Returns false, leaving the
    /// selection alone, if there is no such option.
    pub fn set_selected_index_by_value(&mut self, value: i64) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => {
                self.selected_index = index;
                true
            }
            None => false,
        }
    }

    /// Move the selection onto a visible option, preferring later ones.
    pub fn sanitize_selected_index(&mut self) {
        if self.options.is_empty() {
            self.selected_index = 0;
            return;
        }
        self.selected_index = self.selected_index.min(self.options.len() - 1);
        if self.options[self.selected_index].visible {
            return;
        }
        let forward = (self.selected_index + 1..self.options.len()).find(|&i| self.options[i].visible);
        let backward = (0..self.selected_index).rev().find(|&i| self.options[i].visible);
        if let Some(index) = forward.or(backward) {
            self.selected_index = index;
        }
    }

    fn step_option(&mut self, forward: bool) -> bool {
        let next = if forward {
            (self.selected_index + 1..self.options.len()).find(|&i| self.options[i].visible)
        } else {
            (0..self.selected_index.min(self.options.len())).rev().find(|&i| self.options[i].visible)
        };
        match next {
            Some(index) => {
                self.selected_index = index;
                true
            }
            None => false,
        }
    }
}

// ── Entry lists ──

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateResult {
    None,
    /// Selection moved to another entry.
    EntryChanged,
    /// The selected entry's option changed.
    OptionChanged,
}

#[derive(Clone, Debug, Default)]
pub struct MenuEntries {
    entries: Vec<MenuEntry>,
    pub selected_entry_index: usize,
}

impl MenuEntries {
    pub fn new() -> Self {
        MenuEntries::default()
    }

    pub fn push(&mut self, entry: MenuEntry) -> &mut MenuEntry {
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
        self.selected_entry_index = self.selected_entry_index.min(len.saturating_sub(1));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MenuEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, MenuEntry> {
        self.entries.iter_mut()
    }

    pub fn selected(&self) -> Option<&MenuEntry> {
        self.entries.get(self.selected_entry_index)
    }

    pub fn selected_mut(&mut self) -> Option<&mut MenuEntry> {
        self.entries.get_mut(self.selected_entry_index)
    }

    /// Process one frame of input. Up and down move between fully
    /// interactable entries without wrapping; left and right change the
    /// selected entry's option.
    pub fn update(&mut self, input: &dyn InputSource) -> UpdateResult {
        if input.just_pressed_or_repeat(Button::Up) {
            let target = (0..self.selected_entry_index).rev().find(|&i| self.entries[i].is_fully_interactable());
            return self.move_to(target);
        }
        if input.just_pressed_or_repeat(Button::Down) {
            let target = (self.selected_entry_index + 1..self.entries.len()).find(|&i| self.entries[i].is_fully_interactable());
            return self.move_to(target);
        }

        let left = input.just_pressed_or_repeat(Button::Left);
        let right = input.just_pressed_or_repeat(Button::Right);
        if left == right {
            return UpdateResult::None;
        }
        match self.selected_mut() {
            Some(entry) if entry.is_fully_interactable() => {
                if entry.step_option(right) {
                    UpdateResult::OptionChanged
                } else {
                    UpdateResult::None
                }
            }
            _ => UpdateResult::None,
        }
    }

    fn move_to(&mut self, target: Option<usize>) -> UpdateResult {
        match target {
            Some(index) => {
                self.selected_entry_index = index;
                UpdateResult::EntryChanged
            }
            None => UpdateResult::None,
        }
    }

    /// Move the selection onto a fully interactable entry, preferring later
    /// ones; falls back to index 0.
    pub fn sanitize_selected_index(&mut self) {
        if self.entries.is_empty() {
            self.selected_entry_index = 0;
            return;
        }
        let current = self.selected_entry_index.min(self.entries.len() - 1);
        if self.entries[current].is_fully_interactable() {
            self.selected_entry_index = current;
            return;
        }
        let forward = (current + 1..self.entries.len()).find(|&i| self.entries[i].is_fully_interactable());
        let backward = (0..current).rev().find(|&i| self.entries[i].is_fully_interactable());
        self.selected_entry_index = forward.or(backward).unwrap_or(0);
    }

    /// First fully interactable entry after the index 0 placeholder.
    pub fn first_interactable(&self) -> Option<usize> {
        (1..self.entries.len()).find(|&i| self.entries[i].is_fully_interactable())
    }

    pub fn position(&self, key: OptionKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == Some(key))
    }
}

impl Index<usize> for MenuEntries {
    type Output = MenuEntry;

    fn index(&self, index: usize) -> &MenuEntry {
        &self.entries[index]
    }
}

impl IndexMut<usize> for MenuEntries {
    fn index_mut(&mut self, index: usize) -> &mut MenuEntry {
        &mut self.entries[index]
    }
}
