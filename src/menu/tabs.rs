//! Tabs and vertical scrolling.

use super::entries::MenuEntries;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TabId {
    Mods,
    System,
    Display,
    Audio,
    Visuals,
    Gameplay,
    Controls,
    Tweaks,
}

impl TabId {
    pub const ALL: [TabId; 8] = [
        TabId::Mods,
        TabId::System,
        TabId::Display,
        TabId::Audio,
        TabId::Visuals,
        TabId::Gameplay,
        TabId::Controls,
        TabId::Tweaks,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<TabId> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            TabId::Mods => "MODS",
            TabId::System => "SYSTEM",
            TabId::Display => "DISPLAY",
            TabId::Audio => "AUDIO",
            TabId::Visuals => "VISUALS",
            TabId::Gameplay => "GAMEPLAY",
            TabId::Controls => "CONTROLS",
            TabId::Tweaks => "TWEAKS",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tab {
    pub id: TabId,
    pub entries: MenuEntries,
}

impl Tab {
    pub fn new(id: TabId) -> Self {
        Tab { id, entries: MenuEntries::new() }
    }
}

// ── Scrolling ──

/// Scroll speed, in fractions of the remaining distance per second.
const SCROLL_RATE: f32 = 12.0;

/// Keeps the selected entry's vertical span inside the visible area.
#[derive(Clone, Debug)]
pub struct Scrolling {
    visible_height: i32,
    offset: f32,
    target: f32,
}

impl Scrolling {
    pub fn new(visible_height: i32) -> Self {
        Scrolling { visible_height, offset: 0.0, target: 0.0 }
    }

    /// Selection span in content coordinates.
    pub fn set_current_selection(&mut self, y1: i32, y2: i32) {
        let (y1, y2) = (y1 as f32, y2 as f32);
        if y2 - self.target > self.visible_height as f32 {
            self.target = y2 - self.visible_height as f32;
        }
        if y1 < self.target {
            self.target = y1;
        }
        self.target = self.target.max(0.0);
    }

    pub fn update(&mut self, dt: f32) {
        let diff = self.target - self.offset;
        if diff.abs() < 0.5 {
            self.offset = self.target;
        } else {
            self.offset += diff * (dt * SCROLL_RATE).min(1.0);
        }
    }

    pub fn offset(&self) -> i32 {
        self.offset.round() as i32
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.target = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_ids_follow_strip_order() {
        for (i, id) in TabId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(TabId::from_index(i), Some(*id));
        }
        assert_eq!(TabId::from_index(8), None);
        assert_eq!(TabId::Tweaks.title(), "TWEAKS");
    }

    #[test]
    fn scrolls_down_to_reveal_selection_and_back_up() {
        let mut scrolling = Scrolling::new(194);
        scrolling.set_current_selection(250, 300);
        for _ in 0..120 {
            scrolling.update(1.0 / 60.0);
        }
        assert_eq!(scrolling.offset(), 106);

        scrolling.set_current_selection(20, 60);
        for _ in 0..120 {
            scrolling.update(1.0 / 60.0);
        }
        assert_eq!(scrolling.offset(), 20);
    }

    #[test]
    fn never_scrolls_above_top() {
        let mut scrolling = Scrolling::new(194);
        scrolling.set_current_selection(-30, 10);
        scrolling.update(1.0);
        assert_eq!(scrolling.offset(), 0);
    }
}
