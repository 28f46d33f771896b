//! Screen overlays drawn on top of the game or menu.

pub mod cheat_sheet;

pub use cheat_sheet::CheatSheetOverlay;
