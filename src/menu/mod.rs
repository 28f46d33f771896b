//! Options menu.
//!
//! `layout` holds the static entry tables, `binding` connects entries to
//! their backing values, `effects` holds the per-option side effects and
//! `options_menu` drives it all frame by frame.

pub mod binding;
pub mod conditions;
pub mod effects;
pub mod entries;
pub mod layout;
pub mod option_id;
pub mod options_menu;
pub mod render;
pub mod tabs;

pub use binding::BackingStores;
pub use options_menu::OptionsMenu;
