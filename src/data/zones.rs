//! Zone table: every playable zone with its internal index and how many acts
//! are available in normal play and in Time Attack.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    pub short_name: &'static str,
    pub internal_name: &'static str,
    pub display_name: &'static str,
    /// Zone index as used by the game's own memory layout.
    pub internal_index: u8,
    pub acts_normal: u8,
    pub acts_time_attack: u8,
}

impl Zone {
    const fn new(
        short_name: &'static str,
        internal_name: &'static str,
        display_name: &'static str,
        internal_index: u8,
        acts_normal: u8,
        acts_time_attack: u8,
    ) -> Self {
        Zone { short_name, internal_name, display_name, internal_index, acts_normal, acts_time_attack }
    }
}

pub(crate) fn all_zones() -> Vec<Zone> {
    vec![
        Zone::new("aiz", "zone01_aiz", "Angel Island Zone",    0x00, 2, 2),
        Zone::new("hcz", "zone02_hcz", "Hydrocity Zone",       0x01, 2, 2),
        Zone::new("mgz", "zone03_mgz", "Marble Garden Zone",   0x02, 2, 2),
        Zone::new("cnz", "zone04_cnz", "Carnival Night Zone",  0x03, 2, 2),
        Zone::new("icz", "zone05_icz", "IceCap Zone",          0x05, 2, 2),
        Zone::new("lbz", "zone06_lbz", "Launch Base Zone",     0x06, 2, 2),
        Zone::new("mhz", "zone07_mhz", "Mushroom Hill Zone",   0x07, 2, 2),
        Zone::new("fbz", "zone08_fbz", "Flying Battery Zone",  0x04, 2, 2),
        Zone::new("soz", "zone09_soz", "Sandopolis Zone",      0x08, 2, 2),
        Zone::new("lrz", "zone10_lrz", "Lava Reef Zone",       0x09, 2, 2),
        Zone::new("hpz", "zone11_hpz", "Hidden Palace Zone",   0x16, 1, 0),
        Zone::new("ssz", "zone12_ssz", "Sky Sanctuary Zone",   0x0a, 1, 1),
        Zone::new("dez", "zone13_dez", "Death Egg Zone",       0x0b, 2, 2),
        Zone::new("ddz", "zone14_ddz", "The Doomsday Zone",    0x0c, 1, 0),
    ]
}
