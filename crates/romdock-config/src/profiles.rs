//! Built-in device profiles
//!
//! Stock profiles for common handhelds, shipped disabled and without a
//! device root. The mapping tables follow each firmware's stock folder
//! conventions; users extend them per profile.

use romdock_types::{ArtworkSettings, SyncProfile};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn mappings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(system, folder)| ((*system).to_string(), (*folder).to_string()))
        .collect()
}

fn profile(
    id: &str,
    name: &str,
    firmware: Option<&str>,
    system_mappings: BTreeMap<String, String>,
) -> SyncProfile {
    SyncProfile {
        id: id.to_string(),
        name: name.to_string(),
        firmware: firmware.map(str::to_string),
        enabled: false,
        base_path: PathBuf::new(),
        system_mappings,
        artwork: ArtworkSettings::default(),
    }
}

/// The stock profile set a fresh settings file starts with
pub fn default_profiles() -> Vec<SyncProfile> {
    vec![
        profile(
            "miyoo-mini",
            "Miyoo Mini Plus",
            Some("OnionOS"),
            mappings(&[
                ("Nintendo Entertainment System", "FC"),
                ("Super Nintendo", "SFC"),
                ("Game Boy", "GB"),
                ("Game Boy Color", "GBC"),
                ("Game Boy Advance", "GBA"),
                ("Sega Genesis", "MD"),
                ("Sega Master System", "MS"),
                ("Game Gear", "GG"),
                ("PlayStation", "PS"),
            ]),
        ),
        profile(
            "anbernic-rg35xx",
            "Anbernic RG35XX",
            Some("GarlicOS"),
            mappings(&[
                ("Nintendo Entertainment System", "roms/NES"),
                ("Super Nintendo", "roms/SNES"),
                ("Game Boy", "roms/GB"),
                ("Game Boy Color", "roms/GBC"),
                ("Game Boy Advance", "roms/GBA"),
                ("Nintendo 64", "roms/N64"),
                ("Sega Genesis", "roms/GENESIS"),
                ("Sega Master System", "roms/MS"),
                ("Game Gear", "roms/GG"),
                ("PlayStation", "roms/PS1"),
            ]),
        ),
        profile(
            "steam-deck",
            "Steam Deck",
            Some("SteamOS"),
            mappings(&[
                ("Nintendo Entertainment System", "Emulation/roms/nes"),
                ("Super Nintendo", "Emulation/roms/snes"),
                ("Game Boy", "Emulation/roms/gb"),
                ("Game Boy Color", "Emulation/roms/gbc"),
                ("Game Boy Advance", "Emulation/roms/gba"),
                ("Nintendo 64", "Emulation/roms/n64"),
                ("Nintendo DS", "Emulation/roms/nds"),
                ("Sega Genesis", "Emulation/roms/genesis"),
                ("PlayStation", "Emulation/roms/psx"),
                ("GameCube", "Emulation/roms/gc"),
            ]),
        ),
        profile(
            "retroid-pocket",
            "Retroid Pocket",
            Some("Android"),
            mappings(&[
                ("Nintendo Entertainment System", "roms/NES"),
                ("Super Nintendo", "roms/SNES"),
                ("Game Boy", "roms/GB"),
                ("Game Boy Color", "roms/GBC"),
                ("Game Boy Advance", "roms/GBA"),
                ("Nintendo 64", "roms/N64"),
                ("Nintendo DS", "roms/NDS"),
                ("Sega Genesis", "roms/GENESIS"),
                ("PlayStation", "roms/PS1"),
                ("PSP", "roms/PSP"),
            ]),
        ),
        profile("custom", "Custom Profile", None, BTreeMap::new()),
    ]
}
