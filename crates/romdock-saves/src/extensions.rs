//! Per-system save file extension tables
//!
//! Emulators name save files after the title with a system-specific
//! extension. These tables drive device-side discovery: for each known
//! extension the engine probes `<title base name><extension>`. Systems
//! whose table carries `.state` also recognize numbered save-state slots
//! `.st0` through `.st9`.

/// Numbered save-state slot extensions
fn state_slots() -> impl Iterator<Item = String> {
    (0..=9).map(|slot| format!(".st{slot}"))
}

/// Known save file extensions for a system tag.
///
/// Unknown systems fall back to the common SRAM and save-state extensions.
pub fn save_extensions(system: &str) -> Vec<String> {
    let base: &[&str] = match system {
        "Nintendo Entertainment System" => &[".sav", ".state"],
        "Super Nintendo" => &[".srm", ".sav", ".state"],
        "Game Boy" | "Game Boy Color" | "Game Boy Advance" => {
            &[".sav", ".sa1", ".sa2", ".sa3", ".state"]
        }
        "Nintendo 64" => &[".sra", ".eep", ".fla", ".mpk", ".state"],
        "Nintendo DS" => &[".dsv", ".sav", ".sa1", ".sa2", ".state"],
        "Sega Genesis" => &[".srm", ".sav", ".state"],
        "Game Gear" | "Sega Master System" => &[".sav", ".state"],
        "PlayStation" => &[".mcr", ".mcd", ".srm", ".state"],
        "PSP" => &[".sav", ".ppst"],
        _ => &[".sav", ".srm", ".state"],
    };

    let mut extensions: Vec<String> = base.iter().map(|e| (*e).to_string()).collect();
    if base.contains(&".state") {
        extensions.extend(state_slots());
    }
    extensions
}

/// Human-readable save type label for an extension
pub fn save_type_label(extension: &str) -> String {
    match extension {
        ".sav" | ".srm" | ".sra" => "SRAM".to_string(),
        ".eep" => "EEPROM".to_string(),
        ".fla" => "Flash".to_string(),
        ".mpk" => "MemPak".to_string(),
        ".mcr" | ".mcd" => "Memory Card".to_string(),
        ".dsv" => "Save".to_string(),
        ".ppst" | ".state" => "Save State".to_string(),
        other => {
            if let Some(slot) = other
                .strip_prefix(".st")
                .or_else(|| other.strip_prefix(".sa"))
            {
                if slot.len() == 1 && slot.chars().all(|c| c.is_ascii_digit()) {
                    return format!("Save State {slot}");
                }
            }
            "Save".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_state_systems_carry_slot_extensions() {
        let extensions = save_extensions("Super Nintendo");
        assert!(extensions.contains(&".srm".to_string()));
        assert!(extensions.contains(&".st0".to_string()));
        assert!(extensions.contains(&".st9".to_string()));
    }

    #[test]
    fn test_psp_has_no_slot_extensions() {
        let extensions = save_extensions("PSP");
        assert_eq!(extensions, vec![".sav", ".ppst"]);
    }

    #[test]
    fn test_unknown_system_fallback() {
        let extensions = save_extensions("Neo Geo Pocket");
        assert!(extensions.contains(&".sav".to_string()));
        assert!(extensions.contains(&".srm".to_string()));
        assert!(extensions.contains(&".state".to_string()));
    }

    #[rstest]
    #[case(".srm", "SRAM")]
    #[case(".sra", "SRAM")]
    #[case(".eep", "EEPROM")]
    #[case(".mpk", "MemPak")]
    #[case(".mcr", "Memory Card")]
    #[case(".state", "Save State")]
    #[case(".st3", "Save State 3")]
    #[case(".sa1", "Save State 1")]
    #[case(".xyz", "Save")]
    fn test_save_type_labels(#[case] extension: &str, #[case] expected: &str) {
        assert_eq!(save_type_label(extension), expected);
    }
}
