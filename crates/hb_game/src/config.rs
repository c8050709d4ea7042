use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const SKIN_TONE_COUNT: u8 = 5;
pub const HAIR_COLOR_COUNT: u8 = 7;
pub const OUTFIT_COUNT: u8 = 3;
pub const HAIR_STYLE_COUNT: u8 = 3;
pub const FACIAL_HAIR_COUNT: u8 = 3;
pub const MAX_NAME_LEN: usize = 10;

/// Per-tick tuning values for a 60 Hz step. Velocities are in world units per
/// tick, accelerations in world units per tick squared.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub gravity: f32,
    pub jump_force: f32,
    pub move_speed: f32,
    pub idle_damping: f32,
    pub balloon_gravity: f32,
    pub balloon_lift: f32,
    pub anim_rate: f32,
    pub spawned_bounce: f32,
    pub spawned_damping: f32,
    pub particle_gravity: f32,
    pub respawn_rewind: f32,
    pub respawn_y: f32,
    pub starting_lives: u32,
    pub gifts_required: u32,
    pub keys_for_chest: u32,
    pub chest_reach: f32,
    pub partner_reach: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 0.55,
            jump_force: -12.5,
            move_speed: 4.2,
            idle_damping: 0.8,
            balloon_gravity: 0.18,
            balloon_lift: -3.5,
            anim_rate: 0.28,
            spawned_bounce: 0.4,
            spawned_damping: 0.98,
            particle_gravity: 0.04,
            respawn_rewind: 300.0,
            respawn_y: 250.0,
            starting_lives: 3,
            gifts_required: 5,
            keys_for_chest: 3,
            chest_reach: 90.0,
            partner_reach: 80.0,
            viewport_width: 800.0,
            viewport_height: 450.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Customization {
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub hair: u8,
    #[serde(default)]
    pub hair_color: u8,
    #[serde(default)]
    pub skin: u8,
    #[serde(default)]
    pub outfit: u8,
    #[serde(default)]
    pub facial_hair: u8,
}

impl Customization {
    pub fn default_player() -> Self {
        Self {
            name: "HERO".to_string(),
            gender: Gender::Male,
            hair: 1,
            hair_color: 0,
            skin: 0,
            outfit: 0,
            facial_hair: 0,
        }
    }

    pub fn default_partner() -> Self {
        Self {
            name: "SWEETIE".to_string(),
            gender: Gender::Female,
            hair: 2,
            hair_color: 1,
            skin: 0,
            outfit: 0,
            facial_hair: 0,
        }
    }

    pub fn is_female(&self) -> bool {
        self.gender == Gender::Female
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "Customization::default_player")]
    pub player: Customization,
    #[serde(default = "Customization::default_partner")]
    pub partner: Customization,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_start_with_balloon")]
    pub start_with_balloon: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player: Customization::default_player(),
            partner: Customization::default_partner(),
            seed: default_seed(),
            start_with_balloon: default_start_with_balloon(),
        }
    }
}

pub fn load_session_config_from_path(path: &Path) -> Result<SessionConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: SessionConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse session config {}: {e}", path.display()))?;
    validate_session_config(&config)?;
    Ok(config)
}

pub fn validate_session_config(config: &SessionConfig) -> Result<(), String> {
    validate_customization("player", &config.player)?;
    validate_customization("partner", &config.partner)
}

fn validate_customization(role: &str, custom: &Customization) -> Result<(), String> {
    let name_len = custom.name.chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        return Err(format!(
            "Config validation failed: {role} name must be 1-{MAX_NAME_LEN} characters, got {name_len}"
        ));
    }
    let ranges = [
        ("hair", custom.hair, HAIR_STYLE_COUNT),
        ("hair_color", custom.hair_color, HAIR_COLOR_COUNT),
        ("skin", custom.skin, SKIN_TONE_COUNT),
        ("outfit", custom.outfit, OUTFIT_COUNT),
        ("facial_hair", custom.facial_hair, FACIAL_HAIR_COUNT),
    ];
    for (field, value, count) in ranges {
        if value >= count {
            return Err(format!(
                "Config validation failed: {role} {field} index {value} out of range (0..{count})"
            ));
        }
    }
    Ok(())
}

const fn default_seed() -> u64 {
    0x5eed_1402
}

const fn default_start_with_balloon() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hb_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn config_file_parses_with_defaults() {
        let path = temp_file_path("valid");
        fs::write(
            &path,
            r#"{
              "player": { "name": "ROMEO", "gender": "male", "hair": 0, "facial_hair": 2 },
              "seed": 7
            }"#,
        )
        .expect("write temp file");

        let config = load_session_config_from_path(&path).expect("config should load");
        assert_eq!(config.player.name, "ROMEO");
        assert_eq!(config.player.facial_hair, 2);
        assert_eq!(config.partner, Customization::default_partner());
        assert_eq!(config.seed, 7);
        assert!(config.start_with_balloon);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn config_rejects_long_names() {
        let path = temp_file_path("long_name");
        fs::write(
            &path,
            r#"{ "partner": { "name": "MUCHTOOLONGNAME", "gender": "female" } }"#,
        )
        .expect("write temp file");

        let err = load_session_config_from_path(&path).expect_err("long name should fail");
        assert!(err.contains("partner name"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn config_rejects_out_of_range_indices() {
        let mut config = SessionConfig::default();
        config.player.skin = SKIN_TONE_COUNT;
        let err = validate_session_config(&config).expect_err("skin index should fail");
        assert!(err.contains("player skin"));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_file_path("missing");
        let err = load_session_config_from_path(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read"));
    }
}
