use kyubu_core::rules::{ANIMATION_STEPS, RACE_LENGTH_DEFAULT, RACE_LENGTH_MAX, RACE_LENGTH_MIN};

use crate::app_core::RendererKind;

const STEPS_MAX: u32 = 120;

/// Options read from the location hash, e.g. `#renderer=svg;seed=0x2a;race=8`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct InitConfig {
    pub(crate) renderer: RendererKind,
    pub(crate) seed: Option<u64>,
    pub(crate) steps: Option<u32>,
    pub(crate) race_length: usize,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::default(),
            seed: None,
            steps: None,
            race_length: RACE_LENGTH_DEFAULT,
        }
    }
}

pub(crate) fn load_init_config() -> InitConfig {
    #[cfg(target_arch = "wasm32")]
    {
        let hash = web_sys::window()
            .and_then(|window| window.location().hash().ok())
            .unwrap_or_default();
        parse_hash_config(&hash)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        InitConfig::default()
    }
}

pub(crate) fn parse_hash_config(hash: &str) -> InitConfig {
    let mut config = InitConfig::default();
    let raw = hash.trim().trim_start_matches('#').trim();
    for chunk in raw.split(';') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let mut iter = chunk.splitn(2, '=');
        let key = iter.next().unwrap_or("").trim();
        let value = iter.next().unwrap_or("").trim();
        if key.eq_ignore_ascii_case("renderer") {
            if let Some(renderer) = parse_renderer(value) {
                config.renderer = renderer;
            }
        } else if key.eq_ignore_ascii_case("seed") {
            config.seed = parse_seed_value(value);
        } else if key.eq_ignore_ascii_case("steps") {
            config.steps = value
                .parse::<u32>()
                .ok()
                .map(|steps| steps.clamp(1, STEPS_MAX))
                .filter(|steps| *steps != ANIMATION_STEPS);
        } else if key.eq_ignore_ascii_case("race") {
            if let Ok(length) = parse_race_length(value) {
                config.race_length = length.clamp(RACE_LENGTH_MIN, RACE_LENGTH_MAX);
            }
        }
    }
    config
}

/// Reads the race length field. Range checks stay with the race itself.
pub(crate) fn parse_race_length(value: &str) -> Result<usize, String> {
    let trimmed = value.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| format!("race length must be a whole number, got {trimmed:?}"))
}

fn parse_renderer(value: &str) -> Option<RendererKind> {
    if value.eq_ignore_ascii_case("svg") {
        Some(RendererKind::Svg)
    } else if value.eq_ignore_ascii_case("wgpu") || value.eq_ignore_ascii_case("webgl") {
        Some(RendererKind::Wgpu)
    } else {
        None
    }
}

fn parse_seed_value(value: &str) -> Option<u64> {
    let normalized = value.trim().replace('_', "");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_uses_defaults() {
        assert_eq!(parse_hash_config(""), InitConfig::default());
        assert_eq!(parse_hash_config("#"), InitConfig::default());
    }

    #[test]
    fn reads_every_known_key() {
        let config = parse_hash_config("#Renderer=SVG; seed=0x2A ;steps=20;race=12");
        assert_eq!(config.renderer, RendererKind::Svg);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.steps, Some(20));
        assert_eq!(config.race_length, 12);
    }

    #[test]
    fn out_of_range_values_are_clamped_or_ignored() {
        let config = parse_hash_config("race=500;steps=0;seed=abc;renderer=canvas;mystery=1");
        assert_eq!(config.race_length, RACE_LENGTH_MAX);
        assert_eq!(config.steps, Some(1));
        assert_eq!(config.seed, None);
        assert_eq!(config.renderer, RendererKind::Wgpu);
    }

    #[test]
    fn decimal_seed_with_separators() {
        assert_eq!(parse_hash_config("seed=1_000").seed, Some(1000));
    }

    #[test]
    fn race_length_reports_non_numeric_input() {
        assert_eq!(parse_race_length(" 7 "), Ok(7));
        let message = parse_race_length("abc").expect_err("not a number");
        assert!(message.contains("\"abc\""), "{message}");
        assert!(parse_race_length("").is_err());
        assert!(parse_race_length("-3").is_err());
    }
}
