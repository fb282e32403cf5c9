//! Wire shapes of the global settings block and the builder profile.

use dpr_core::{AdvMode, AttackerProfile, DamageType, EngineSettings};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// String used for "no damage type" in resist/vuln fields.
pub const NO_DAMAGE_TYPE: &str = "none";

/// The `settings` block of a graph document, also the settings TOML shape.
///
/// Enumerated fields are kept as strings so unknown values degrade to the
/// default instead of rejecting the whole document. Numeric fields accept
/// fractional, out-of-range, or quoted numbers: those are rounded and clamped,
/// and anything non-numeric falls back to the field's default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireSettings {
    #[serde(deserialize_with = "lenient_level")]
    pub level: u8,
    #[serde(deserialize_with = "lenient_strength")]
    pub str: u8,
    #[serde(deserialize_with = "lenient_dexterity")]
    pub dex: u8,
    #[serde(rename = "targetAC", deserialize_with = "lenient_target_ac")]
    pub target_ac: i32,
    pub adv_mode: String,
    pub use_versatile: bool,
    pub resist: String,
    pub vuln: String,
}

impl WireSettings {
    pub fn to_settings(&self) -> EngineSettings {
        let adv_mode = if self.adv_mode.is_empty() {
            AdvMode::default()
        } else {
            self.adv_mode.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %self.adv_mode, "unknown advMode; using normal");
                AdvMode::default()
            })
        };

        let mut settings = EngineSettings::new()
            .with_level(self.level)
            .with_abilities(self.str, self.dex)
            .with_target_ac(self.target_ac)
            .with_adv_mode(adv_mode)
            .with_resist(parse_damage_type(&self.resist, "resist"))
            .with_vuln(parse_damage_type(&self.vuln, "vuln"));
        settings.use_versatile = self.use_versatile;
        settings
    }
}

impl From<&EngineSettings> for WireSettings {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            level: settings.level,
            str: settings.strength,
            dex: settings.dexterity,
            target_ac: settings.target_ac,
            adv_mode: settings.adv_mode.to_string(),
            use_versatile: settings.use_versatile,
            resist: damage_type_name(settings.resist),
            vuln: damage_type_name(settings.vuln),
        }
    }
}

impl Default for WireSettings {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

fn parse_damage_type(value: &str, field: &'static str) -> Option<DamageType> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NO_DAMAGE_TYPE) {
        return None;
    }
    match value.parse() {
        Ok(damage_type) => Some(damage_type),
        Err(_) => {
            tracing::warn!(field, value, "unknown damage type; ignoring");
            None
        }
    }
}

fn damage_type_name(damage_type: Option<DamageType>) -> String {
    damage_type.map_or_else(|| NO_DAMAGE_TYPE.to_string(), |t| t.to_string())
}

const ABILITY_SCORE_MIN: u8 = 1;
const ABILITY_SCORE_MAX: u8 = 30;

/// Any JSON/TOML value that might stand for a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LooseNumber::Integer(value) => *value as f64,
            LooseNumber::Float(value) => *value,
            LooseNumber::Text(text) => text.trim().parse().ok()?,
            LooseNumber::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

/// Round to the nearest integer and clamp into `min..=max`.
/// Values that are not numbers at all become `default`.
fn lenient_number<'de, D, T>(
    deserializer: D,
    field: &'static str,
    default: T,
    min: T,
    max: T,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Copy + Into<i64> + TryFrom<i64>,
{
    let Some(raw) = LooseNumber::deserialize(deserializer)?.as_f64() else {
        tracing::warn!(
            field,
            default = Into::<i64>::into(default),
            "settings value is not a number; using default"
        );
        return Ok(default);
    };

    let (min, max): (i64, i64) = (min.into(), max.into());
    let adjusted = raw.round().clamp(min as f64, max as f64) as i64;
    if adjusted as f64 != raw {
        tracing::warn!(field, raw, adjusted, "settings value rounded or clamped");
    }
    Ok(T::try_from(adjusted).unwrap_or(default))
}

fn lenient_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    lenient_number(
        deserializer,
        "level",
        EngineSettings::DEFAULT_LEVEL,
        AttackerProfile::MIN_LEVEL,
        AttackerProfile::MAX_LEVEL,
    )
}

fn lenient_strength<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    lenient_number(
        deserializer,
        "str",
        EngineSettings::DEFAULT_STRENGTH,
        ABILITY_SCORE_MIN,
        ABILITY_SCORE_MAX,
    )
}

fn lenient_dexterity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    lenient_number(
        deserializer,
        "dex",
        EngineSettings::DEFAULT_DEXTERITY,
        ABILITY_SCORE_MIN,
        ABILITY_SCORE_MAX,
    )
}

fn lenient_target_ac<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    lenient_number(
        deserializer,
        "targetAC",
        EngineSettings::DEFAULT_TARGET_AC,
        i32::MIN,
        i32::MAX,
    )
}

/// Attacker numbers handed over by the character builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderProfile {
    pub total_level: u8,
    pub str_mod: i32,
    pub dex_mod: i32,
}

impl From<BuilderProfile> for AttackerProfile {
    fn from(profile: BuilderProfile) -> Self {
        AttackerProfile::new(profile.total_level, profile.str_mod, profile.dex_mod)
    }
}
