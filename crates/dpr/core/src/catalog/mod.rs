//! Read-only lookup tables consumed by the evaluator.
//!
//! The [`CatalogOracle`] trait is the seam between the engine and its static
//! data. Lookups by identifier come in two flavours: strict (`Option`) and
//! lenient (`*_or_default`), which substitutes the first catalog row so that
//! unknown identifiers from imported graphs never abort an evaluation.
mod monsters;
mod styles;
mod weapons;

pub use monsters::{AbilityScores, MonsterEntry, TargetProfile};
pub use styles::{
    FeatureType, FeatureTypePreset, FightingStyle, FightingStylePreset, builtin_feature_types,
    builtin_fighting_styles,
};
pub use weapons::{WeaponPreset, WeaponTags, builtin_weapons};

use crate::error::{DprError, ErrorSeverity};

/// Oracle providing weapon, fighting-style and feature-type presets.
pub trait CatalogOracle: Send + Sync {
    /// All weapon rows, default first.
    fn weapons(&self) -> &[WeaponPreset];

    /// All fighting-style rows, default first.
    fn fighting_styles(&self) -> &[FightingStylePreset];

    /// All feature-type rows, default first.
    fn feature_types(&self) -> &[FeatureTypePreset];

    fn weapon(&self, id: &str) -> Option<&WeaponPreset> {
        self.weapons().iter().find(|weapon| weapon.id == id)
    }

    /// Weapon by id, or the first row when the id is unknown.
    ///
    /// Returns `None` only for an empty catalog.
    fn weapon_or_default(&self, id: &str) -> Option<&WeaponPreset> {
        self.weapon(id).or_else(|| {
            let fallback = self.weapons().first();
            if let Some(fallback) = fallback {
                tracing::warn!(weapon = id, fallback = %fallback.id, "unknown weapon id");
            }
            fallback
        })
    }

    fn fighting_style(&self, id: &str) -> Option<FightingStyle> {
        let style = id.parse::<FightingStyle>().ok()?;
        self.fighting_styles()
            .iter()
            .any(|preset| preset.style == style)
            .then_some(style)
    }

    /// Fighting style by id, or the first row when the id is unknown.
    fn fighting_style_or_default(&self, id: &str) -> FightingStyle {
        self.fighting_style(id).unwrap_or_else(|| {
            let fallback = self
                .fighting_styles()
                .first()
                .map(|preset| preset.style)
                .unwrap_or_default();
            if !id.is_empty() {
                tracing::warn!(style = id, fallback = %fallback, "unknown fighting style");
            }
            fallback
        })
    }

    fn feature_type(&self, id: &str) -> Option<FeatureType> {
        let kind = id.parse::<FeatureType>().ok()?;
        self.feature_types()
            .iter()
            .any(|preset| preset.kind == kind)
            .then_some(kind)
    }

    /// Feature type by id, or the first row when the id is unknown.
    fn feature_type_or_default(&self, id: &str) -> FeatureType {
        self.feature_type(id).unwrap_or_else(|| {
            let fallback = self
                .feature_types()
                .first()
                .map(|preset| preset.kind)
                .unwrap_or(FeatureType::FightingStyle);
            tracing::warn!(feature_type = id, fallback = %fallback, "unknown feature type");
            fallback
        })
    }
}

/// Owned catalog tables.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    weapons: Vec<WeaponPreset>,
    fighting_styles: Vec<FightingStylePreset>,
    feature_types: Vec<FeatureTypePreset>,
}

impl Catalog {
    /// Catalog with the built-in SRD rows.
    pub fn builtin() -> Self {
        Self {
            weapons: builtin_weapons(),
            fighting_styles: builtin_fighting_styles(),
            feature_types: builtin_feature_types(),
        }
    }

    /// Replace the weapon table, e.g. with rows loaded from a data file.
    ///
    /// An empty table is rejected since the lenient lookups need a default row.
    pub fn with_weapons(mut self, weapons: Vec<WeaponPreset>) -> Result<Self, CatalogError> {
        if weapons.is_empty() {
            return Err(CatalogError::EmptyWeaponTable);
        }
        self.weapons = weapons;
        Ok(self)
    }

    /// Strict weapon lookup.
    pub fn require_weapon(&self, id: &str) -> Result<&WeaponPreset, CatalogError> {
        self.weapon(id)
            .ok_or_else(|| CatalogError::UnknownWeapon(id.to_string()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CatalogOracle for Catalog {
    fn weapons(&self) -> &[WeaponPreset] {
        &self.weapons
    }

    fn fighting_styles(&self) -> &[FightingStylePreset] {
        &self.fighting_styles
    }

    fn feature_types(&self) -> &[FeatureTypePreset] {
        &self.feature_types
    }
}

/// Errors from strict catalog operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("weapon '{0}' is not in the catalog")]
    UnknownWeapon(String),

    #[error("weapon table must contain at least one row")]
    EmptyWeaponTable,
}

impl DprError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CatalogError::UnknownWeapon(_) => ErrorSeverity::Recoverable,
            CatalogError::EmptyWeaponTable => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::UnknownWeapon(_) => "CATALOG_UNKNOWN_WEAPON",
            CatalogError::EmptyWeaponTable => "CATALOG_EMPTY_WEAPON_TABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_fall_back_to_first_row() {
        let catalog = Catalog::builtin();
        let weapon = catalog.weapon_or_default("vorpal-spork").map(|w| w.id.as_str());
        assert_eq!(weapon, Some("longsword"));
        assert_eq!(catalog.fighting_style_or_default("bogus"), FightingStyle::None);
        assert_eq!(catalog.fighting_style_or_default(""), FightingStyle::None);
        assert_eq!(
            catalog.feature_type_or_default("bogus"),
            FeatureType::FightingStyle
        );
    }

    #[test]
    fn known_ids_resolve() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.weapon_or_default("rapier").map(|w| w.name.as_str()),
            Some("Rapier")
        );
        assert_eq!(
            catalog.fighting_style_or_default("archery"),
            FightingStyle::Archery
        );
        assert_eq!(catalog.feature_type("smite"), Some(FeatureType::Smite));
    }

    #[test]
    fn strict_lookup_reports_unknown_weapon() {
        let catalog = Catalog::builtin();
        let err = catalog.require_weapon("nope").unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_UNKNOWN_WEAPON");
        assert!(err.severity().is_recoverable());
    }

    #[test]
    fn empty_weapon_table_is_rejected() {
        let result = Catalog::builtin().with_weapons(Vec::new());
        assert_eq!(result.unwrap_err(), CatalogError::EmptyWeaponTable);
    }
}
