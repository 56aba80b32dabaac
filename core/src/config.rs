use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::Material;

const DEFAULT_COIL_LENGTH: u32 = 2;
const DEFAULT_MAX_COIL_LENGTH: u32 = 16;
const DEFAULT_STRUCTURAL_MATERIAL: Material = Material::Chain;
const DEFAULT_CLIMB_SPEED: f64 = 0.2;
const DEFAULT_INTERACTION_RADIUS: u32 = 1;
const DEFAULT_ANCHOR_MATERIALS: [Material; 2] = [Material::OakFence, Material::SpruceFence];
const DEFAULT_ANIMATION_ENABLED: bool = true;
const DEFAULT_TICKS_PER_CELL: u32 = 2;
const DEFAULT_SUPPORT_MATERIAL: Material = Material::OakFence;
const DEFAULT_EXTEND_RADIUS: f64 = 0.5;
const DEFAULT_COMBINE_ENABLED: bool = true;

/// Failure to read the configuration file at all.
///
/// Individual invalid values never produce this error; they fall back to
/// their documented defaults with a warning instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file was not valid TOML.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Validated configuration consumed by every rope system.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Coil item settings.
    pub coil: CoilConfig,
    /// Rope block and climbing settings.
    pub rope: RopeConfig,
    /// Time-sliced placement settings.
    pub animation: AnimationConfig,
    /// Projectile landing settings.
    pub arrow: ArrowConfig,
    /// Crafting settings.
    pub crafting: CraftingConfig,
}

/// Coil item settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoilConfig {
    /// Length given to coils created without an explicit length.
    pub default_length: u32,
    /// Upper bound for coil lengths, combining, and drops.
    pub max_length: u32,
}

/// Rope block and climbing settings.
#[derive(Clone, Debug, PartialEq)]
pub struct RopeConfig {
    /// Grid material a rope cell must carry.
    pub structural_material: Material,
    /// Vertical speed applied while climbing, in cells per tick.
    pub climb_speed: f64,
    /// Manhattan radius of the near-rope test.
    pub interaction_radius: u32,
    /// Non-solid materials that still qualify as rope anchors.
    pub anchor_materials: Vec<Material>,
}

/// Time-sliced placement settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Whether placements and extensions animate cell by cell.
    pub enabled: bool,
    /// Ticks between successive cell placements, at least one.
    pub ticks_per_cell: u32,
}

/// Projectile landing settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrowConfig {
    /// Material placed as the auxiliary support when no anchor exists.
    pub support_material: Material,
    /// Radius of the nearest-rope search on impact; zero disables it.
    pub extend_radius: f64,
}

/// Crafting settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CraftingConfig {
    /// Whether two coils may combine into one.
    pub combine_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coil: CoilConfig {
                default_length: DEFAULT_COIL_LENGTH,
                max_length: DEFAULT_MAX_COIL_LENGTH,
            },
            rope: RopeConfig {
                structural_material: DEFAULT_STRUCTURAL_MATERIAL,
                climb_speed: DEFAULT_CLIMB_SPEED,
                interaction_radius: DEFAULT_INTERACTION_RADIUS,
                anchor_materials: DEFAULT_ANCHOR_MATERIALS.to_vec(),
            },
            animation: AnimationConfig {
                enabled: DEFAULT_ANIMATION_ENABLED,
                ticks_per_cell: DEFAULT_TICKS_PER_CELL,
            },
            arrow: ArrowConfig {
                support_material: DEFAULT_SUPPORT_MATERIAL,
                extend_radius: DEFAULT_EXTEND_RADIUS,
            },
            crafting: CraftingConfig {
                combine_enabled: DEFAULT_COMBINE_ENABLED,
            },
        }
    }
}

impl Config {
    /// Parses and validates configuration from TOML text.
    ///
    /// Every field is optional. Invalid values fall back to their defaults
    /// and emit a warning; only unparseable TOML is an error.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Ok(raw.validate())
    }

    /// Reports whether the material is a configured non-solid anchor.
    #[must_use]
    pub fn is_anchor_material(&self, material: Material) -> bool {
        self.rope.anchor_materials.contains(&material)
    }

    /// Reports whether the material qualifies as a rope support.
    ///
    /// Solid blocks always qualify; configured anchor materials qualify
    /// despite not being solid.
    #[must_use]
    pub fn qualifies_as_support(&self, material: Material) -> bool {
        material.is_solid() || self.is_anchor_material(material)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawConfig {
    coil: RawCoil,
    rope: RawRope,
    animation: RawAnimation,
    arrow: RawArrow,
    crafting: RawCrafting,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawCoil {
    default_length: Option<i64>,
    max_length: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawRope {
    structural_material: Option<String>,
    climb_speed: Option<f64>,
    interaction_radius: Option<i64>,
    anchor_materials: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawAnimation {
    enabled: Option<bool>,
    ticks_per_cell: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawArrow {
    support_material: Option<String>,
    extend_radius: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawCrafting {
    combine_enabled: Option<bool>,
}

impl RawConfig {
    fn validate(self) -> Config {
        let defaults = Config::default();

        Config {
            coil: CoilConfig {
                default_length: positive_length(
                    "coil.default-length",
                    self.coil.default_length,
                    defaults.coil.default_length,
                ),
                max_length: positive_length(
                    "coil.max-length",
                    self.coil.max_length,
                    defaults.coil.max_length,
                ),
            },
            rope: RopeConfig {
                structural_material: material_or_default(
                    "rope.structural-material",
                    self.rope.structural_material,
                    defaults.rope.structural_material,
                ),
                climb_speed: positive_scale(
                    "rope.climb-speed",
                    self.rope.climb_speed,
                    defaults.rope.climb_speed,
                ),
                interaction_radius: non_negative_radius(
                    "rope.interaction-radius",
                    self.rope.interaction_radius,
                    defaults.rope.interaction_radius,
                ),
                anchor_materials: anchor_materials(
                    self.rope.anchor_materials,
                    &defaults.rope.anchor_materials,
                ),
            },
            animation: AnimationConfig {
                enabled: self
                    .animation
                    .enabled
                    .unwrap_or(defaults.animation.enabled),
                ticks_per_cell: positive_length(
                    "animation.ticks-per-cell",
                    self.animation.ticks_per_cell,
                    defaults.animation.ticks_per_cell,
                ),
            },
            arrow: ArrowConfig {
                support_material: material_or_default(
                    "arrow.support-material",
                    self.arrow.support_material,
                    defaults.arrow.support_material,
                ),
                extend_radius: non_negative_scale(
                    "arrow.extend-radius",
                    self.arrow.extend_radius,
                    defaults.arrow.extend_radius,
                ),
            },
            crafting: CraftingConfig {
                combine_enabled: self
                    .crafting
                    .combine_enabled
                    .unwrap_or(defaults.crafting.combine_enabled),
            },
        }
    }
}

fn positive_length(key: &str, value: Option<i64>, default: u32) -> u32 {
    match value {
        None => default,
        Some(value) if value >= 1 => u32::try_from(value).unwrap_or_else(|_| {
            warn!(key, value, default, "value out of range, using default");
            default
        }),
        Some(value) => {
            warn!(key, value, default, "value must be at least 1, using default");
            default
        }
    }
}

fn non_negative_radius(key: &str, value: Option<i64>, default: u32) -> u32 {
    match value {
        None => default,
        Some(value) if value >= 0 => u32::try_from(value).unwrap_or_else(|_| {
            warn!(key, value, default, "value out of range, using default");
            default
        }),
        Some(value) => {
            warn!(key, value, default, "value must not be negative, using default");
            default
        }
    }
}

fn positive_scale(key: &str, value: Option<f64>, default: f64) -> f64 {
    match value {
        None => default,
        Some(value) if value > 0.0 && value.is_finite() => value,
        Some(value) => {
            warn!(key, value, default, "value must be positive, using default");
            default
        }
    }
}

fn non_negative_scale(key: &str, value: Option<f64>, default: f64) -> f64 {
    match value {
        None => default,
        Some(value) if value >= 0.0 && value.is_finite() => value,
        Some(value) => {
            warn!(key, value, default, "value must not be negative, using default");
            default
        }
    }
}

fn material_or_default(key: &str, value: Option<String>, default: Material) -> Material {
    match value {
        None => default,
        Some(name) => Material::parse(&name).unwrap_or_else(|| {
            warn!(key, name = %name, fallback = default.name(), "unknown material, using default");
            default
        }),
    }
}

fn anchor_materials(value: Option<Vec<String>>, defaults: &[Material]) -> Vec<Material> {
    let Some(names) = value else {
        return defaults.to_vec();
    };

    let mut materials = Vec::with_capacity(names.len());
    for name in names {
        match Material::parse(&name) {
            Some(material) => materials.push(material),
            None => warn!(name = %name, "unknown anchor material, skipping"),
        }
    }
    materials
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::Material;

    #[test]
    fn empty_input_yields_defaults() {
        let config = Config::from_toml_str("").expect("empty config parses");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [coil]
            default-length = 4
            max-length = 32

            [rope]
            structural-material = "oak_fence"
            climb-speed = 0.35
            interaction-radius = 2
            anchor-materials = ["spruce_fence"]

            [animation]
            enabled = false
            ticks-per-cell = 5

            [arrow]
            support-material = "spruce_fence"
            extend-radius = 1.5

            [crafting]
            combine-enabled = false
            "#,
        )
        .expect("config parses");

        assert_eq!(config.coil.default_length, 4);
        assert_eq!(config.coil.max_length, 32);
        assert_eq!(config.rope.structural_material, Material::OakFence);
        assert!((config.rope.climb_speed - 0.35).abs() < f64::EPSILON);
        assert_eq!(config.rope.interaction_radius, 2);
        assert_eq!(config.rope.anchor_materials, vec![Material::SpruceFence]);
        assert!(!config.animation.enabled);
        assert_eq!(config.animation.ticks_per_cell, 5);
        assert_eq!(config.arrow.support_material, Material::SpruceFence);
        assert!((config.arrow.extend_radius - 1.5).abs() < f64::EPSILON);
        assert!(!config.crafting.combine_enabled);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = Config::from_toml_str(
            r#"
            [coil]
            default-length = 0
            max-length = -3

            [rope]
            structural-material = "bedrock"
            climb-speed = -1.0
            interaction-radius = -2
            anchor-materials = ["oak_fence", "mystery_wood"]

            [animation]
            ticks-per-cell = 0

            [arrow]
            support-material = "nonsense"
            extend-radius = -0.5
            "#,
        )
        .expect("config parses");

        let defaults = Config::default();
        assert_eq!(config.coil.default_length, defaults.coil.default_length);
        assert_eq!(config.coil.max_length, defaults.coil.max_length);
        assert_eq!(
            config.rope.structural_material,
            defaults.rope.structural_material
        );
        assert!((config.rope.climb_speed - defaults.rope.climb_speed).abs() < f64::EPSILON);
        assert_eq!(
            config.rope.interaction_radius,
            defaults.rope.interaction_radius
        );
        assert_eq!(config.rope.anchor_materials, vec![Material::OakFence]);
        assert_eq!(
            config.animation.ticks_per_cell,
            defaults.animation.ticks_per_cell
        );
        assert_eq!(config.arrow.support_material, defaults.arrow.support_material);
        assert!((config.arrow.extend_radius - defaults.arrow.extend_radius).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_toml_is_an_error() {
        assert!(Config::from_toml_str("[coil").is_err());
    }

    #[test]
    fn support_qualification_covers_solids_and_anchors() {
        let config = Config::default();
        assert!(config.qualifies_as_support(Material::Stone));
        assert!(config.qualifies_as_support(Material::OakFence));
        assert!(!config.qualifies_as_support(Material::Chain));
        assert!(!config.qualifies_as_support(Material::Air));
    }
}
