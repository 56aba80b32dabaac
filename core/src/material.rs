use serde::{Deserialize, Serialize};

/// Grid and item material vocabulary the rope systems reason about.
///
/// The set is deliberately small: it covers the structural and support
/// materials the configuration can select, the occupancy classes the
/// placement rules distinguish, and the two item representations the craft
/// rewriter must disambiguate. `PlayerHead` and `Arrow` only ever appear as
/// item representations, never as placed blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Empty cell.
    Air,
    /// Water source or flow.
    Water,
    /// Lava source or flow.
    Lava,
    /// Low grass cover that placement may overwrite.
    ShortGrass,
    /// Snow layer that placement may overwrite.
    SnowLayer,
    /// Generic solid stone.
    Stone,
    /// Generic solid earth.
    Dirt,
    /// Solid plank block.
    OakPlanks,
    /// Solid glass block.
    Glass,
    /// Hanging chain, the default structural rope material.
    Chain,
    /// Oak fence post, the default auxiliary support.
    OakFence,
    /// Spruce fence post.
    SpruceFence,
    /// Player-head shaped item representation shared with decorative heads.
    PlayerHead,
    /// Arrow item representation.
    Arrow,
}

impl Material {
    /// Reports whether the material is an empty cell.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Reports whether the material is a liquid.
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Water | Self::Lava)
    }

    /// Reports whether placement may overwrite the material.
    #[must_use]
    pub const fn is_replaceable(self) -> bool {
        matches!(self, Self::ShortGrass | Self::SnowLayer)
    }

    /// Reports whether the material forms a full solid block.
    ///
    /// Solid blocks qualify as rope supports; chains, fences, and item
    /// representations do not.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Stone | Self::Dirt | Self::OakPlanks | Self::Glass)
    }

    /// Canonical lowercase name of the material.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Water => "water",
            Self::Lava => "lava",
            Self::ShortGrass => "short_grass",
            Self::SnowLayer => "snow_layer",
            Self::Stone => "stone",
            Self::Dirt => "dirt",
            Self::OakPlanks => "oak_planks",
            Self::Glass => "glass",
            Self::Chain => "chain",
            Self::OakFence => "oak_fence",
            Self::SpruceFence => "spruce_fence",
            Self::PlayerHead => "player_head",
            Self::Arrow => "arrow",
        }
    }

    /// Resolves a material from its configured name.
    ///
    /// Matching is case-insensitive and treats `-` and `_` alike, so the
    /// names accepted in configuration files stay forgiving.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| if c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();

        const ALL: [Material; 14] = [
            Material::Air,
            Material::Water,
            Material::Lava,
            Material::ShortGrass,
            Material::SnowLayer,
            Material::Stone,
            Material::Dirt,
            Material::OakPlanks,
            Material::Glass,
            Material::Chain,
            Material::OakFence,
            Material::SpruceFence,
            Material::PlayerHead,
            Material::Arrow,
        ];
        ALL.into_iter().find(|material| material.name() == normalized)
    }
}
