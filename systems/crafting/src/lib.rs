#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Craft preview rewriting.
//!
//! Invoked whenever a crafting grid's result preview changes. The static
//! recipe declarations cannot encode variable rope lengths, and the coil's
//! item representation is shared with unrelated decorative heads, so the
//! declared preview has to be corrected after the fact: combined coils get
//! their computed length, rope-arrow previews inherit the ingredient coil's
//! length, and ambiguous mixes of coils and foreign heads are invalidated
//! rather than guessed at.

use ropeworks_core::{
    coil_length, combine_coils, is_rope_arrow, is_rope_coil, rope_arrow, Config, ItemStack,
    Material,
};

/// Decision for a pending craft preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CraftVerdict {
    /// Some unrelated recipe owns this preview; leave it alone.
    Untouched,
    /// Substitute the preview with the computed item.
    Replace(ItemStack),
    /// The grid is ambiguous; clear the preview instead of fabricating a
    /// wrong item.
    Invalidate,
}

/// Rewrites a craft result preview against the ingredient grid.
///
/// The combine check and the projectile-recipe check are independent; they
/// key off the preview's representation and never fire together because a
/// preview has exactly one material.
#[must_use]
pub fn rewrite_preview(
    config: &Config,
    preview: Option<&ItemStack>,
    slots: &[Option<ItemStack>],
) -> CraftVerdict {
    let Some(result) = preview else {
        return CraftVerdict::Untouched;
    };

    if result.material() == Material::PlayerHead {
        return rewrite_head_preview(config, slots);
    }

    if is_rope_arrow(result) {
        // Propagate the ingredient coil's length into the projectile; the
        // declared recipe result carries a placeholder length.
        if let Some(length) = slots
            .iter()
            .flatten()
            .find_map(|item| coil_length(item))
        {
            return CraftVerdict::Replace(rope_arrow(length));
        }
    }

    CraftVerdict::Untouched
}

fn rewrite_head_preview(config: &Config, slots: &[Option<ItemStack>]) -> CraftVerdict {
    let coils: Vec<&ItemStack> = slots
        .iter()
        .flatten()
        .filter(|item| is_rope_coil(item))
        .collect();
    let head_count = slots
        .iter()
        .flatten()
        .filter(|item| item.material() == Material::PlayerHead)
        .count();

    match coils.len() {
        2 => {
            if !config.crafting.combine_enabled {
                return CraftVerdict::Invalidate;
            }
            match combine_coils(coils[0], coils[1], config.coil.max_length) {
                Some(combined) => CraftVerdict::Replace(combined),
                None => CraftVerdict::Invalidate,
            }
        }
        1 if head_count > 1 => {
            // One coil mixed with foreign heads; no recipe of ours matches
            // and a foreign recipe would silently consume the coil.
            CraftVerdict::Invalidate
        }
        _ => CraftVerdict::Untouched,
    }
}
