use serde::{Deserialize, Serialize};

use crate::Material;

/// Immutable item value carrying an optional rope length.
///
/// The length metadata is the sole discriminator between rope items and
/// unrelated items of the same material: a player head without metadata is
/// some decorative head, never a coil.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    material: Material,
    rope_length: Option<u32>,
}

impl ItemStack {
    /// Creates a plain item with no rope metadata.
    #[must_use]
    pub const fn new(material: Material) -> Self {
        Self {
            material,
            rope_length: None,
        }
    }

    /// Material representation of the item.
    #[must_use]
    pub const fn material(&self) -> Material {
        self.material
    }

    /// Rope length metadata, if the item carries any.
    #[must_use]
    pub const fn rope_length(&self) -> Option<u32> {
        self.rope_length
    }
}

/// Constructs a rope coil of the given length.
///
/// Lengths below one are lifted to one; a coil always converts to at least
/// one placed cell.
#[must_use]
pub fn rope_coil(length: u32) -> ItemStack {
    ItemStack {
        material: Material::PlayerHead,
        rope_length: Some(length.max(1)),
    }
}

/// Constructs a rope projectile carrying the given length.
#[must_use]
pub fn rope_arrow(length: u32) -> ItemStack {
    ItemStack {
        material: Material::Arrow,
        rope_length: Some(length.max(1)),
    }
}

/// Reports whether the item is a rope coil.
#[must_use]
pub fn is_rope_coil(item: &ItemStack) -> bool {
    item.material == Material::PlayerHead && item.rope_length.is_some()
}

/// Reports whether the item is a rope projectile.
#[must_use]
pub fn is_rope_arrow(item: &ItemStack) -> bool {
    item.material == Material::Arrow && item.rope_length.is_some()
}

/// Length carried by a rope coil, or `None` for any other item.
#[must_use]
pub fn coil_length(item: &ItemStack) -> Option<u32> {
    if is_rope_coil(item) {
        item.rope_length
    } else {
        None
    }
}

/// Length carried by a rope projectile, or `None` for any other item.
#[must_use]
pub fn arrow_length(item: &ItemStack) -> Option<u32> {
    if is_rope_arrow(item) {
        item.rope_length
    } else {
        None
    }
}

/// Combines two coils into one, capped at the configured maximum length.
///
/// Returns `None` unless both items are rope coils.
#[must_use]
pub fn combine_coils(first: &ItemStack, second: &ItemStack, max_length: u32) -> Option<ItemStack> {
    let combined = coil_length(first)?.saturating_add(coil_length(second)?);
    Some(rope_coil(combined.min(max_length)))
}

#[cfg(test)]
mod tests {
    use super::{
        arrow_length, coil_length, combine_coils, is_rope_arrow, is_rope_coil, rope_arrow,
        rope_coil, ItemStack,
    };
    use crate::Material;

    #[test]
    fn metadata_is_the_sole_discriminator() {
        let decorative = ItemStack::new(Material::PlayerHead);
        assert!(!is_rope_coil(&decorative));
        assert_eq!(coil_length(&decorative), None);

        let coil = rope_coil(8);
        assert!(is_rope_coil(&coil));
        assert_eq!(coil_length(&coil), Some(8));
        assert_eq!(arrow_length(&coil), None);
    }

    #[test]
    fn arrows_and_coils_do_not_cross_match() {
        let arrow = rope_arrow(5);
        assert!(is_rope_arrow(&arrow));
        assert!(!is_rope_coil(&arrow));
        assert_eq!(arrow_length(&arrow), Some(5));
        assert_eq!(coil_length(&arrow), None);
    }

    #[test]
    fn combine_caps_at_max_length() {
        let a = rope_coil(3);
        let b = rope_coil(5);
        let combined = combine_coils(&a, &b, 16).expect("two coils combine");
        assert_eq!(coil_length(&combined), Some(8));

        let capped = combine_coils(&rope_coil(12), &rope_coil(12), 16).expect("combine");
        assert_eq!(coil_length(&capped), Some(16));
    }

    #[test]
    fn combine_rejects_foreign_items() {
        let coil = rope_coil(4);
        let head = ItemStack::new(Material::PlayerHead);
        assert_eq!(combine_coils(&coil, &head, 16), None);
        assert_eq!(combine_coils(&head, &coil, 16), None);
    }

    #[test]
    fn zero_length_requests_are_lifted_to_one() {
        assert_eq!(coil_length(&rope_coil(0)), Some(1));
        assert_eq!(arrow_length(&rope_arrow(0)), Some(1));
    }
}
