//! Typed catalog identifiers.
//!
//! Content refers to definitions by string id. Each kind of definition gets
//! its own newtype so an item id cannot be passed where a quality id is
//! expected.

use core::borrow::Borrow;
use core::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of an [`ItemDefinition`](crate::catalog::ItemDefinition).
    ItemId
);
string_id!(
    /// Identifier of a quality definition (e.g. `age`, `purity`).
    QualityId
);
string_id!(
    /// Identifier of a trait definition (e.g. `hardened`).
    TraitId
);
string_id!(
    /// Identifier of an active [`Ability`](crate::catalog::Ability).
    AbilityId
);
string_id!(
    /// Identifier of a [`PassiveAbility`](crate::catalog::PassiveAbility).
    PassiveId
);
string_id!(
    /// Identifier of a [`Monster`](crate::catalog::Monster).
    MonsterId
);
string_id!(
    /// Identifier of a [`Recipe`](crate::catalog::Recipe).
    RecipeId
);
string_id!(
    /// Identifier of a [`DropTable`](crate::catalog::DropTable).
    DropTableId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn ids_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(ItemId::new("bronze_sword"), 1);
        assert_eq!(map.get("bronze_sword"), Some(&1));
        assert_eq!(ItemId::from("bronze_sword").to_string(), "bronze_sword");
    }
}
