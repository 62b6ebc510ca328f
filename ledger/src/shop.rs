//! Decoration catalog and per-owner inventory.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// A purchasable cosmetic overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in coins
    pub price: u64,
    pub icon: String,
    pub category: String,
}

/// Decorations an owner has bought and the one currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecorationInventory {
    #[serde(default)]
    pub purchased: Vec<String>,
    #[serde(default)]
    pub active: Option<String>,
}

impl DecorationInventory {
    pub fn owns(&self, decoration_id: &str) -> bool {
        self.purchased.iter().any(|id| id == decoration_id)
    }

    /// Add a decoration; fails if it is already owned.
    pub fn add(&mut self, decoration_id: &str) -> Result<()> {
        if self.owns(decoration_id) {
            return Err(LedgerError::AlreadyOwned(decoration_id.to_string()));
        }
        self.purchased.push(decoration_id.to_string());
        Ok(())
    }

    /// Select the active decoration, or clear it with `None`.
    pub fn set_active(&mut self, decoration_id: Option<&str>) -> Result<()> {
        if let Some(id) = decoration_id {
            if !self.owns(id) {
                return Err(LedgerError::NotOwned(id.to_string()));
            }
        }
        self.active = decoration_id.map(str::to_string);
        Ok(())
    }
}

/// Catalog entry annotated with the owner's inventory state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItem {
    #[serde(flatten)]
    pub decoration: Decoration,
    pub is_purchased: bool,
    pub is_active: bool,
}

/// Every decoration on sale.
pub fn catalog() -> Vec<Decoration> {
    vec![
        Decoration {
            id: "halloween".to_string(),
            name: "Spooky Halloween".to_string(),
            description: "Festive jack-o-lanterns, bats, and candy hang across your screen"
                .to_string(),
            price: 50,
            icon: "🎃".to_string(),
            category: "halloween".to_string(),
        },
        Decoration {
            id: "christmas_lights".to_string(),
            name: "Christmas Lights".to_string(),
            description: "Festive lights border your screen".to_string(),
            price: 75,
            icon: "🎄".to_string(),
            category: "christmas".to_string(),
        },
        Decoration {
            id: "snowflakes".to_string(),
            name: "Falling Snowflakes".to_string(),
            description: "Gentle snowflakes drift down your screen".to_string(),
            price: 60,
            icon: "❄️".to_string(),
            category: "winter".to_string(),
        },
    ]
}

/// Look up a catalog decoration by id.
pub fn find_decoration(decoration_id: &str) -> Result<Decoration> {
    catalog()
        .into_iter()
        .find(|d| d.id == decoration_id)
        .ok_or_else(|| LedgerError::NotFound(format!("decoration '{}'", decoration_id)))
}

/// Annotate the catalog with an owner's inventory.
pub fn shop_items(inventory: &DecorationInventory) -> Vec<ShopItem> {
    catalog()
        .into_iter()
        .map(|decoration| ShopItem {
            is_purchased: inventory.owns(&decoration.id),
            is_active: inventory.active.as_deref() == Some(decoration.id.as_str()),
            decoration,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_prices() {
        assert_eq!(find_decoration("halloween").unwrap().price, 50);
        assert_eq!(find_decoration("christmas_lights").unwrap().price, 75);
        assert_eq!(find_decoration("snowflakes").unwrap().price, 60);
        assert!(matches!(
            find_decoration("fireworks"),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_inventory_add_twice_fails() {
        let mut inventory = DecorationInventory::default();
        inventory.add("snowflakes").unwrap();

        assert_eq!(
            inventory.add("snowflakes"),
            Err(LedgerError::AlreadyOwned("snowflakes".to_string()))
        );
        assert_eq!(inventory.purchased.len(), 1);
    }

    #[test]
    fn test_set_active_requires_ownership() {
        let mut inventory = DecorationInventory::default();
        assert!(matches!(
            inventory.set_active(Some("halloween")),
            Err(LedgerError::NotOwned(_))
        ));

        inventory.add("halloween").unwrap();
        inventory.set_active(Some("halloween")).unwrap();
        assert_eq!(inventory.active.as_deref(), Some("halloween"));

        inventory.set_active(None).unwrap();
        assert!(inventory.active.is_none());
    }

    #[test]
    fn test_shop_items_flags() {
        let inventory = DecorationInventory {
            purchased: vec!["halloween".to_string(), "snowflakes".to_string()],
            active: Some("snowflakes".to_string()),
        };

        let items = shop_items(&inventory);
        let halloween = items.iter().find(|i| i.decoration.id == "halloween").unwrap();
        let snow = items.iter().find(|i| i.decoration.id == "snowflakes").unwrap();
        let lights = items.iter().find(|i| i.decoration.id == "christmas_lights").unwrap();

        assert!(halloween.is_purchased && !halloween.is_active);
        assert!(snow.is_purchased && snow.is_active);
        assert!(!lights.is_purchased && !lights.is_active);
    }
}
