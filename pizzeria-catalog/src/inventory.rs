use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::product::BASE_INGREDIENT;

/// Highest level a counter may reach; the persistent table stores INTEGER
pub const MAX_STOCK: u32 = i32::MAX as u32;

/// Stock the shop opens with
const INITIAL_STOCK: &[(&str, u32)] = &[
    (BASE_INGREDIENT, 200),
    ("tomate", 100),
    ("mozzarella", 100),
    ("basilic", 50),
    ("jambon", 50),
    ("champignons", 50),
    ("gorgonzola", 30),
    ("chèvre", 30),
    ("emmental", 30),
    ("oeuf", 30),
    ("poivrons", 40),
    ("oignons", 40),
    ("olives", 40),
    ("pepperoni", 40),
    ("bacon", 30),
    ("anchois", 20),
    ("chorizo", 30),
];

/// Stock level of one ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockEntry {
    pub name: String,
    pub quantity: u32,
    pub is_base_ingredient: bool,
}

/// Point-in-time view of the whole inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InventorySnapshot {
    pub base_ingredients: Vec<StockEntry>,
    pub toppings: Vec<StockEntry>,
    pub total_quantity: u64,
}

#[derive(Debug, Clone, Copy)]
struct Stock {
    quantity: u32,
    is_base: bool,
}

/// Ingredient stock counters keyed by lower-cased ingredient name.
///
/// Entries are never removed, only adjusted.
#[derive(Debug, Clone)]
pub struct InventoryManager {
    stock: HashMap<String, Stock>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl InventoryManager {
    pub fn new() -> Self {
        Self::with_stock(INITIAL_STOCK.iter().map(|(name, qty)| (name.to_string(), *qty)))
    }

    /// Build from explicit counters. The base flag is derived from the name.
    pub fn with_stock<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let stock = entries
            .into_iter()
            .map(|(name, quantity)| {
                let name = normalize(&name);
                let is_base = name == BASE_INGREDIENT;
                (name, Stock { quantity, is_base })
            })
            .collect();
        Self { stock }
    }

    /// Current quantity, `None` for an unknown ingredient
    pub fn quantity(&self, name: &str) -> Option<u32> {
        self.stock.get(&normalize(name)).map(|s| s.quantity)
    }

    /// Overwrite a known counter, e.g. with a value restored from storage.
    /// Returns `false` when the ingredient is not part of the inventory.
    pub fn set_quantity(&mut self, name: &str, quantity: u32) -> bool {
        match self.stock.get_mut(&normalize(name)) {
            Some(entry) => {
                entry.quantity = quantity;
                true
            }
            None => false,
        }
    }

    fn available(&self, name: &str) -> bool {
        self.quantity(name).is_some_and(|q| q >= 1)
    }

    /// Check that every pizza of the batch can be made from current stock.
    ///
    /// Each pizza needs one unit of dough and one unit of each requested
    /// topping. Every requirement is checked against the stock as it is now,
    /// not against a running decrement across the batch: two pizzas needing
    /// the last unit of an ingredient both pass. Dough is checked before the
    /// toppings of each pizza; the first shortage ends the check.
    pub fn can_fulfill<'a, I>(&self, pizzas: I) -> Result<(), InventoryError>
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        for toppings in pizzas {
            if !self.available(BASE_INGREDIENT) {
                return Err(InventoryError::Insufficient {
                    ingredient: BASE_INGREDIENT.to_string(),
                });
            }
            if let Some(missing) = toppings.iter().find(|t| !self.available(t)) {
                return Err(InventoryError::Insufficient {
                    ingredient: normalize(missing),
                });
            }
        }
        Ok(())
    }

    /// Take one unit of dough and one unit per topping for every pizza.
    ///
    /// The total demand of the batch is computed first; if any counter would
    /// go below zero nothing is changed. Returns the touched counters with
    /// their new values, sorted by name.
    pub fn reduce<'a, I>(&mut self, pizzas: I) -> Result<Vec<(String, u32)>, InventoryError>
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut demand: BTreeMap<String, u32> = BTreeMap::new();
        for toppings in pizzas {
            *demand.entry(BASE_INGREDIENT.to_string()).or_default() += 1;
            for topping in toppings {
                *demand.entry(normalize(topping)).or_default() += 1;
            }
        }

        for (name, needed) in &demand {
            let enough = self.stock.get(name).is_some_and(|s| s.quantity >= *needed);
            if !enough {
                return Err(InventoryError::Insufficient {
                    ingredient: name.clone(),
                });
            }
        }

        let mut touched = Vec::with_capacity(demand.len());
        for (name, needed) in demand {
            if let Some(entry) = self.stock.get_mut(&name) {
                entry.quantity -= needed;
                touched.push((name, entry.quantity));
            }
        }
        Ok(touched)
    }

    /// Add `amount` units to a known ingredient and return the new level.
    /// The counter is left untouched when the result would exceed `MAX_STOCK`.
    pub fn add_stock(&mut self, name: &str, amount: u32) -> Result<u32, InventoryError> {
        let key = normalize(name);
        let entry = self
            .stock
            .get_mut(&key)
            .ok_or_else(|| InventoryError::UnknownIngredient(name.to_string()))?;

        let new_quantity = entry
            .quantity
            .checked_add(amount)
            .filter(|q| *q <= MAX_STOCK)
            .ok_or(InventoryError::StockLimit {
                ingredient: key,
                current: entry.quantity,
                limit: MAX_STOCK,
            })?;
        entry.quantity = new_quantity;
        Ok(new_quantity)
    }

    /// All counters as `(name, quantity)`, sorted by name
    pub fn counters(&self) -> Vec<(String, u32)> {
        let mut counters: Vec<_> = self
            .stock
            .iter()
            .map(|(name, s)| (name.clone(), s.quantity))
            .collect();
        counters.sort();
        counters
    }

    /// Snapshot split into base ingredients and toppings, each sorted by name
    pub fn get_full_inventory(&self) -> InventorySnapshot {
        let mut base_ingredients = Vec::new();
        let mut toppings = Vec::new();
        let mut total_quantity = 0u64;

        for (name, s) in &self.stock {
            total_quantity += u64::from(s.quantity);
            let entry = StockEntry {
                name: name.clone(),
                quantity: s.quantity,
                is_base_ingredient: s.is_base,
            };
            if s.is_base {
                base_ingredients.push(entry);
            } else {
                toppings.push(entry);
            }
        }

        base_ingredients.sort_by(|a, b| a.name.cmp(&b.name));
        toppings.sort_by(|a, b| a.name.cmp(&b.name));

        InventorySnapshot {
            base_ingredients,
            toppings,
            total_quantity,
        }
    }
}

impl Default for InventoryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("Ingredient out of stock: {ingredient}")]
    Insufficient { ingredient: String },

    #[error("Unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("Stock of '{ingredient}' cannot exceed {limit} (currently {current})")]
    StockLimit {
        ingredient: String,
        current: u32,
        limit: u32,
    },
}
