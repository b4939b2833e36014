use serde::{Deserialize, Serialize};

use crate::product::{self, PizzaSize, PIZZAS};

/// Per-topping surcharge for toppings outside a pizza's base recipe, in cents
const TOPPING_SURCHARGES: &[(&str, i64)] = &[
    ("tomate", 50),
    ("mozzarella", 100),
    ("basilic", 50),
    ("jambon", 150),
    ("champignons", 100),
    ("gorgonzola", 150),
    ("chèvre", 150),
    ("emmental", 100),
    ("oeuf", 100),
    ("poivrons", 80),
    ("oignons", 50),
    ("olives", 80),
    ("pepperoni", 150),
    ("bacon", 150),
    ("anchois", 150),
    ("chorizo", 150),
];

/// Convert cents to a decimal amount for JSON views
pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat delivery fee below the threshold
    pub delivery_fee_cents: i64,

    /// Subtotal from which delivery is free (inclusive)
    pub free_delivery_threshold_cents: i64,

    /// Medium price used for names missing from the catalog
    pub default_base_price_cents: i64,

    /// Surcharge for toppings missing from the surcharge table
    pub default_topping_surcharge_cents: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            delivery_fee_cents: 500,
            free_delivery_threshold_cents: 3000,
            default_base_price_cents: 1000,
            default_topping_surcharge_cents: 100,
        }
    }
}

/// Menu line with the price of the base recipe in every size
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuEntry {
    pub name: String,
    pub base_toppings: Vec<String>,
    pub prices: SizePrices,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizePrices {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

/// Deterministic pizza pricing from the static catalog
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price of one pizza in cents.
    ///
    /// Lenient on purpose: an unknown name gets the default base price and no
    /// base toppings, an unknown size is priced as medium. The sized base is
    /// rounded half-up to the cent before surcharges are added.
    pub fn price<S: AsRef<str>>(&self, name: &str, size: &str, toppings: &[S]) -> i64 {
        let recipe = product::resolve(name);
        let multiplier = size
            .parse::<PizzaSize>()
            .map(PizzaSize::multiplier_percent)
            .unwrap_or(100);

        let base = recipe
            .map(|r| r.base_price_cents)
            .unwrap_or(self.config.default_base_price_cents);
        let sized = (base * multiplier + 50) / 100;

        let extras: i64 = toppings
            .iter()
            .map(AsRef::as_ref)
            .filter(|topping| !recipe.is_some_and(|r| r.includes(topping)))
            .map(|topping| self.topping_surcharge(topping))
            .sum();

        sized + extras
    }

    /// Surcharge for one extra topping, falling back to the default amount
    pub fn topping_surcharge(&self, topping: &str) -> i64 {
        let topping = topping.trim().to_lowercase();
        TOPPING_SURCHARGES
            .iter()
            .find(|(name, _)| *name == topping)
            .map(|(_, cents)| *cents)
            .unwrap_or(self.config.default_topping_surcharge_cents)
    }

    /// Zero from the free-delivery threshold upwards, the flat fee below it
    pub fn delivery_fee(&self, subtotal_cents: i64) -> i64 {
        if subtotal_cents >= self.config.free_delivery_threshold_cents {
            0
        } else {
            self.config.delivery_fee_cents
        }
    }

    pub fn total(&self, subtotal_cents: i64) -> i64 {
        subtotal_cents + self.delivery_fee(subtotal_cents)
    }

    /// One entry per catalog pizza, priced with its base recipe only
    pub fn menu(&self) -> Vec<MenuEntry> {
        PIZZAS
            .iter()
            .map(|pizza| {
                let price_for = |size: PizzaSize| {
                    cents_to_amount(self.price(pizza.key, size.as_str(), pizza.base_toppings))
                };
                MenuEntry {
                    name: pizza.display_name.to_string(),
                    base_toppings: pizza.base_toppings.iter().map(|t| t.to_string()).collect(),
                    prices: SizePrices {
                        small: price_for(PizzaSize::Small),
                        medium: price_for(PizzaSize::Medium),
                        large: price_for(PizzaSize::Large),
                    },
                }
            })
            .collect()
    }
}
