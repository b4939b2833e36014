use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ingredient consumed by every pizza regardless of its toppings.
pub const BASE_INGREDIENT: &str = "pate";

/// Pizza sizes offered on the menu
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PizzaSize {
    Small,
    Medium,
    Large,
}

impl PizzaSize {
    pub const ALL: [PizzaSize; 3] = [PizzaSize::Small, PizzaSize::Medium, PizzaSize::Large];

    /// Price multiplier applied to the medium base price, in percent
    pub fn multiplier_percent(self) -> i64 {
        match self {
            PizzaSize::Small => 80,
            PizzaSize::Medium => 100,
            PizzaSize::Large => 130,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PizzaSize::Small => "small",
            PizzaSize::Medium => "medium",
            PizzaSize::Large => "large",
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid size '{0}': expected one of small, medium, large")]
pub struct UnknownSize(pub String);

impl FromStr for PizzaSize {
    type Err = UnknownSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(PizzaSize::Small),
            "medium" => Ok(PizzaSize::Medium),
            "large" => Ok(PizzaSize::Large),
            _ => Err(UnknownSize(s.to_string())),
        }
    }
}

/// A pizza on the menu: canonical key, medium price and base recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PizzaRecipe {
    pub key: &'static str,
    pub display_name: &'static str,
    pub base_price_cents: i64,
    pub base_toppings: &'static [&'static str],
}

impl PizzaRecipe {
    /// Whether `topping` belongs to the base recipe, ignoring case
    pub fn includes(&self, topping: &str) -> bool {
        let topping = topping.trim().to_lowercase();
        self.base_toppings.iter().any(|base| *base == topping)
    }
}

pub const PIZZAS: &[PizzaRecipe] = &[
    PizzaRecipe {
        key: "margherita",
        display_name: "Margherita",
        base_price_cents: 800,
        base_toppings: &["tomate", "mozzarella", "basilic"],
    },
    PizzaRecipe {
        key: "reine",
        display_name: "Reine",
        base_price_cents: 1000,
        base_toppings: &["tomate", "mozzarella", "jambon", "champignons"],
    },
    PizzaRecipe {
        key: "4 fromages",
        display_name: "4 Fromages",
        base_price_cents: 1100,
        base_toppings: &["mozzarella", "gorgonzola", "chèvre", "emmental"],
    },
    PizzaRecipe {
        key: "calzone",
        display_name: "Calzone",
        base_price_cents: 1200,
        base_toppings: &["tomate", "mozzarella", "jambon", "oeuf"],
    },
    PizzaRecipe {
        key: "végétarienne",
        display_name: "Végétarienne",
        base_price_cents: 900,
        base_toppings: &["tomate", "mozzarella", "poivrons", "oignons", "olives"],
    },
    PizzaRecipe {
        key: "pepperoni",
        display_name: "Pepperoni",
        base_price_cents: 1050,
        base_toppings: &["tomate", "mozzarella", "pepperoni"],
    },
];

const ALIASES: &[(&str, &str)] = &[
    ("reina", "reine"),
    ("vegetarienne", "végétarienne"),
    ("quatre fromages", "4 fromages"),
];

/// Resolve a customer-supplied pizza name (any case, aliases allowed).
pub fn resolve(name: &str) -> Option<&'static PizzaRecipe> {
    let wanted = name.trim().to_lowercase();
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == wanted)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(wanted.as_str());

    PIZZAS.iter().find(|pizza| pizza.key == key)
}

/// Every name accepted by [`resolve`], canonical names first.
pub fn accepted_names() -> Vec<&'static str> {
    PIZZAS
        .iter()
        .map(|pizza| pizza.key)
        .chain(ALIASES.iter().map(|(alias, _)| *alias))
        .collect()
}
