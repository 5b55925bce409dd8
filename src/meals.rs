//! Meal catalog with live availability counters (mock NDX canteen feed)
//!
//! Availability moves with the order lifecycle: `reserve` on creation,
//! `release` on cancellation. Both mutate under the DashMap shard lock so
//! counters cannot go negative under concurrent requests.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Meal {
    pub meal_id: String,
    pub name: String,
    pub description: String,
    /// Unit price in LKR
    #[schema(value_type = String, example = "250.00")]
    pub price: Decimal,
    /// Government subsidy per unit in LKR (applies to eligible students only)
    #[schema(value_type = String, example = "150.00")]
    pub subsidy_per_unit: Decimal,
    /// Portions remaining for the day
    pub available: u32,
}

pub struct MealCatalog {
    meals: DashMap<String, Meal>,
}

impl MealCatalog {
    pub fn seeded() -> Self {
        let meals = DashMap::new();
        for m in seed_meals() {
            meals.insert(m.meal_id.clone(), m);
        }
        Self { meals }
    }

    pub fn get(&self, meal_id: &str) -> Option<Meal> {
        self.meals.get(meal_id).map(|m| m.clone())
    }

    /// Snapshot of the whole catalog, ordered by meal id.
    pub fn list(&self) -> Vec<Meal> {
        let mut all: Vec<Meal> = self.meals.iter().map(|m| m.clone()).collect();
        all.sort_by(|a, b| a.meal_id.cmp(&b.meal_id));
        all
    }

    /// Reserve `qty` portions. Returns the meal as priced at reservation
    /// time, or None when the meal is unknown or has too few portions left.
    pub fn reserve(&self, meal_id: &str, qty: u32) -> Option<Meal> {
        let mut entry = self.meals.get_mut(meal_id)?;
        if entry.available < qty {
            return None;
        }
        entry.available -= qty;
        Some(entry.clone())
    }

    /// Give portions back after a cancellation.
    pub fn release(&self, meal_id: &str, qty: u32) {
        if let Some(mut entry) = self.meals.get_mut(meal_id) {
            entry.available += qty;
        }
    }
}

fn seed_meals() -> Vec<Meal> {
    vec![
        Meal {
            meal_id: "MEAL-RICE-CURRY".to_string(),
            name: "Rice & Curry".to_string(),
            description: "Red rice, dhal curry, seasonal vegetables".to_string(),
            price: Decimal::new(25000, 2),
            subsidy_per_unit: Decimal::new(15000, 2),
            available: 120,
        },
        Meal {
            meal_id: "MEAL-KOTTU-VEG".to_string(),
            name: "Vegetable Kottu".to_string(),
            description: "Chopped roti with vegetables and egg".to_string(),
            price: Decimal::new(30000, 2),
            subsidy_per_unit: Decimal::new(15000, 2),
            available: 80,
        },
        Meal {
            meal_id: "MEAL-STRING-HOPPERS".to_string(),
            name: "String Hoppers".to_string(),
            description: "String hoppers with coconut sambol and kiri hodi".to_string(),
            price: Decimal::new(20000, 2),
            subsidy_per_unit: Decimal::new(15000, 2),
            available: 100,
        },
        Meal {
            meal_id: "MEAL-FRUIT-PACK".to_string(),
            name: "Fruit Pack".to_string(),
            description: "Banana, papaya slices, king coconut water".to_string(),
            price: Decimal::new(12000, 2),
            subsidy_per_unit: Decimal::new(12000, 2),
            available: 60,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_decrements_availability() {
        let catalog = MealCatalog::seeded();
        let before = catalog.get("MEAL-RICE-CURRY").unwrap().available;
        let meal = catalog.reserve("MEAL-RICE-CURRY", 3).unwrap();
        assert_eq!(meal.available, before - 3);
        assert_eq!(catalog.get("MEAL-RICE-CURRY").unwrap().available, before - 3);
    }

    #[test]
    fn test_reserve_rejects_oversell() {
        let catalog = MealCatalog::seeded();
        let available = catalog.get("MEAL-FRUIT-PACK").unwrap().available;
        assert!(catalog.reserve("MEAL-FRUIT-PACK", available + 1).is_none());
        // counter untouched on rejection
        assert_eq!(
            catalog.get("MEAL-FRUIT-PACK").unwrap().available,
            available
        );
    }

    #[test]
    fn test_reserve_unknown_meal() {
        let catalog = MealCatalog::seeded();
        assert!(catalog.reserve("MEAL-DOES-NOT-EXIST", 1).is_none());
    }

    #[test]
    fn test_release_restores_availability() {
        let catalog = MealCatalog::seeded();
        let before = catalog.get("MEAL-KOTTU-VEG").unwrap().available;
        catalog.reserve("MEAL-KOTTU-VEG", 5).unwrap();
        catalog.release("MEAL-KOTTU-VEG", 5);
        assert_eq!(catalog.get("MEAL-KOTTU-VEG").unwrap().available, before);
    }
}
