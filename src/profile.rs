//! Business profile for the simulated restaurant
//!
//! The profile is plain data. The call controller only ever reads it; edits
//! go through [`ProfileStore`] and take effect on the next call.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// A dish on the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in minor currency units (cents)
    pub price_cents: u32,
    #[serde(default)]
    pub allergen_note: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_cents: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price_cents,
            allergen_note: String::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_allergens(mut self, note: impl Into<String>) -> Self {
        self.allergen_note = note.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

fn default_currency() -> String {
    "$".to_string()
}

/// Everything the automated receptionist knows about the business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub opening_hours: String,
    #[serde(default)]
    pub closed_days: String,
    #[serde(default)]
    pub takeaway_available: bool,
    #[serde(default)]
    pub fulfillment_notes: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

/// Profile validation and loading errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Business name must not be empty")]
    EmptyName,
    #[error("Duplicate menu item id: {0}")]
    DuplicateMenuItem(String),
    #[error("Failed to read profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse profile: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BusinessProfile {
    /// Built-in profile used when no profile file is configured
    pub fn sample() -> Self {
        Self {
            name: "Trattoria Lucia".to_string(),
            cuisine: "Italian".to_string(),
            address: "12 Harbour Street, Portside".to_string(),
            phone: "555-0142".to_string(),
            opening_hours: "Tuesday to Sunday, 11:30 AM to 10:00 PM".to_string(),
            closed_days: "We're closed on Mondays and public holidays.".to_string(),
            takeaway_available: true,
            fulfillment_notes: "Takeaway orders are ready for pickup in about 20 minutes."
                .to_string(),
            currency: default_currency(),
            menu: vec![
                MenuItem::new("margherita", "Margherita", 1200)
                    .with_description("Tomato, mozzarella and basil")
                    .with_allergens("Contains gluten and dairy.")
                    .with_tag("vegetarian"),
                MenuItem::new("carbonara", "Carbonara", 1450)
                    .with_description("Spaghetti with egg, pecorino and guanciale")
                    .with_allergens("Contains gluten, egg and dairy."),
                MenuItem::new("tiramisu", "Tiramisu", 750)
                    .with_description("Coffee-soaked ladyfingers with mascarpone")
                    .with_allergens("Contains gluten, egg and dairy.")
                    .with_tag("dessert")
                    .with_tag("vegetarian"),
            ],
        }
    }

    /// Load and validate a profile from a JSON file
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path)?;
        let profile: Self = serde_json::from_str(&raw)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let mut seen = HashSet::new();
        for item in &self.menu {
            if !seen.insert(item.id.as_str()) {
                return Err(ProfileError::DuplicateMenuItem(item.id.clone()));
            }
        }
        Ok(())
    }

    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == id)
    }

    /// Format an amount in minor units with the profile's currency symbol
    pub fn format_price(&self, cents: u32) -> String {
        format!("{}{}.{:02}", self.currency, cents / 100, cents % 100)
    }
}

/// Shared, editable profile
///
/// Readers get an `Arc` snapshot; replacing the profile never affects a
/// snapshot already handed out.
#[derive(Clone)]
pub struct ProfileStore {
    current: Arc<RwLock<Arc<BusinessProfile>>>,
}

impl ProfileStore {
    pub fn new(profile: BusinessProfile) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(profile))),
        }
    }

    pub async fn get(&self) -> Arc<BusinessProfile> {
        Arc::clone(&*self.current.read().await)
    }

    /// Validate and replace the stored profile
    pub async fn replace(&self, profile: BusinessProfile) -> Result<Arc<BusinessProfile>, ProfileError> {
        profile.validate()?;
        let profile = Arc::new(profile);
        *self.current.write().await = Arc::clone(&profile);
        tracing::info!(name = %profile.name, items = profile.menu.len(), "Business profile updated");
        Ok(profile)
    }
}
