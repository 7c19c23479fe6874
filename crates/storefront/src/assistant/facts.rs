//! Site knowledge fact sheet.
//!
//! The fact sheet is read once at startup (built-in default or a YAML file)
//! and shared behind an `Arc`. Nothing mutates it afterwards.
//!
//! # YAML format
//!
//! ```yaml
//! name: AutoService BL
//! description: AutoService BL sells car parts and accessories.
//! owner:
//!   name: Loay
//!   phone: "+212 776270650"
//! address: 123 Main St, Casablanca, Morocco
//! hours: Mon-Fri 9:00 - 19:00
//! services:
//!   - Oil change
//! prices:
//!   - item: oil change
//!     price: from 25 USD
//! website: https://autoservice.ma   # optional, defaults to the site's base URL
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a fact sheet.
#[derive(Debug, Error)]
pub enum FactSheetError {
    /// The file could not be read.
    #[error("failed to read fact sheet: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML for a fact sheet.
    #[error("failed to parse fact sheet: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The fact sheet parsed but failed validation.
    #[error("invalid fact sheet: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Store owner contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub phone: String,
}

/// One entry of the price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHint {
    /// Item name, matched case-insensitively as a substring of questions.
    pub item: String,
    /// Free-form price text, e.g. "from 25 USD".
    pub price: String,
}

/// Static store metadata consulted by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactSheet {
    pub name: String,
    pub description: String,
    pub owner: Owner,
    pub address: String,
    pub hours: String,
    pub services: Vec<String>,
    /// Ordered; the first item found in a question wins.
    pub prices: Vec<PriceHint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Default for FactSheet {
    fn default() -> Self {
        Self {
            name: "AutoService BL".to_owned(),
            description: "AutoService BL sells car parts and accessories for BMW, Mercedes, \
                          Ford, and many more. We also do repairs and diagnostics."
                .to_owned(),
            owner: Owner {
                name: "Loay".to_owned(),
                phone: "+212 776270650".to_owned(),
            },
            address: "123 Main St, Casablanca, Morocco".to_owned(),
            hours: "Mon-Fri 9:00 - 19:00, Sat 9:00 - 14:00, Sun closed".to_owned(),
            services: vec![
                "Genuine OEM parts for BMW, Mercedes, Ford".to_owned(),
                "Brakes & suspension".to_owned(),
                "Engine diagnostics".to_owned(),
                "Oil change".to_owned(),
                "Tire replacement".to_owned(),
            ],
            prices: vec![
                PriceHint {
                    item: "oil change".to_owned(),
                    price: "from 25 USD".to_owned(),
                },
                PriceHint {
                    item: "brake pads".to_owned(),
                    price: "from 40 USD per axle".to_owned(),
                },
            ],
            website: None,
        }
    }
}

impl FactSheet {
    /// Parse and validate a fact sheet from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `FactSheetError::Parse` for malformed YAML and
    /// `FactSheetError::Invalid` if validation fails.
    pub fn from_yaml(yaml: &str) -> Result<Self, FactSheetError> {
        let facts: Self = serde_yaml::from_str(yaml)?;
        let errors = facts.validate();
        if errors.is_empty() {
            Ok(facts)
        } else {
            Err(FactSheetError::Invalid(errors))
        }
    }

    /// Read, parse and validate a YAML fact sheet.
    ///
    /// # Errors
    ///
    /// Returns `FactSheetError::Io` if the file cannot be read, otherwise as
    /// [`FactSheet::from_yaml`].
    pub fn load(path: &Path) -> Result<Self, FactSheetError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Fill in the website from the site's base URL when the sheet has none.
    #[must_use]
    pub fn with_default_website(mut self, base_url: &str) -> Self {
        if self.website.is_none() {
            self.website = Some(base_url.trim_end_matches('/').to_owned());
        }
        self
    }

    /// Check the sheet for values the assistant can't answer with.
    ///
    /// Returns one message per problem; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("owner.name", &self.owner.name),
            ("owner.phone", &self.owner.phone),
            ("address", &self.address),
            ("hours", &self.hours),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{field} must not be empty"));
            }
        }

        if self.services.iter().any(|s| s.trim().is_empty()) {
            errors.push("services must not contain empty entries".to_owned());
        }

        let mut seen = HashSet::new();
        for (index, hint) in self.prices.iter().enumerate() {
            let key = hint.item.trim().to_lowercase();
            if key.is_empty() {
                errors.push(format!("prices[{index}].item must not be empty"));
            } else if !seen.insert(key) {
                errors.push(format!("prices[{index}].item '{}' is listed twice", hint.item));
            }
            if hint.price.trim().is_empty() {
                errors.push(format!("prices[{index}].price must not be empty"));
            }
        }

        errors
    }

    /// Price table as `item: price; item: price`.
    #[must_use]
    pub fn price_list(&self) -> String {
        self.prices
            .iter()
            .map(|hint| format!("{}: {}", hint.item, hint.price))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// First price entry whose item name appears in an already-lowercased question.
    #[must_use]
    pub fn find_price(&self, lowered: &str) -> Option<&PriceHint> {
        self.prices
            .iter()
            .find(|hint| lowered.contains(&hint.item.to_lowercase()))
    }
}
