use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::models::{Category, Listing};

/// Category constraint of a browse query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
    /// A value that is none of the known categories. Matches nothing, the
    /// same as an exact comparison against it would.
    Unknown(String),
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => CategoryFilter::All,
            value => match Category::from_str(value) {
                Ok(category) => CategoryFilter::Only(category),
                Err(_) => CategoryFilter::Unknown(value.to_string()),
            },
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
            CategoryFilter::Unknown(_) => false,
        }
    }
}

/// Raw browse parameters as they arrive from a query string or prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCriteria {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "type")]
    pub category: Option<String>,
    #[serde(default)]
    pub max_rent: Option<String>,
}

/// Normalised filter criteria. The default matches every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Lowercased location fragment; empty means any location.
    pub location: String,
    pub category: CategoryFilter,
    pub max_rent: Option<Decimal>,
}

impl FilterCriteria {
    /// Builds criteria from user input. A maximum rent that is not a number
    /// is treated as unset rather than as zero.
    pub fn from_raw(location: &str, category: &str, max_rent: &str) -> Self {
        let max_rent = match max_rent.trim() {
            "" => None,
            value => match Decimal::from_str(value) {
                Ok(limit) => Some(limit),
                Err(_) => {
                    debug!("Ignoring non-numeric max rent {:?}", value);
                    None
                }
            },
        };

        Self {
            location: location.trim().to_lowercase(),
            category: CategoryFilter::parse(category),
            max_rent,
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let location_ok =
            self.location.is_empty() || listing.location.to_lowercase().contains(&self.location);
        let rent_ok = self.max_rent.map_or(true, |limit| listing.rent <= limit);
        location_ok && self.category.matches(listing.category) && rent_ok
    }
}

impl From<&RawCriteria> for FilterCriteria {
    fn from(raw: &RawCriteria) -> Self {
        FilterCriteria::from_raw(
            raw.location.as_deref().unwrap_or_default(),
            raw.category.as_deref().unwrap_or_default(),
            raw.max_rent.as_deref().unwrap_or_default(),
        )
    }
}

/// Listings satisfying every criterion, in their original order.
pub fn filter(listings: &[Listing], criteria: &FilterCriteria) -> Vec<Listing> {
    listings
        .iter()
        .filter(|listing| criteria.matches(listing))
        .cloned()
        .collect()
}

/// Base list plus criteria; the visible list is recomputed whenever either
/// changes.
#[derive(Debug, Clone, Default)]
pub struct ListingBrowser {
    listings: Vec<Listing>,
    criteria: FilterCriteria,
    visible: Vec<Listing>,
}

impl ListingBrowser {
    pub fn new(listings: Vec<Listing>) -> Self {
        let mut browser = Self {
            listings,
            ..Self::default()
        };
        browser.recompute();
        browser
    }

    pub fn set_listings(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        self.recompute();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.set_criteria(FilterCriteria::default());
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn total(&self) -> usize {
        self.listings.len()
    }

    pub fn visible(&self) -> &[Listing] {
        &self.visible
    }

    pub fn into_visible(self) -> Vec<Listing> {
        self.visible
    }

    fn recompute(&mut self) {
        self.visible = filter(&self.listings, &self.criteria);
    }
}
