//! # Car Search
//!
//! Filters and sort keys for `GET /cars`, rendered as query pairs.
//!
//! ## Example
//! ```rust
//! use drively_core::search::{CarQuery, CarSort};
//! use drively_core::{Money, Transmission};
//!
//! let query = CarQuery {
//!     make: Some("Honda".to_string()),
//!     transmission: Some(Transmission::Manual),
//!     max_price: Some(Money::from_major(1500)),
//!     available: Some(true),
//!     sort: CarSort::PriceAsc,
//!     ..CarQuery::default()
//! };
//! assert_eq!(
//!     query.to_query_pairs(),
//!     vec![
//!         ("make".to_string(), "Honda".to_string()),
//!         ("transmission".to_string(), "manual".to_string()),
//!         ("maxPrice".to_string(), "1500".to_string()),
//!         ("sort".to_string(), "rentalPrice".to_string()),
//!         ("available".to_string(), "true".to_string()),
//!     ]
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, MINOR_PER_MAJOR};
use crate::types::{FuelType, Transmission};
use crate::validation::ValidationResult;

// =============================================================================
// Sort Keys
// =============================================================================

/// Sort options offered on the car list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CarSort {
    #[default]
    #[serde(rename = "-createdAt")]
    Newest,
    #[serde(rename = "createdAt")]
    Oldest,
    #[serde(rename = "rentalPrice")]
    PriceAsc,
    #[serde(rename = "-rentalPrice")]
    PriceDesc,
    #[serde(rename = "-ratingScore")]
    TopRated,
}

impl CarSort {
    pub const ALL: [CarSort; 5] = [
        CarSort::Newest,
        CarSort::Oldest,
        CarSort::PriceAsc,
        CarSort::PriceDesc,
        CarSort::TopRated,
    ];

    /// Value sent as the `sort` parameter.
    pub const fn as_param(&self) -> &'static str {
        match self {
            CarSort::Newest => "-createdAt",
            CarSort::Oldest => "createdAt",
            CarSort::PriceAsc => "rentalPrice",
            CarSort::PriceDesc => "-rentalPrice",
            CarSort::TopRated => "-ratingScore",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            CarSort::Newest => "Newest First",
            CarSort::Oldest => "Oldest First",
            CarSort::PriceAsc => "Price: Low to High",
            CarSort::PriceDesc => "Price: High to Low",
            CarSort::TopRated => "Rating: High to Low",
        }
    }
}

impl fmt::Display for CarSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for CarSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CarSort::ALL
            .into_iter()
            .find(|sort| sort.as_param() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: CarSort::ALL
                    .iter()
                    .map(|sort| sort.as_param().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Query
// =============================================================================

/// Filters for the car list. `None` and blank strings are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub color: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub min_rating: Option<f64>,
    pub available: Option<bool>,
    pub limit: Option<u32>,
    pub sort: CarSort,
}

/// Baht value without trailing zeros, as the backend expects.
fn price_param(money: Money) -> String {
    if money.is_whole() {
        money.major().to_string()
    } else {
        format!("{:.2}", money.minor() as f64 / MINOR_PER_MAJOR as f64)
    }
}

impl CarQuery {
    /// What the public car list requests: available cars only, newest first.
    pub fn available_only() -> Self {
        CarQuery {
            available: Some(true),
            ..CarQuery::default()
        }
    }

    /// Checks the filter ranges.
    ///
    /// ## Rules
    /// - `min_price <= max_price` when both are set
    /// - prices not negative
    /// - `min_rating` between 0 and 5
    pub fn validate(&self) -> ValidationResult<()> {
        for (field, price) in [("minPrice", self.min_price), ("maxPrice", self.max_price)] {
            if matches!(price, Some(p) if p.minor() < 0) {
                return Err(ValidationError::MustBePositive {
                    field: field.to_string(),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ValidationError::OutOfOrder {
                    lower: "minPrice".to_string(),
                    upper: "maxPrice".to_string(),
                });
            }
        }
        if let Some(rating) = self.min_rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(ValidationError::OutOfRange {
                    field: "minRating".to_string(),
                    min: 0,
                    max: 5,
                });
            }
        }
        Ok(())
    }

    /// Renders the query in the order the car list sends it:
    /// filters, then `sort`, then `available` and `limit`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                let value = value.trim().to_string();
                if !value.is_empty() {
                    pairs.push((key.to_string(), value));
                }
            }
        };

        push("make", self.make.clone());
        push("model", self.model.clone());
        push("year", self.year.map(|y| y.to_string()));
        push("transmission", self.transmission.map(|t| t.as_str().to_string()));
        push("fuelType", self.fuel_type.map(|f| f.as_str().to_string()));
        push("color", self.color.clone());
        push("minPrice", self.min_price.map(price_param));
        push("maxPrice", self.max_price.map(price_param));
        push("minRating", self.min_rating.map(|r| r.to_string()));
        push("sort", Some(self.sort.as_param().to_string()));
        push("available", self.available.map(|a| a.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));

        pairs
    }
}
