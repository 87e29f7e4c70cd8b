//! Component categories, marketplace listings, and the category → search-term mappings
//! produced by the generative-text step.

mod spec;

pub use spec::{extract_json_object, AdjustedSpec, ComponentSpec, SpecError};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of parts a build is made of. Serialized by its label (e.g. `"CPU Cooler"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "Motherboard")]
    Motherboard,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "PSU")]
    Psu,
    #[serde(rename = "CPU Cooler")]
    CpuCooler,
    #[serde(rename = "FAN")]
    Fan,
    #[serde(rename = "PC case")]
    Case,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Cpu,
        Category::Gpu,
        Category::Motherboard,
        Category::Ram,
        Category::Psu,
        Category::CpuCooler,
        Category::Fan,
        Category::Case,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Gpu => "GPU",
            Category::Motherboard => "Motherboard",
            Category::Ram => "RAM",
            Category::Psu => "PSU",
            Category::CpuCooler => "CPU Cooler",
            Category::Fan => "FAN",
            Category::Case => "PC case",
        }
    }

    /// Exact label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// A resolved marketplace entry. Price is in the marketplace's minor currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub name: String,
    pub price: u64,
    pub url: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u64,
}

impl Listing {
    pub fn new(name: impl Into<String>, price: u64, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            url: url.into(),
            image: String::new(),
            rating: 0.0,
            review_count: 0,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_rating(mut self, rating: f64, review_count: u64) -> Self {
        self.rating = rating;
        self.review_count = review_count;
        self
    }
}
