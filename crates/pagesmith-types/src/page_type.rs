//! The fixed catalog of landing page archetypes.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// One of the ten landing page archetypes a user can pick.
///
/// Users select a page type by its catalog key (`"1"` through `"10"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    TechStartup,
    Ecommerce,
    PersonalBrand,
    Saas,
    Restaurant,
    Fitness,
    Education,
    NonProfit,
    RealEstate,
    CreativeAgency,
}

impl PageType {
    /// Every page type, in catalog order.
    pub const ALL: [PageType; 10] = [
        PageType::TechStartup,
        PageType::Ecommerce,
        PageType::PersonalBrand,
        PageType::Saas,
        PageType::Restaurant,
        PageType::Fitness,
        PageType::Education,
        PageType::NonProfit,
        PageType::RealEstate,
        PageType::CreativeAgency,
    ];

    /// Look up a page type by its catalog key. Surrounding whitespace is ignored.
    pub fn from_key(key: &str) -> Option<PageType> {
        let key = key.trim();
        Self::ALL.into_iter().find(|page_type| page_type.key() == key)
    }

    /// Catalog key shown to the user and carried in button data.
    pub fn key(self) -> &'static str {
        match self {
            PageType::TechStartup => "1",
            PageType::Ecommerce => "2",
            PageType::PersonalBrand => "3",
            PageType::Saas => "4",
            PageType::Restaurant => "5",
            PageType::Fitness => "6",
            PageType::Education => "7",
            PageType::NonProfit => "8",
            PageType::RealEstate => "9",
            PageType::CreativeAgency => "10",
        }
    }

    /// Short display title (button label).
    pub fn title(self) -> &'static str {
        match self {
            PageType::TechStartup => "Tech Startup",
            PageType::Ecommerce => "E-commerce Store",
            PageType::PersonalBrand => "Personal Brand",
            PageType::Saas => "SaaS Product",
            PageType::Restaurant => "Restaurant/Food",
            PageType::Fitness => "Fitness/Health",
            PageType::Education => "Education/Course",
            PageType::NonProfit => "Non-profit",
            PageType::RealEstate => "Real Estate",
            PageType::CreativeAgency => "Creative Agency",
        }
    }

    /// One-line description of what the archetype emphasizes.
    pub fn summary(self) -> &'static str {
        match self {
            PageType::TechStartup => "Modern, clean design with focus on innovation",
            PageType::Ecommerce => "Product showcase with shopping features",
            PageType::PersonalBrand => "Professional portfolio and about section",
            PageType::Saas => "Software service with features and pricing",
            PageType::Restaurant => "Culinary focus with menu highlights",
            PageType::Fitness => "Workout plans and health tips",
            PageType::Education => "Learning platform with course offerings",
            PageType::NonProfit => "Cause-focused with donation features",
            PageType::RealEstate => "Property listings and contact forms",
            PageType::CreativeAgency => "Portfolio showcase and services",
        }
    }

    /// Visual direction handed to the generator for this archetype.
    pub fn style_hint(self) -> &'static str {
        match self {
            PageType::TechStartup => {
                "Lean into a forward-looking tech look: blues, purples and cyans."
            }
            PageType::Ecommerce => {
                "Make products and buying the focus, with warm oranges, reds and golds."
            }
            PageType::PersonalBrand => {
                "Keep it polished and personal, in navy, gold and white."
            }
            PageType::Saas => {
                "Highlight features, pricing and a signup form using professional blues, greens and modern gradients."
            }
            PageType::Restaurant => {
                "Make it appetizing: warm reds and oranges with vivid food descriptions."
            }
            PageType::Fitness => {
                "Energetic and motivational, with bright greens, oranges and bold gradients."
            }
            PageType::Education => {
                "Trustworthy and studious, in deep blues and purples."
            }
            PageType::NonProfit => {
                "Emotional and cause-driven with a donation call, using calm greens and blues."
            }
            PageType::RealEstate => {
                "Professional and reassuring for property listings, with earth tones and blues."
            }
            PageType::CreativeAgency => {
                "Artistic and bold, with striking colors and expressive gradients."
            }
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title(), self.summary())
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageType::from_key(s).ok_or_else(|| format!("invalid page type: '{s}'"))
    }
}
