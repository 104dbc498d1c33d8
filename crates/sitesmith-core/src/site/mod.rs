//! Site planning model
//!
//! `SiteSpec` is the plan the agent commits to before writing pages. It is
//! pure metadata: pages are rendered from the agent's HTML, never from the
//! spec directly.

pub mod state;

pub use state::GenerationState;

use serde::{Deserialize, Serialize};

/// Kind of site being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    Landing,
    Business,
    Portfolio,
    Restaurant,
    Saas,
    Ecommerce,
    Blog,
    Agency,
    Event,
    Nonprofit,
    Personal,
    #[serde(other)]
    Other,
}

/// Voice of the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Professional,
    Friendly,
    Playful,
    Luxurious,
    Bold,
    Minimal,
    Technical,
    Warm,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStyle {
    Serif,
    Sans,
    Display,
    Mono,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFont {
    Sans,
    Serif,
    Mono,
    #[serde(other)]
    Other,
}

/// The five named colors every page must reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl ColorPalette {
    /// Neutral grays with a blue accent.
    pub fn neutral() -> Self {
        Self {
            primary: "#1f2937".to_string(),
            secondary: "#4b5563".to_string(),
            accent: "#2563eb".to_string(),
            background: "#ffffff".to_string(),
            text: "#111827".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub heading_style: HeadingStyle,
    pub body_font: BodyFont,
}

/// One section of a planned page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    /// Open vocabulary: hero, features, pricing, footer, ...
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub elements: Vec<String>,
}

/// A planned page. The filename is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    pub filename: String,
    pub title: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

/// The full site plan produced by the `plan_site` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSpec {
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    pub site_type: SiteType,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub audience: String,
    pub tone: Tone,
    pub color_palette: ColorPalette,
    pub typography: Typography,
    pub pages: Vec<PageSpec>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl SiteSpec {
    /// Minimal spec used when pages exist but the agent never planned.
    pub fn fallback() -> Self {
        Self {
            name: "Untitled Site".to_string(),
            tagline: String::new(),
            site_type: SiteType::Other,
            industry: "General".to_string(),
            audience: "General".to_string(),
            tone: Tone::Professional,
            color_palette: ColorPalette::neutral(),
            typography: Typography {
                heading_style: HeadingStyle::Sans,
                body_font: BodyFont::Sans,
            },
            pages: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn page_filenames(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.filename.as_str()).collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn bakery_spec() -> SiteSpec {
        SiteSpec {
            name: "Crumb & Co".to_string(),
            tagline: "Bread worth waking up for".to_string(),
            site_type: SiteType::Restaurant,
            industry: "Food".to_string(),
            audience: "Locals".to_string(),
            tone: Tone::Warm,
            color_palette: ColorPalette {
                primary: "#7c2d12".to_string(),
                secondary: "#fed7aa".to_string(),
                accent: "#ea580c".to_string(),
                background: "#fffbeb".to_string(),
                text: "#1c1917".to_string(),
            },
            typography: Typography {
                heading_style: HeadingStyle::Serif,
                body_font: BodyFont::Sans,
            },
            pages: vec![
                PageSpec {
                    filename: "index.html".to_string(),
                    title: "Home".to_string(),
                    purpose: "Introduce the bakery".to_string(),
                    sections: vec![SectionSpec {
                        section_type: "hero".to_string(),
                        headline: Some("Fresh every morning".to_string()),
                        subheadline: None,
                        content: "Hero with storefront illustration".to_string(),
                        layout: "split".to_string(),
                        elements: vec!["cta".to_string()],
                    }],
                },
                PageSpec {
                    filename: "menu.html".to_string(),
                    title: "Menu".to_string(),
                    purpose: "List breads and pastries".to_string(),
                    sections: Vec::new(),
                },
            ],
            features: vec!["online orders".to_string()],
        }
    }

    pub fn valid_page(title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<title>{title}</title>\n\
             <script src=\"https://cdn.tailwindcss.com\"></script>\n\
             <script defer src=\"https://cdn.jsdelivr.net/npm/alpinejs@3.x.x/dist/cdn.min.js\"></script>\n\
             </head>\n<body>\n<h1>{title}</h1>\n</body>\n</html>\n"
        )
    }
}
