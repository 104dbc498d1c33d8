//! plan_site - Commit the site plan before any page is written

use serde_json::{json, Value};

use crate::site::{GenerationState, SiteSpec};
use crate::tools::implementations::bullet_list;
use crate::tools::{ToolDetails, ToolOutcome};

pub const DESCRIPTION: &str = "Plan the whole site before writing any page: name, tone, the exact five-color palette, typography, and every page with its sections. Call this first. Calling it again replaces the previous plan entirely.";

pub fn parameters_schema() -> Value {
    let color = json!({ "type": "string", "description": "CSS color, e.g. #1f2937" });
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Site or business name" },
            "tagline": { "type": "string" },
            "siteType": {
                "type": "string",
                "enum": ["landing", "business", "portfolio", "restaurant", "saas", "ecommerce",
                         "blog", "agency", "event", "nonprofit", "personal", "other"]
            },
            "industry": { "type": "string" },
            "audience": { "type": "string", "description": "Who the site is for" },
            "tone": {
                "type": "string",
                "enum": ["professional", "friendly", "playful", "luxurious", "bold", "minimal",
                         "technical", "warm", "other"]
            },
            "colorPalette": {
                "type": "object",
                "properties": {
                    "primary": color,
                    "secondary": color,
                    "accent": color,
                    "background": color,
                    "text": color
                },
                "required": ["primary", "secondary", "accent", "background", "text"]
            },
            "typography": {
                "type": "object",
                "properties": {
                    "headingStyle": { "type": "string", "enum": ["serif", "sans", "display", "mono"] },
                    "bodyFont": { "type": "string", "enum": ["sans", "serif", "mono"] }
                },
                "required": ["headingStyle", "bodyFont"]
            },
            "pages": {
                "type": "array",
                "description": "Pages in navigation order; index.html first",
                "items": {
                    "type": "object",
                    "properties": {
                        "filename": { "type": "string", "description": "Bare file name, e.g. about.html" },
                        "title": { "type": "string" },
                        "purpose": { "type": "string" },
                        "sections": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "type": { "type": "string", "description": "hero, features, pricing, testimonials, footer, ..." },
                                    "headline": { "type": "string" },
                                    "subheadline": { "type": "string" },
                                    "content": { "type": "string", "description": "What the section says or shows" },
                                    "layout": { "type": "string" },
                                    "elements": { "type": "array", "items": { "type": "string" } }
                                },
                                "required": ["type"]
                            }
                        }
                    },
                    "required": ["filename", "title"]
                },
                "minItems": 1
            },
            "features": { "type": "array", "items": { "type": "string" } }
        },
        "required": ["name", "siteType", "tone", "colorPalette", "typography", "pages"]
    })
}

/// Replace the plan wholesale. No precondition is enforced.
pub fn execute(spec: SiteSpec, state: &mut GenerationState) -> ToolOutcome {
    let pages: Vec<String> = spec
        .pages
        .iter()
        .map(|p| format!("{} ({})", p.filename, p.title))
        .collect();
    let palette = &spec.color_palette;

    let replaced = state.spec.is_some();
    let text = format!(
        "Site plan {} for \"{}\".\n\nPages to write ({}):\n{}\n\n\
         Use exactly this palette on every page:\n\
         - primary: {}\n- secondary: {}\n- accent: {}\n- background: {}\n- text: {}\n\n\
         Next: write each page with write_page.",
        if replaced { "replaced" } else { "saved" },
        spec.name,
        pages.len(),
        bullet_list(&pages),
        palette.primary,
        palette.secondary,
        palette.accent,
        palette.background,
        palette.text,
    );

    state.spec = Some(spec.clone());
    ToolOutcome::success_with(text, ToolDetails::Plan { spec })
}
