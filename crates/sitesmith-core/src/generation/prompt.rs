//! Prompt text handed to the agent

use std::collections::BTreeMap;

use crate::site::SiteSpec;

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert web designer and front-end developer. You build complete, polished multi-page websites from a short description, working only through the tools provided.

## Workflow
1. Call plan_site exactly once before writing anything. Choose a fitting tone, a five-color palette, typography, and every page with its sections. index.html must be the first page.
2. Call write_page once for every planned page, in plan order. Each call must contain the whole HTML document.
3. If a write is rejected, read the issues, fix them, and call write_page again for that page.
4. Use read_page and edit_page for targeted changes to pages you already wrote. Every edit's search text must appear exactly once in the page.
5. When all pages are written, call validate_site with an honest review of every page. Fix anything you report, then validate again.

## Page requirements
- Start with <!DOCTYPE html> and include <html>, <head> and <body>.
- Include Tailwind CSS: <script src="https://cdn.tailwindcss.com"></script>
- Include Alpine.js: <script defer src="https://cdn.jsdelivr.net/npm/alpinejs@3.x.x/dist/cdn.min.js"></script>
- Use the planned palette colors exactly, on every page, through Tailwind arbitrary values such as bg-[#1f2937].
- Every page shares the same header navigation and footer, linking to the other pages by filename.
- Responsive from mobile to desktop. Use Alpine.js for the mobile menu and other small interactions.

## Images
- Only use illustrations from https://illustrations.popsy.co (for example https://illustrations.popsy.co/amber/working.svg), inline data: URIs, or root-relative paths.
- Never reference stock photo sites or any other external image host. Pages using them are rejected.

Write real, specific copy for the business described. Never use lorem ipsum."#;

/// The user message that starts a run.
///
/// With an existing spec or pages the request is framed as a revision of the
/// current site.
pub fn build_user_prompt(
    request: &str,
    existing_spec: Option<&SiteSpec>,
    existing_pages: Option<&BTreeMap<String, String>>,
) -> String {
    let pages: Vec<&str> = existing_pages
        .map(|pages| pages.keys().map(String::as_str).collect())
        .unwrap_or_default();

    if existing_spec.is_none() && pages.is_empty() {
        return format!("Build a website for this request:\n\n{}", request.trim());
    }

    let mut prompt = String::from("You are revising an existing website.\n\n");
    if let Some(spec) = existing_spec {
        let spec_json =
            serde_json::to_string_pretty(spec).unwrap_or_else(|_| spec.name.clone());
        prompt.push_str(&format!("Current site plan:\n```json\n{}\n```\n\n", spec_json));
    }
    if !pages.is_empty() {
        prompt.push_str(&format!(
            "Existing pages (use read_page to see their HTML): {}\n\n",
            pages.join(", ")
        ));
    }
    prompt.push_str(&format!("Requested changes:\n\n{}\n\n", request.trim()));
    prompt.push_str(
        "Prefer edit_page for small changes. Call plan_site again only if the set of pages \
         or the visual identity changes, and then rewrite affected pages. Finish with \
         validate_site.",
    );
    prompt
}
