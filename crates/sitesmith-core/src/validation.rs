//! Content validation for generated pages
//!
//! Two independent, pure checks:
//! - structure: doctype, html/head/body, Tailwind and Alpine.js inclusions
//! - image policy: every image source must be allow-listed, a data URI, or
//!   root-relative
//!
//! Callers decide how strictly to enforce the result. `write_page` rejects on
//! any issue, `edit_page` only reports.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Hosts images may be loaded from.
pub const ALLOWED_IMAGE_HOSTS: &[&str] = &["illustrations.popsy.co"];

static IMG_SRC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
});
static CSS_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)background(?:-image)?\s*:[^;{}<>]*?url\(\s*(?:"([^"]*)"|'([^']*)'|([^)'"\s]+))\s*\)"#)
        .unwrap()
});

/// A structural element every page must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredElement {
    Doctype,
    HtmlRoot,
    Head,
    Body,
    StyleFramework,
    Interactivity,
}

impl RequiredElement {
    pub const ALL: [RequiredElement; 6] = [
        RequiredElement::Doctype,
        RequiredElement::HtmlRoot,
        RequiredElement::Head,
        RequiredElement::Body,
        RequiredElement::StyleFramework,
        RequiredElement::Interactivity,
    ];

    /// Lowercase substring whose presence satisfies the requirement.
    pub fn marker(self) -> &'static str {
        match self {
            RequiredElement::Doctype => "<!doctype html",
            RequiredElement::HtmlRoot => "<html",
            RequiredElement::Head => "<head",
            RequiredElement::Body => "<body",
            RequiredElement::StyleFramework => "tailwindcss",
            RequiredElement::Interactivity => "alpinejs",
        }
    }
}

impl fmt::Display for RequiredElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequiredElement::Doctype => "Missing <!DOCTYPE html> declaration",
            RequiredElement::HtmlRoot => "Missing <html> root element",
            RequiredElement::Head => "Missing <head> section",
            RequiredElement::Body => "Missing <body> section",
            RequiredElement::StyleFramework => {
                "Missing Tailwind CSS inclusion (<script src=\"https://cdn.tailwindcss.com\">)"
            }
            RequiredElement::Interactivity => "Missing Alpine.js inclusion (alpinejs script tag)",
        };
        f.write_str(label)
    }
}

/// Combined result of both checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub missing: Vec<RequiredElement>,
    pub disallowed_images: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.disallowed_images.is_empty()
    }

    /// Human-readable issue lines, structure first.
    pub fn issues(&self) -> Vec<String> {
        let mut issues: Vec<String> = self.missing.iter().map(ToString::to_string).collect();
        issues.extend(self.disallowed_images.iter().map(|url| {
            format!(
                "Image source not allowed: {} (use {} illustrations, a data: URI, or a root-relative path)",
                url,
                ALLOWED_IMAGE_HOSTS.join(", ")
            )
        }));
        issues
    }
}

/// Run both checks.
pub fn validate_html(html: &str) -> ValidationReport {
    ValidationReport {
        missing: check_structure(html),
        disallowed_images: check_images(html),
    }
}

/// Structural requirements not met by `html`, in declaration order.
pub fn check_structure(html: &str) -> Vec<RequiredElement> {
    let lower = html.to_ascii_lowercase();
    RequiredElement::ALL
        .into_iter()
        .filter(|req| !lower.contains(req.marker()))
        .collect()
}

/// Image URLs (img sources and CSS background images) that violate the
/// image policy. Returned verbatim, de-duplicated, in document order.
pub fn check_images(html: &str) -> Vec<String> {
    let mut offending: Vec<String> = Vec::new();
    for url in image_urls(html) {
        if !is_allowed_image_url(&url) && !offending.contains(&url) {
            offending.push(url);
        }
    }
    offending
}

fn image_urls(html: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();
    for pattern in [&*IMG_SRC_PATTERN, &*CSS_URL_PATTERN] {
        for caps in pattern.captures_iter(html) {
            if let Some(m) = caps.iter().skip(1).flatten().next() {
                found.push((m.start(), m.as_str().trim().to_string()));
            }
        }
    }
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, url)| url).collect()
}

/// Whether a single image URL satisfies the policy.
pub fn is_allowed_image_url(raw: &str) -> bool {
    let url = raw.trim();
    if url
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    {
        return true;
    }
    // `/\host` resolves like `//host` in browsers
    if let Some(path) = url.strip_prefix('/') {
        if !path.starts_with(|c: char| c == '/' || c == '\\') {
            return true;
        }
    }

    let absolute = if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    };

    match Url::parse(&absolute) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| {
                let host = host.to_ascii_lowercase();
                ALLOWED_IMAGE_HOSTS
                    .iter()
                    .any(|allowed| host == *allowed || host.ends_with(&format!(".{allowed}")))
            })
            .unwrap_or(false),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL_HEAD: &str = "<!DOCTYPE html><html><head>\
        <script src=\"https://cdn.tailwindcss.com\"></script>\
        <script defer src=\"https://unpkg.com/alpinejs\"></script></head>";

    fn page_with_body(body: &str) -> String {
        format!("{SHELL_HEAD}<body>{body}</body></html>")
    }

    #[test]
    fn test_complete_page_is_valid() {
        let report = validate_html(&page_with_body("<h1>Hi</h1>"));
        assert!(report.is_valid());
        assert!(report.issues().is_empty());
    }

    #[test]
    fn test_each_missing_item_is_named_exactly() {
        let full = page_with_body("<p>x</p>");
        let cases = [
            ("<!DOCTYPE html>", RequiredElement::Doctype),
            ("<html>", RequiredElement::HtmlRoot),
            ("<head>", RequiredElement::Head),
            ("<body>", RequiredElement::Body),
            ("cdn.tailwindcss.com", RequiredElement::StyleFramework),
            ("unpkg.com/alpinejs", RequiredElement::Interactivity),
        ];
        let covered: Vec<RequiredElement> = cases.iter().map(|(_, req)| *req).collect();
        assert_eq!(covered, RequiredElement::ALL.to_vec());

        for (needle, expected) in cases {
            let html = full.replace(needle, "");
            assert_eq!(check_structure(&html), vec![expected], "removing {needle}");
            assert!(!validate_html(&html).is_valid());
        }
    }

    #[test]
    fn test_structure_reports_all_missing_in_order() {
        let missing = check_structure("<div>just a fragment</div>");
        assert_eq!(missing, RequiredElement::ALL.to_vec());

        let missing = check_structure("<html><body></body></html>");
        assert_eq!(
            missing,
            vec![
                RequiredElement::Doctype,
                RequiredElement::Head,
                RequiredElement::StyleFramework,
                RequiredElement::Interactivity,
            ]
        );
    }

    #[test]
    fn test_structure_match_is_case_insensitive() {
        let html = "<!doctype HTML><HTML><HEAD><script src='https://CDN.TailwindCSS.com'></script>\
                    <script src='https://unpkg.com/AlpineJS'></script></HEAD><BODY></BODY></HTML>";
        assert!(check_structure(html).is_empty());
    }

    #[test]
    fn test_disallowed_image_reported_verbatim() {
        let html = page_with_body(
            "<img class=\"w-full\" src=\"https://images.unsplash.com/photo-123?w=800\">",
        );
        let report = validate_html(&html);
        assert!(!report.is_valid());
        assert_eq!(
            report.disallowed_images,
            vec!["https://images.unsplash.com/photo-123?w=800".to_string()]
        );
        assert!(report.issues()[0].contains("https://images.unsplash.com/photo-123?w=800"));
    }

    #[test]
    fn test_allowed_image_sources() {
        let html = page_with_body(
            "<img src=\"https://illustrations.popsy.co/amber/working.svg\">\
             <img src='data:image/png;base64,iVBORw0KGgo='>\
             <img src=\"/assets/logo.svg\">\
             <div style=\"background-image: url('https://illustrations.popsy.co/gray/man.svg')\"></div>",
        );
        assert!(check_images(&html).is_empty());
    }

    #[test]
    fn test_css_background_urls_are_checked() {
        let html = page_with_body(
            "<section style=\"background-image: url(https://example.com/bg.jpg)\"></section>\
             <style>.hero { background: #000 url(\"//cdn.example.org/hero.png\") no-repeat; }</style>",
        );
        assert_eq!(
            check_images(&html),
            vec![
                "https://example.com/bg.jpg".to_string(),
                "//cdn.example.org/hero.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_relative_and_lookalike_hosts_rejected() {
        assert!(!is_allowed_image_url("images/photo.png"));
        assert!(!is_allowed_image_url("https://illustrations.popsy.co.evil.com/x.svg"));
        assert!(!is_allowed_image_url("//evil.com/x.svg"));
        assert!(is_allowed_image_url("//illustrations.popsy.co/x.svg"));
        assert!(is_allowed_image_url("DATA:image/gif;base64,R0lGOD"));
    }

    #[test]
    fn test_unquoted_img_src_is_checked() {
        let html = page_with_body(
            "<img src=https://evil.example.com/x.jpg alt=x>\
             <img src=/assets/ok.svg>",
        );
        let report = validate_html(&html);
        assert!(!report.is_valid());
        assert_eq!(
            report.disallowed_images,
            vec!["https://evil.example.com/x.jpg".to_string()]
        );
    }

    #[test]
    fn test_backslash_after_root_is_not_root_relative() {
        assert!(!is_allowed_image_url("/\\evil.example.com/x.png"));
        assert!(is_allowed_image_url("/images/a\\b.png"));
    }

    #[test]
    fn test_duplicate_offenders_listed_once() {
        let html = page_with_body(
            "<img src=\"https://x.com/a.png\"><img src=\"https://x.com/a.png\">",
        );
        assert_eq!(check_images(&html), vec!["https://x.com/a.png".to_string()]);
    }
}
