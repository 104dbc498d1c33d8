//! `sitesmith generate`: one generation from the terminal

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sitesmith_core::{
    generate, GenerationDeps, GenerationEvent, GenerationRequest, GeneratorConfig, SiteSpec,
};

pub const SPEC_FILE_NAME: &str = "site.json";

pub struct GenerateArgs {
    pub prompt: String,
    pub out: PathBuf,
    pub spec: Option<PathBuf>,
    pub pages: Option<PathBuf>,
}

/// Run the generate command. Returns whether the generation completed.
pub async fn run(args: GenerateArgs) -> Result<bool> {
    let config = GeneratorConfig::load()?;

    let mut request = GenerationRequest::new(args.prompt);
    if let Some(path) = &args.spec {
        request.existing_spec = Some(load_spec(path)?);
    }
    if let Some(dir) = &args.pages {
        request.existing_pages = Some(load_pages(dir)?);
    }

    let mut session = generate(request, GenerationDeps::new(config));
    tracing::info!(session_id = %session.id(), out = %args.out.display(), "Starting generation");

    while let Some(event) = session.next_event().await {
        if let Some(line) = describe(&event) {
            println!("{}", line);
        }
        match event {
            GenerationEvent::Complete { pages, spec, .. } => {
                write_site(&args.out, &pages, &spec)?;
                println!("Wrote {} page(s) to {}", pages.len(), args.out.display());
                return Ok(true);
            }
            GenerationEvent::Error { message, .. } => {
                eprintln!("Generation failed: {}", message);
                return Ok(false);
            }
            _ => {}
        }
    }

    Ok(false)
}

/// One progress line per event worth showing.
fn describe(event: &GenerationEvent) -> Option<String> {
    match event {
        GenerationEvent::Status { message } => Some(format!("• {}", message)),
        GenerationEvent::Spec { spec } => Some(format!(
            "  planned \"{}\": {}",
            spec.name,
            spec.page_filenames().join(", ")
        )),
        GenerationEvent::Page { filename, html } => {
            Some(format!("  wrote {} ({} bytes)", filename, html.len()))
        }
        GenerationEvent::Usage(usage) => Some(format!(
            "  tokens: {} in / {} out",
            usage.input_tokens, usage.output_tokens
        )),
        GenerationEvent::Complete {
            pages,
            usage,
            tool_metrics,
            validation_passed,
            ..
        } => Some(format!(
            "Done: {} page(s), {} tool call(s), {} tokens, validation {}",
            pages.len(),
            tool_metrics.total_calls(),
            usage.total(),
            if *validation_passed {
                "passed"
            } else {
                "not confirmed"
            }
        )),
        _ => None,
    }
}

fn load_spec(path: &Path) -> Result<SiteSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Every `*.html` file directly inside `dir`, keyed by file name.
fn load_pages(dir: &Path) -> Result<BTreeMap<String, String>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    let mut pages = BTreeMap::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let html = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        pages.insert(name.to_string(), html);
    }
    Ok(pages)
}

/// Write every page plus the plan as `site.json`.
fn write_site(out: &Path, pages: &BTreeMap<String, String>, spec: &SiteSpec) -> Result<()> {
    std::fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    for (filename, html) in pages {
        // Keys are bare names; never write outside `out`
        let Some(name) = Path::new(filename).file_name() else {
            tracing::warn!(filename, "Skipping page with unusable filename");
            continue;
        };
        let path = out.join(name);
        std::fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
    }

    let spec_path = out.join(SPEC_FILE_NAME);
    std::fs::write(&spec_path, serde_json::to_string_pretty(spec)?)
        .with_context(|| format!("failed to write {}", spec_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitesmith_core::{TokenUsage, ToolMetrics};
    use tempfile::TempDir;

    #[test]
    fn test_write_then_load_site() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("site");
        let mut pages = BTreeMap::new();
        pages.insert("index.html".to_string(), "<html>home</html>".to_string());
        pages.insert("about.html".to_string(), "<html>about</html>".to_string());

        write_site(&out, &pages, &SiteSpec::fallback()).unwrap();

        assert_eq!(load_pages(&out).unwrap(), pages);
        assert_eq!(load_spec(&out.join(SPEC_FILE_NAME)).unwrap(), SiteSpec::fallback());
    }

    #[test]
    fn test_load_pages_skips_other_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        std::fs::create_dir(dir.path().join("nested.html")).unwrap();

        let pages = load_pages(dir.path()).unwrap();
        assert_eq!(pages.keys().collect::<Vec<_>>(), vec!["index.html"]);
    }

    #[test]
    fn test_write_site_stays_inside_out_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("site");
        let mut pages = BTreeMap::new();
        pages.insert("../escape.html".to_string(), "<html></html>".to_string());

        write_site(&out, &pages, &SiteSpec::fallback()).unwrap();

        assert!(out.join("escape.html").exists());
        assert!(!dir.path().join("escape.html").exists());
    }

    #[test]
    fn test_load_spec_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_spec(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_describe_lines() {
        assert_eq!(
            describe(&GenerationEvent::status("Writing index.html")).unwrap(),
            "• Writing index.html"
        );
        assert!(describe(&GenerationEvent::Thinking {
            text: "hmm".into()
        })
        .is_none());

        let complete = GenerationEvent::Complete {
            pages: BTreeMap::new(),
            spec: SiteSpec::fallback(),
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
            tool_metrics: ToolMetrics::default(),
            validation_passed: true,
        };
        assert_eq!(
            describe(&complete).unwrap(),
            "Done: 0 page(s), 0 tool call(s), 15 tokens, validation passed"
        );
    }
}
