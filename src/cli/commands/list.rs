use crate::cli::OutputFormat;
use crate::config::{ConfigStore, Document};
use crate::error::Result;
use serde::Serialize;

/// Profile as printed by `list`; the client secret is left out
#[derive(Debug, Serialize, PartialEq)]
struct PlatformSummary<'a> {
    name: &'a str,
    client_id: &'a str,
    oauth_url: &'a str,
    base_url: &'a str,
    audience: &'a str,
}

fn summaries(document: &Document) -> Vec<PlatformSummary<'_>> {
    document
        .iter()
        .map(|p| PlatformSummary {
            name: &p.name,
            client_id: &p.client_id,
            oauth_url: &p.oauth_url,
            base_url: &p.base_url,
            audience: &p.audience,
        })
        .collect()
}

fn format_document(document: &Document, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&summaries(document))?);
    }

    if document.is_empty() {
        return Ok("No platforms configured.".to_string());
    }

    let mut out = String::from("Configured platforms:\n");
    for summary in summaries(document) {
        out.push_str(&format!(
            "\n  {}\n    OAuth URL: {}\n    Base URL:  {}\n    Audience:  {}\n",
            summary.name, summary.oauth_url, summary.base_url, summary.audience
        ));
    }
    Ok(out)
}

pub fn execute(store: &ConfigStore, format: OutputFormat) -> Result<()> {
    let document = store.load()?;
    tracing::debug!(
        "Listing {} platform(s) from {}",
        document.len(),
        store.path().display()
    );
    println!("{}", format_document(&document, format)?);
    Ok(())
}
