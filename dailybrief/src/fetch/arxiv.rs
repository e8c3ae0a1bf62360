//! arXiv fetcher backed by the public Atom export API.

use super::{build_client, status_error};
use crate::capability::{ContentFetcher, FetchedItem};
use crate::errors::CapabilityError;
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;

const EXPORT_URL: &str = "https://export.arxiv.org/api/query";

/// Fetches recent arXiv papers matching a query.
#[derive(Debug)]
pub struct ArxivFetcher {
    client: reqwest::Client,
    max_items: usize,
}

impl ArxivFetcher {
    /// Creates a fetcher returning at most `max_items` papers.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(max_items: usize) -> Result<Self, CapabilityError> {
        Ok(Self {
            client: build_client(30)?,
            max_items,
        })
    }
}

#[async_trait]
impl ContentFetcher for ArxivFetcher {
    fn source(&self) -> &str {
        "arXiv"
    }

    async fn fetch(&self, topic: &str) -> Result<Vec<FetchedItem>, CapabilityError> {
        let response = self
            .client
            .get(EXPORT_URL)
            .query(&[
                ("search_query", format!("all:{topic}").as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
                ("max_results", &self.max_items.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CapabilityError::failed(format!("arxiv request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, "arXiv"));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CapabilityError::failed(format!("arxiv response: {e}")))?;

        Ok(parse_atom_entries(&body, self.max_items))
    }
}

fn atom_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        // Hard-coded patterns; compilation cannot fail.
        match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => unreachable!("invalid atom pattern: {e}"),
        }
    })
}

/// Pulls `(title, id, summary)` out of the Atom feed.
///
/// The export API's feed is flat and regular enough that targeted regexes
/// beat pulling in a full XML parser for three fields.
fn parse_atom_entries(atom: &str, max_items: usize) -> Vec<FetchedItem> {
    static ENTRY_RE: OnceLock<Regex> = OnceLock::new();
    static TITLE_RE: OnceLock<Regex> = OnceLock::new();
    static ID_RE: OnceLock<Regex> = OnceLock::new();
    static SUMMARY_RE: OnceLock<Regex> = OnceLock::new();

    let entry_re = atom_regex(&ENTRY_RE, r"(?s)<entry>(.*?)</entry>");
    let title_re = atom_regex(&TITLE_RE, r"(?s)<title>(.*?)</title>");
    let id_re = atom_regex(&ID_RE, r"<id>(.*?)</id>");
    let summary_re = atom_regex(&SUMMARY_RE, r"(?s)<summary>(.*?)</summary>");

    let mut items = Vec::new();
    for entry in entry_re.captures_iter(atom).take(max_items) {
        let body = &entry[1];
        let Some(title) = title_re.captures(body) else {
            continue;
        };
        let Some(id) = id_re.captures(body) else {
            continue;
        };
        let summary = summary_re
            .captures(body)
            .map(|c| collapse_whitespace(&c[1]))
            .unwrap_or_default();

        items.push(FetchedItem::new(
            collapse_whitespace(&title[1]),
            id[1].trim().to_string(),
            truncate(&summary, 280),
        ));
    }
    items
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
