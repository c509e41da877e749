//! URL-to-filename sanitization — functional core.
//!
//! This module has zero infrastructure dependencies: strings in, strings out.
//! The same transform handles page URLs ("what was captured") and manual
//! folder names typed into the control panel.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Separators the sanitizer folds into `.`.
const SUBSTITUTED: &[char] = &['/', '\\', '=', '&', '-', '_'];

/// Characters the target filesystems reject in file names.
/// Non-URL input may contain anything; these get folded into `.` as well.
const RESERVED: &[char] = &[':', '*', '?', '"', '<', '>', '|', '\0'];

static DOT_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());

/// Maps an arbitrary URL or free-text label to a filesystem-safe token.
///
/// URLs become `Host.path.query` with the `www.` prefix stripped and the
/// host's first letter uppercased; everything else gets the raw character
/// substitution. Never fails — degenerate input yields a degenerate (possibly
/// empty) token, which callers are expected to accept or default.
///
/// The output never contains a `..` run and never starts or ends with `.`,
/// which also makes the transform idempotent.
pub fn sanitize(input: &str) -> String {
    match Url::parse(input) {
        Ok(url) if url.has_host() => sanitize_url(&url),
        _ => collapse(&substitute(input)),
    }
}

fn sanitize_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let domain = capitalize(host);
    let path = substitute(url.path());
    let query = substitute(url.query().unwrap_or(""));
    collapse(&format!("{domain}.{path}.{query}"))
}

/// Uppercases the first letter, leaving the rest as parsed (hosts are
/// already lowercase).
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn substitute(s: &str) -> String {
    s.chars()
        .map(|c| {
            if SUBSTITUTED.contains(&c) || RESERVED.contains(&c) || c.is_whitespace() {
                '.'
            } else {
                c
            }
        })
        .collect()
}

fn collapse(s: &str) -> String {
    DOT_RUNS.replace_all(s, ".").trim_matches('.').to_string()
}
