//! Search query construction for the Google News RSS endpoint.
//!
//! The feed understands a small search syntax: double quotes mark an exact
//! phrase, a leading `-` excludes a term, and `site:` restricts results to one
//! domain. [`build_query`] assembles those pieces from the raw form inputs.

/// Compose the final search query.
///
/// * `base` - free text used verbatim after trimming (may already contain
///   `OR`, quotes, parentheses)
/// * `must` - comma-separated required terms
/// * `exclude` - comma-separated excluded terms, each emitted as `-term`
/// * `site` - a single domain; scheme and leading `www.` are stripped
///
/// Empty inputs are omitted, so the result never carries stray separators.
///
/// # Examples
///
/// ```
/// use news_pulse::query::build_query;
///
/// assert_eq!(
///     build_query("AI Piauí", "governo", "esporte", "www.example.com"),
///     "AI Piauí governo -esporte site:example.com"
/// );
/// ```
pub fn build_query(base: &str, must: &str, exclude: &str, site: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    let base = base.trim();
    if !base.is_empty() {
        parts.push(base.to_string());
    }

    parts.extend(split_terms(must));
    parts.extend(split_terms(exclude).into_iter().map(|t| format!("-{t}")));

    let site = strip_site(site);
    if !site.is_empty() {
        parts.push(format!("site:{site}"));
    }

    parts.join(" ").trim().to_string()
}

/// Split a comma-separated list into trimmed terms, phrase-quoting any term
/// that contains whitespace.
fn split_terms(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            if t.contains(char::is_whitespace) {
                format!("\"{t}\"")
            } else {
                t.to_string()
            }
        })
        .collect()
}

fn strip_site(site: &str) -> &str {
    let site = site.trim();
    let site = site
        .strip_prefix("https://")
        .or_else(|| site.strip_prefix("http://"))
        .unwrap_or(site);
    let site = site.strip_prefix("www.").unwrap_or(site);
    site.trim_end_matches('/').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_all_parts() {
        assert_eq!(
            build_query("AI Piauí", "governo", "esporte", "www.example.com"),
            "AI Piauí governo -esporte site:example.com"
        );
    }

    #[test]
    fn test_build_query_quotes_phrases() {
        assert_eq!(build_query("", "machine learning", "", ""), "\"machine learning\"");
        assert_eq!(
            build_query("ia", "", "futebol de praia", ""),
            "ia -\"futebol de praia\""
        );
    }

    #[test]
    fn test_build_query_keeps_list_order_and_skips_blanks() {
        assert_eq!(
            build_query("  base  ", " a , ,b,, c d ", "x,,y", ""),
            "base a b \"c d\" -x -y"
        );
    }

    #[test]
    fn test_build_query_empty_inputs() {
        assert_eq!(build_query("", "", "", ""), "");
        assert_eq!(build_query("   ", " , ", ",", "https://www."), "");
    }

    #[test]
    fn test_build_query_strips_site_scheme() {
        assert_eq!(build_query("", "", "", "https://www.meionorte.com/"), "site:meionorte.com");
        assert_eq!(build_query("", "", "", "http://g1.globo.com"), "site:g1.globo.com");
    }

    #[test]
    fn test_build_query_base_verbatim() {
        let base = r#"("Inteligência Artificial" Piauí) OR ("SIA Piauí")"#;
        assert_eq!(build_query(base, "", "", ""), base);
    }
}
