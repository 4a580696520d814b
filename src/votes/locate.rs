//! Find the latest Votes & Proceedings PDF on a records index page.
//!
//! The index is consumed as raw HTML and scanned with a regex; no DOM is
//! built. Filenames follow `YYYYMMDD_HHMM_NN_vp.pdf`, and the embedded date
//! decides which link is the most recent.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use tracing::debug;

static RE_PDF_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["']([^"'<>]+?\.pdf)["']"#).expect("href pattern compiles")
});

static RE_VP_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{8})_\d{4}_\d{2}_vp\.pdf$").expect("vp filename pattern compiles")
});

/// Where to look and what counts as an official record.
#[derive(Debug, Clone)]
pub struct LocatorRules<'a> {
    /// `https://host` prefix for root-relative and relative links.
    pub host: &'a str,
    /// Host fragment required on every candidate.
    pub domain: &'a str,
    /// Path fragment marking a Votes & Proceedings document.
    pub vp_marker: &'a str,
}

/// Every `href` ending in `.pdf`, in page order, absolutised.
///
/// Links that do not resolve to a valid URL are skipped.
pub fn pdf_links(html: &str, host: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in RE_PDF_HREF.captures_iter(html) {
        let Some(url) = absolutize(&caps[1], host) else {
            debug!("Skipping unresolvable link {:?}", &caps[1]);
            continue;
        };
        if !seen.contains(&url) {
            seen.push(url);
        }
    }
    seen
}

/// Resolve an `href` value against `host`.
///
/// `&amp;` is un-escaped and backslashes become forward slashes before
/// resolution. Protocol-relative links are forced to https.
pub fn absolutize(href: &str, host: &str) -> Option<String> {
    let href = href.trim().replace("&amp;", "&").replace('\\', "/");
    let base = Url::parse(&format!("{}/", host.trim_end_matches('/'))).ok()?;
    let mut url = base.join(&href).ok()?;

    if href.starts_with("//") && url.scheme() != "https" {
        url.set_scheme("https").ok()?;
    }
    Some(url.into())
}

/// Host and path checks for an official Votes & Proceedings document.
///
/// The host is taken from the parsed URL, so userinfo such as
/// `https://records.domain@elsewhere/` does not count as the records domain.
pub fn is_vp_document(url: &str, rules: &LocatorRules<'_>) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let path = parsed.path().to_lowercase();

    let host_ok = host.to_lowercase().contains(&rules.domain.to_lowercase());
    let marker = rules.vp_marker.to_lowercase();
    let path_ok = (!marker.is_empty() && path.contains(&marker)) || path.ends_with("_vp.pdf");
    host_ok && path_ok
}

/// `YYYYMMDD` from a `..._vp.pdf` filename, as a sortable integer.
pub fn vp_date_key(url: &str) -> Option<u32> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    RE_VP_DATE
        .captures(path)
        .and_then(|caps| caps[1].parse::<u32>().ok())
}

/// Most recent Votes & Proceedings PDF linked from `html`, if any.
///
/// Links with a parseable filename date win by date (latest first, page
/// order breaking ties). With no parseable dates the first qualifying link
/// is returned. `None` means "no data available", not an error.
pub fn latest_vp_pdf(html: &str, rules: &LocatorRules<'_>) -> Option<String> {
    let candidates: Vec<String> = pdf_links(html, rules.host)
        .into_iter()
        .filter(|url| is_vp_document(url, rules))
        .collect();
    debug!("{} Votes & Proceedings candidates on index page", candidates.len());

    let mut dated: Vec<(u32, usize)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, url)| vp_date_key(url).map(|d| (d, i)))
        .collect();
    // stable sort keeps page order among equal dates
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    match dated.first() {
        Some(&(_, idx)) => candidates.get(idx).cloned(),
        None => candidates.into_iter().next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://www.assembly.ab.ca";

    fn rules() -> LocatorRules<'static> {
        LocatorRules {
            host: HOST,
            domain: "assembly.ab.ca",
            vp_marker: "/vp/",
        }
    }

    #[test]
    fn later_date_wins_regardless_of_order() {
        let html = r#"
            <a href="https://docs.assembly.ab.ca/LADDAR_files/docs/houserecords/vp/legislature_31/session_1/20240301_9999_01_vp.pdf">March</a>
            <a href="https://docs.assembly.ab.ca/LADDAR_files/docs/houserecords/vp/legislature_31/session_1/20240501_1234_01_vp.pdf">May</a>
        "#;
        let url = latest_vp_pdf(html, &rules()).unwrap();
        assert!(url.ends_with("20240501_1234_01_vp.pdf"), "got {url}");
    }

    #[test]
    fn none_without_pdf_links() {
        let html = r#"<a href="/page.html">x</a><a href="https://docs.assembly.ab.ca/vp/notes.docx">y</a>"#;
        assert_eq!(latest_vp_pdf(html, &rules()), None);
    }

    #[test]
    fn none_when_links_lack_markers() {
        let html = r#"
            <a href="https://example.com/vp/20240501_1234_01_vp.pdf">wrong host</a>
            <a href="https://docs.assembly.ab.ca/hansard/20240501_1330_01_han.pdf">wrong path</a>
        "#;
        assert_eq!(latest_vp_pdf(html, &rules()), None);
    }

    #[test]
    fn undated_falls_back_to_first_candidate() {
        let html = r#"
            <a href='/docs/vp/sitting-a.pdf'>A</a>
            <a href='/docs/vp/sitting-b.pdf'>B</a>
        "#;
        assert_eq!(
            latest_vp_pdf(html, &rules()).as_deref(),
            Some("https://www.assembly.ab.ca/docs/vp/sitting-a.pdf")
        );
    }

    #[test]
    fn absolutize_variants() {
        let abs = |href| absolutize(href, HOST);
        assert_eq!(abs("//docs.x.ca/a.pdf").as_deref(), Some("https://docs.x.ca/a.pdf"));
        assert_eq!(abs("/a.pdf").as_deref(), Some("https://www.assembly.ab.ca/a.pdf"));
        assert_eq!(abs("docs/a.pdf").as_deref(), Some("https://www.assembly.ab.ca/docs/a.pdf"));
        assert_eq!(
            abs(r"docs\vp\a.pdf?x=1&amp;y=2").as_deref(),
            Some("https://www.assembly.ab.ca/docs/vp/a.pdf?x=1&y=2")
        );
        assert_eq!(abs("http://plain.ca/a.pdf").as_deref(), Some("http://plain.ca/a.pdf"));
        assert_eq!(
            absolutize("//docs.x.ca/a.pdf", "http://www.assembly.ab.ca").as_deref(),
            Some("https://docs.x.ca/a.pdf")
        );
        assert_eq!(abs("http://[bad/a.pdf"), None);
    }

    #[test]
    fn userinfo_does_not_pass_as_records_host() {
        let spoof = "https://docs.assembly.ab.ca@evil.example/vp/20991231_0000_01_vp.pdf";
        assert!(!is_vp_document(spoof, &rules()));

        let html = format!(
            r#"<a href="https://docs.assembly.ab.ca/vp/20240501_1330_01_vp.pdf">May</a>
               <a href="{spoof}">Later</a>"#
        );
        assert_eq!(
            latest_vp_pdf(&html, &rules()).as_deref(),
            Some("https://docs.assembly.ab.ca/vp/20240501_1330_01_vp.pdf")
        );
    }

    #[test]
    fn date_key_from_filename() {
        assert_eq!(
            vp_date_key("https://docs.assembly.ab.ca/vp/20241031_1330_01_vp.pdf"),
            Some(20241031)
        );
        assert_eq!(vp_date_key("https://docs.assembly.ab.ca/vp/today.pdf"), None);
    }

    #[test]
    fn duplicate_links_collapse() {
        let html = r#"<a href="/vp/20240101_1330_01_vp.pdf">a</a><a href="/vp/20240101_1330_01_vp.pdf">b</a>"#;
        assert_eq!(pdf_links(html, HOST).len(), 1);
    }
}
