//! Division parsing: who voted which way, on what, and did it carry.
//!
//! A division in the record reads
//!
//! ```text
//! ... Bill 20 Municipal Affairs Statutes Amendment Act ... the motion was
//! agreed to ... For the motion: Amery Boitchenko Smith ... Against the
//! motion: Eggen Ganley ...
//! ```
//!
//! Blocks run from one `For the motion` marker to the next (or to the end
//! of the document). Inside a block the member is looked up by surname in
//! the "for" and "against" segments independently.
//!
//! The title, date and carried/defeated heuristics are separate pure
//! functions returning `Option`: each is a positional guess about a layout
//! the source does not guarantee.
//!
//! Without a riding, any occurrence of the bare surname counts. Members who
//! share a surname are therefore indistinguishable unless the caller passes
//! the riding, which the record prints as `Surname (Riding)`.

use crate::output::{Vote, VoteRecord};
use crate::text::{chars_after, chars_before, floor_boundary, norm};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// How far before a division the title search reaches.
pub const TITLE_LOOKBACK_CHARS: usize = 900;
/// Prefix of the document searched for the sitting date.
pub const DATE_SCAN_CHARS: usize = 2500;
/// Half-width of the window searched for carried/defeated cues.
pub const OUTCOME_WINDOW_CHARS: usize = 600;
/// Title used when no header is found.
pub const DEFAULT_TITLE: &str = "Vote";

// Markers are literal and capitalised; "voted for the motion" in running
// text does not open a block.
static RE_FOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"For the motion\s*:?").expect("for-marker pattern compiles"));

static RE_AGAINST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Against the motion\s*:?").expect("against-marker pattern compiles")
});

// Headers are matched case-sensitively: "motion" in lower case is running
// text ("Against the motion"), "Motion" starts a header.
static RE_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Bill\s+(?:[A-Z]-?\d+|\d+)|Opposition\s+Motion|Government\s+Motion|Second\s+Reading|Third\s+Reading|Motion)\b[^.:;—]{0,80}",
    )
    .expect("title pattern compiles")
});

static RE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday),?\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\b",
    )
    .expect("date pattern compiles")
});

/// One `For the motion ... Against the motion ...` span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionBlock<'a> {
    /// Byte offset of the `For the motion` marker in the source text.
    pub start: usize,
    pub for_segment: &'a str,
    pub against_segment: &'a str,
}

/// Split `text` into division blocks, in document order.
///
/// A block without an `Against the motion` marker has an empty against
/// segment.
pub fn divisions(text: &str) -> Vec<DivisionBlock<'_>> {
    let starts: Vec<(usize, usize)> = RE_FOR.find_iter(text).map(|m| (m.start(), m.end())).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &(start, body_start))| {
            let end = starts.get(i + 1).map(|&(s, _)| s).unwrap_or(text.len());
            let body = &text[body_start..end];
            match RE_AGAINST.find(body) {
                Some(m) => DivisionBlock {
                    start,
                    for_segment: &body[..m.start()],
                    against_segment: &body[m.end()..],
                },
                None => DivisionBlock {
                    start,
                    for_segment: body,
                    against_segment: "",
                },
            }
        })
        .collect()
}

/// Last whitespace-delimited token of a name, stripped of punctuation.
pub fn surname(full_name: &str) -> Option<String> {
    let last = full_name.split_whitespace().last()?;
    let trimmed = last.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Surname (and optionally riding) matcher for a single member.
#[derive(Debug, Clone)]
pub struct MemberMatcher {
    surname: String,
    pattern: Regex,
}

impl MemberMatcher {
    /// `None` when the name has no usable surname.
    pub fn new(full_name: &str, riding: Option<&str>) -> Option<Self> {
        let surname = surname(full_name)?;
        let escaped = regex::escape(&surname);

        let riding_words: Vec<String> = riding
            .map(|r| {
                r.split(|c: char| c.is_whitespace() || matches!(c, '-' | '–' | '—'))
                    .filter(|w| !w.is_empty())
                    .map(regex::escape)
                    .collect()
            })
            .unwrap_or_default();

        let source = if riding_words.is_empty() {
            format!(r"(?i)\b{escaped}\b")
        } else {
            format!(
                r"(?i)\b{escaped}\b\s*\([^)]*?{}[^)]*\)",
                riding_words.join(r"[\s\-–—]+")
            )
        };

        let pattern = Regex::new(&source).ok()?;
        Some(Self { surname, pattern })
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn is_match(&self, segment: &str) -> bool {
        self.pattern.is_match(segment)
    }
}

/// Yes for a for-only match, No for against-only, otherwise Unknown.
pub fn classify(block: &DivisionBlock<'_>, member: &MemberMatcher) -> Vote {
    match (
        member.is_match(block.for_segment),
        member.is_match(block.against_segment),
    ) {
        (true, false) => Vote::Yes,
        (false, true) => Vote::No,
        _ => Vote::Unknown,
    }
}

/// First bill/motion header in the `TITLE_LOOKBACK_CHARS` before `pos`.
pub fn title_before(text: &str, pos: usize) -> Option<String> {
    let end = floor_boundary(text, pos);
    let start = chars_before(text, end, TITLE_LOOKBACK_CHARS);
    let window = &text[start..end];

    RE_TITLE.find(window).and_then(|m| {
        let title = norm(m.as_str().trim_end_matches(|c: char| c == ',' || c.is_whitespace()));
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    })
}

/// Weekday-plus-date from the first `DATE_SCAN_CHARS` of the document.
pub fn sitting_date(text: &str) -> Option<String> {
    let head = &text[..chars_after(text, 0, DATE_SCAN_CHARS)];
    RE_DATE.find(head).map(|m| norm(m.as_str()))
}

/// Carried/defeated cue within `OUTCOME_WINDOW_CHARS` either side of `pos`.
///
/// Negative cues are checked first since "not agreed" contains "agreed".
pub fn passed_near(text: &str, pos: usize) -> Option<bool> {
    let start = chars_before(text, pos, OUTCOME_WINDOW_CHARS);
    let end = chars_after(text, pos, OUTCOME_WINDOW_CHARS);
    let window = text[start..end].to_lowercase();

    if ["not agreed", "defeated", "negatived"]
        .iter()
        .any(|cue| window.contains(cue))
    {
        Some(false)
    } else if ["agreed", "carried"].iter().any(|cue| window.contains(cue)) {
        Some(true)
    } else {
        None
    }
}

/// Parse result with the block count kept for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ParsedVotes {
    pub divisions_found: usize,
    pub records: Vec<VoteRecord>,
}

/// Every division in `text` where the member's vote is known.
///
/// Records come back in document order; `Unknown` outcomes are dropped.
pub fn parse_votes(
    text: &str,
    full_name: &str,
    riding: Option<&str>,
    official_url: &str,
) -> ParsedVotes {
    let text = norm(text);
    let blocks = divisions(&text);
    let divisions_found = blocks.len();

    let Some(member) = MemberMatcher::new(full_name, riding) else {
        return ParsedVotes {
            divisions_found,
            records: Vec::new(),
        };
    };

    let date = sitting_date(&text);
    let records: Vec<VoteRecord> = blocks
        .iter()
        .filter_map(|block| {
            let vote = classify(block, &member);
            if vote == Vote::Unknown {
                return None;
            }
            Some(VoteRecord {
                title: title_before(&text, block.start).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                date: date.clone(),
                vote,
                passed: passed_near(&text, block.start),
                official_url: official_url.to_string(),
            })
        })
        .collect();

    debug!(
        "{} divisions, {} with a known vote for '{}'",
        divisions_found,
        records.len(),
        member.surname()
    );

    ParsedVotes {
        divisions_found,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://docs.assembly.ab.ca/vp/20240501_1330_01_vp.pdf";

    fn votes_for(text: &str, name: &str, riding: Option<&str>) -> Vec<Vote> {
        parse_votes(text, name, riding, URL)
            .records
            .into_iter()
            .map(|r| r.vote)
            .collect()
    }

    #[test]
    fn for_against_and_absent() {
        let text = "For the motion: Smith, Lee Against the motion: Jones";
        assert_eq!(votes_for(text, "Smith", None), vec![Vote::Yes]);
        assert_eq!(votes_for(text, "Jones", None), vec![Vote::No]);
        assert!(votes_for(text, "Taylor", None).is_empty());
    }

    #[test]
    fn riding_disambiguates_shared_surname() {
        let text =
            "For the motion: Smith (Calgary-Centre) Against the motion: Smith (Edmonton-West)";
        assert_eq!(votes_for(text, "Smith", Some("Calgary-Centre")), vec![Vote::Yes]);
        assert_eq!(votes_for(text, "Smith", Some("Edmonton-West")), vec![Vote::No]);
        // without a riding the member matches both lists and is dropped
        assert!(votes_for(text, "Smith", None).is_empty());
    }

    #[test]
    fn riding_tolerates_spacing_and_dashes() {
        let text = "For the motion: Smith (Calgary – Centre) Against the motion: Brown";
        assert_eq!(votes_for(text, "Jo Smith", Some("Calgary-Centre")), vec![Vote::Yes]);
    }

    #[test]
    fn full_name_uses_last_token() {
        let text = "For the motion: Amery Nixon Against the motion: Notley";
        assert_eq!(votes_for(text, "Rachel  Notley", None), vec![Vote::No]);
        assert_eq!(votes_for(text, "Hon. Mickey Amery,", None), vec![Vote::Yes]);
    }

    #[test]
    fn surname_is_word_bounded() {
        let text = "For the motion: Smithers Against the motion: Jones";
        assert!(votes_for(text, "Smith", None).is_empty());
    }

    #[test]
    fn no_divisions_is_empty_not_error() {
        let parsed = parse_votes("Prayers. Introduction of Bills.", "Smith", None, URL);
        assert_eq!(parsed.divisions_found, 0);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn empty_segments_are_scanned() {
        let text = "For the motion: Against the motion: Jones";
        assert_eq!(votes_for(text, "Jones", None), vec![Vote::No]);
        let text = "For the motion: Jones Against the motion:";
        assert_eq!(votes_for(text, "Jones", None), vec![Vote::Yes]);
    }

    #[test]
    fn blocks_split_at_next_marker() {
        let text = "Bill 1 First Act For the motion: Smith Against the motion: Jones \
                    Bill 2 Second Act For the motion: Jones Against the motion: Smith";
        let blocks = divisions(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].against_segment.trim(), "Jones Bill 2 Second Act");
        assert_eq!(votes_for(text, "Smith", None), vec![Vote::Yes, Vote::No]);
    }

    #[test]
    fn missing_against_marker_leaves_empty_segment() {
        let blocks = divisions("For the motion: Smith Lee");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].for_segment.trim(), "Smith Lee");
        assert_eq!(blocks[0].against_segment, "");
    }

    #[test]
    fn title_found_before_division() {
        let text = "Government Bills and Orders Bill 20 Municipal Affairs Statutes Amendment Act, 2024 — Mr. McIver. \
                    The question being put, the motion was agreed to. For the motion: Smith";
        let pos = text.find("For the motion").unwrap();
        assert_eq!(
            title_before(text, pos).as_deref(),
            Some("Bill 20 Municipal Affairs Statutes Amendment Act, 2024")
        );
    }

    #[test]
    fn title_ignores_lowercase_motion_text() {
        let text = "the motion was agreed to. For the motion: Smith";
        let pos = text.find("For the motion").unwrap();
        assert_eq!(title_before(text, pos), None);
        let parsed = parse_votes(text, "Smith", None, URL);
        assert_eq!(parsed.records[0].title, DEFAULT_TITLE);
    }

    #[test]
    fn title_outside_lookback_is_ignored() {
        let filler = "x ".repeat(TITLE_LOOKBACK_CHARS);
        let text = format!("Bill 7 Old Act. {filler}For the motion: Smith");
        let pos = text.find("For the motion").unwrap();
        assert_eq!(title_before(&text, pos), None);
    }

    #[test]
    fn opposition_motion_and_lettered_bills() {
        let t = "Opposition Motion 501 on housing; For the motion:";
        assert_eq!(
            title_before(t, t.len()).as_deref(),
            Some("Opposition Motion 501 on housing")
        );
        let t = "Bill C-21 Firearms Act: For the motion:";
        assert_eq!(title_before(t, t.len()).as_deref(), Some("Bill C-21 Firearms Act"));
    }

    #[test]
    fn date_only_near_document_start() {
        let text = "Legislative Assembly of Alberta Votes and Proceedings Wednesday, May 1, 2024 Prayers";
        assert_eq!(sitting_date(text).as_deref(), Some("Wednesday, May 1, 2024"));

        let late = format!("{}Wednesday, May 1, 2024", "y".repeat(DATE_SCAN_CHARS));
        assert_eq!(sitting_date(&late), None);
    }

    #[test]
    fn date_is_shared_by_every_record() {
        let text = "Thursday, October 31, 2024 Motion A For the motion: Smith Against the motion: \
                    Motion B For the motion: Smith Against the motion:";
        let parsed = parse_votes(text, "Smith", None, URL);
        assert_eq!(parsed.records.len(), 2);
        for r in &parsed.records {
            assert_eq!(r.date.as_deref(), Some("Thursday, October 31, 2024"));
            assert_eq!(r.official_url, URL);
        }
    }

    #[test]
    fn outcome_cues() {
        let carried = "the motion was agreed to. For the motion: Smith";
        assert_eq!(passed_near(carried, carried.find("For").unwrap()), Some(true));

        let lost = "the motion was defeated. For the motion: Smith";
        assert_eq!(passed_near(lost, lost.find("For").unwrap()), Some(false));

        let not_agreed = "the amendment was not agreed to. For the motion: Smith";
        assert_eq!(passed_near(not_agreed, not_agreed.find("For").unwrap()), Some(false));

        let silent = "names being called for were taken. For the motion: Smith";
        assert_eq!(passed_near(silent, silent.find("For").unwrap()), None);
    }

    #[test]
    fn outcome_window_is_bounded() {
        let text = format!("carried {} For the motion: Smith", "z".repeat(OUTCOME_WINDOW_CHARS + 10));
        assert_eq!(passed_near(&text, text.find("For").unwrap()), None);
    }

    #[test]
    fn windows_are_measured_in_characters() {
        let quotes = "\u{2019}".repeat(400);
        let text = format!("Bill 7 Old Act. {quotes}For the motion: Smith");
        let pos = text.find("For the motion").unwrap();
        assert_eq!(title_before(&text, pos).as_deref(), Some("Bill 7 Old Act"));

        let accents = "\u{00e9}".repeat(2000);
        let text = format!("{accents} Wednesday, May 1, 2024");
        assert_eq!(sitting_date(&text).as_deref(), Some("Wednesday, May 1, 2024"));

        let dashes = "\u{2014}".repeat(300);
        let text = format!("carried {dashes}For the motion: Smith");
        assert_eq!(passed_near(&text, text.find("For").unwrap()), Some(true));
    }

    #[test]
    fn lowercase_prose_does_not_open_a_division() {
        let text = "Members who voted for the motion in principle rose. \
                    For the motion: Smith Against the motion: Jones";
        let parsed = parse_votes(text, "Smith", None, URL);
        assert_eq!(parsed.divisions_found, 1);
        assert_eq!(votes_for(text, "Jones", None), vec![Vote::No]);
    }

    #[test]
    fn irregular_whitespace_is_normalised() {
        let text = "For  the\nmotion:\n Smith\tLee\n\nAgainst the   motion: Jones";
        assert_eq!(votes_for(text, "Jones", None), vec![Vote::No]);
    }

    #[test]
    fn unusable_name_yields_nothing() {
        let parsed = parse_votes("For the motion: Smith", "...", None, URL);
        assert_eq!(parsed.divisions_found, 1);
        assert!(parsed.records.is_empty());
    }
}
