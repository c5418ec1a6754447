//! Regex-based rain-probability extraction from county-forecast page content.
//!
//! Three strategies run in strict order and the first hit wins: a
//! region-scoped block search over DOM elements, a windowed line search
//! around region mentions, and (exposed only to the static-fetch path) a
//! page-wide sweep that picks one candidate by a stable hash of the region
//! name.
//!
//! All entry points are **synchronous** because the `scraper` crate's types
//! are `!Send` -- parsing starts and finishes between await points, so the
//! futures of async callers stay `Send`.
//!
//! # Accuracy
//!
//! The page-wide sweep cannot prove that the percentage it picks belongs to
//! the requested region; it trades accuracy for availability on layouts
//! where no region-scoped structure survives. The pick is deterministic
//! across calls and across processes, so the same page and region always
//! yield the same value.

use regex::Regex;
use scraper::{Html, Selector};
use std::hash::{Hash, Hasher};

// ── Pattern tables ───────────────────────────────────────────────────────────

/// Patterns tried inside a region-scoped block, most specific first.
/// Capture group 1 is always the probability digits.
fn scoped_patterns() -> [Regex; 3] {
    [
        Regex::new(r"降雨機率[：:]\s*(\d+)%").expect("labelled rain regex is valid"),
        Regex::new(r"降雨機率\s*(\d+)%").expect("unlabelled rain regex is valid"),
        Regex::new(r"(\d+)%").expect("percent regex is valid"),
    ]
}

/// Patterns for the page-wide fallback sweep, most specific first.
fn global_patterns() -> [Regex; 5] {
    [
        Regex::new(r"降雨機率[：:]\s*(\d+)%").expect("labelled rain regex is valid"),
        Regex::new(r"降雨機率\s*(\d+)%").expect("unlabelled rain regex is valid"),
        Regex::new(r"雨機率[：:]\s*(\d+)%").expect("partial label regex is valid"),
        Regex::new(r"(\d+)%.*雨").expect("percent-before-rain regex is valid"),
        Regex::new(r"雨.*(\d+)%").expect("rain-before-percent regex is valid"),
    ]
}

fn percent_pattern() -> Regex {
    Regex::new(r"(\d+)%").expect("percent regex is valid")
}

// ── Public entry points ──────────────────────────────────────────────────────

/// Extract the rain probability for `region` from page content.
///
/// Runs the region-scoped block search, then the windowed line search.
/// Returns the first value found in `[0, 100]`, or `None` when neither
/// strategy matches. Pure and deterministic: no I/O, no mutation.
pub fn extract_probability(content: &str, region: &str) -> Option<u8> {
    scoped_block_search(content, region).or_else(|| windowed_line_search(content, region))
}

/// Extract the rain probability for `region`, falling back to a page-wide
/// sweep when the region-scoped strategies find nothing.
///
/// The fallback value is not guaranteed to belong to `region`; see the
/// module docs. Used by the static-fetch path only.
pub fn extract_probability_with_fallback(content: &str, region: &str) -> Option<u8> {
    extract_probability(content, region).or_else(|| global_fallback_search(content, region))
}

// ── Strategy 1: region-scoped block search ───────────────────────────────────

/// Walk every element in document order and search the ones whose collected
/// text mentions `region`.
///
/// The walk is top-down, so for a full document the `<html>` element
/// qualifies first and its text spans the whole page; scoping narrows only
/// as the walk descends. Within a block, each pattern's FIRST match is the
/// only one considered: out of range means next pattern, patterns exhausted
/// means next block.
///
/// Plain input (no angle brackets) is handled line by line instead, since a
/// DOM parse would wrap it in synthetic `<html>`/`<body>` elements and turn
/// the whole input into a single region block.
fn scoped_block_search(content: &str, region: &str) -> Option<u8> {
    let patterns = scoped_patterns();

    if looks_like_markup(content) {
        let document = Html::parse_document(content);
        let any = Selector::parse("*").expect("universal selector is valid");
        for el in document.select(&any) {
            let text = element_text(&el);
            if !text.contains(region) {
                continue;
            }
            for pattern in &patterns {
                if let Some(value) = first_capture(pattern, &text) {
                    return Some(value);
                }
            }
        }
    } else {
        for line in content.lines() {
            if !line.contains(region) {
                continue;
            }
            for pattern in &patterns {
                if let Some(value) = first_capture(pattern, line) {
                    return Some(value);
                }
            }
        }
    }

    None
}

// ── Strategy 2: windowed line search ─────────────────────────────────────────

/// Scan the lines around every mention of `region` for a percentage.
///
/// The window is `lines[i-3 ..= i+3]`, clamped to the page bounds, read top
/// to bottom. Per line only the FIRST percentage counts; out of range moves
/// on to the next line in the window, an exhausted window moves on to the
/// next mention.
fn windowed_line_search(content: &str, region: &str) -> Option<u8> {
    let percent = percent_pattern();
    let text = page_text(content);
    let lines: Vec<&str> = text.lines().collect();

    for (i, line) in lines.iter().enumerate() {
        if !line.contains(region) {
            continue;
        }
        let lo = i.saturating_sub(3);
        let hi = (i + 4).min(lines.len());
        for nearby in &lines[lo..hi] {
            if let Some(value) = first_capture(&percent, nearby) {
                return Some(value);
            }
        }
    }

    None
}

// ── Strategy 3: page-wide fallback sweep ─────────────────────────────────────

/// Collect every in-range percentage the fallback patterns find anywhere on
/// the page, then pick one by a stable hash of the region name.
///
/// Candidates are gathered pattern-major, in document order within each
/// pattern, duplicates kept. The hash pick means different regions tend to
/// land on different candidates while the same region always lands on the
/// same one.
fn global_fallback_search(content: &str, region: &str) -> Option<u8> {
    let text = page_text(content);
    let mut candidates: Vec<u8> = Vec::new();

    for pattern in &global_patterns() {
        for caps in pattern.captures_iter(&text) {
            if let Some(value) = caps.get(1).and_then(|m| parse_percent(m.as_str())) {
                candidates.push(value);
            }
        }
    }

    if candidates.is_empty() {
        return None;
    }

    let index = stable_region_index(region, candidates.len());
    tracing::debug!(
        "page-wide sweep picked candidate {index} of {} for {region}",
        candidates.len()
    );
    Some(candidates[index])
}

// ── Private helpers ──────────────────────────────────────────────────────────

/// Whether the content is worth a DOM parse. Plain text stays on the
/// line-based paths.
fn looks_like_markup(content: &str) -> bool {
    content.contains('<') && content.contains('>')
}

/// Collect the text of an element and all its descendants, concatenated
/// without a separator so runs split across inline tags stay contiguous
/// for the patterns (`75` + `%` must read as `75%`).
fn element_text(el: &scraper::ElementRef<'_>) -> String {
    el.text().collect()
}

/// Full text content of the page: the concatenation of all text nodes for
/// markup input (source line breaks survive as whitespace text nodes), the
/// input itself for plain text.
fn page_text(content: &str) -> String {
    if looks_like_markup(content) {
        Html::parse_document(content).root_element().text().collect()
    } else {
        content.to_string()
    }
}

/// First match of `pattern` in `text`, parsed and range-checked. `None`
/// covers both "no match" and "first match out of range" -- the caller
/// moves on either way.
fn first_capture(pattern: &Regex, text: &str) -> Option<u8> {
    let caps = pattern.captures(text)?;
    parse_percent(caps.get(1)?.as_str())
}

/// Parse a digit run as a probability in `[0, 100]`. Runs too long for a
/// `u32` fail the parse and count as out-of-range noise.
fn parse_percent(digits: &str) -> Option<u8> {
    digits.parse::<u32>().ok().filter(|v| *v <= 100).map(|v| v as u8)
}

/// Stable index into the fallback candidate list. FNV-1a of the region
/// name, so the pick survives process restarts.
fn stable_region_index(region: &str, len: usize) -> usize {
    let mut hasher = fnv::FnvHasher::default();
    region.hash(&mut hasher);
    (hasher.finish() % len as u64) as usize
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_block_with_labelled_value() {
        let html = r#"
        <html><body>
            <div class="county">
                <h2>臺北市</h2>
                <p>降雨機率：75%</p>
            </div>
        </body></html>
        "#;
        assert_eq!(extract_probability(html, "臺北市"), Some(75));
    }

    #[test]
    fn test_scoped_block_colon_variants() {
        let fullwidth = r#"<div>高雄市 降雨機率：40%</div>"#;
        let halfwidth = r#"<div>高雄市 降雨機率: 40%</div>"#;
        let unlabelled = r#"<div>高雄市 降雨機率 60%</div>"#;
        assert_eq!(extract_probability(fullwidth, "高雄市"), Some(40));
        assert_eq!(extract_probability(halfwidth, "高雄市"), Some(40));
        assert_eq!(extract_probability(unlabelled, "高雄市"), Some(60));
    }

    #[test]
    fn test_labelled_value_outranks_earlier_bare_percent() {
        // Humidity appears first in the document, but the labelled pattern
        // runs before the bare-percent pattern.
        let html = r#"
        <html><body>
            <p>濕度 88%</p>
            <div>臺北市 降雨機率：20%</div>
        </body></html>
        "#;
        assert_eq!(extract_probability(html, "臺北市"), Some(20));
    }

    #[test]
    fn test_enclosing_block_shadows_sibling_counties() {
        // The <html> element mentions every county, so its first labelled
        // value wins even when the query names a later sibling.
        let html = r#"
        <html><body>
            <div>臺北市 降雨機率：10%</div>
            <div>高雄市 降雨機率：90%</div>
        </body></html>
        "#;
        assert_eq!(extract_probability(html, "高雄市"), Some(10));
    }

    #[test]
    fn test_windowed_search_finds_value_below_region_line() {
        let text = "臺北市\n今天多雲\n氣溫 22 至 27 度\n30%";
        assert_eq!(extract_probability(text, "臺北市"), Some(30));
    }

    #[test]
    fn test_window_clamps_to_three_lines_each_way() {
        let below_inside = "臺北市\nx\nx\n20%";
        let below_outside = "臺北市\nx\nx\nx\n20%";
        assert_eq!(extract_probability(below_inside, "臺北市"), Some(20));
        assert_eq!(extract_probability(below_outside, "臺北市"), None);

        let above_inside = "20%\nx\nx\n臺北市";
        let above_outside = "20%\nx\nx\nx\n臺北市";
        assert_eq!(extract_probability(above_inside, "臺北市"), Some(20));
        assert_eq!(extract_probability(above_outside, "臺北市"), None);
    }

    #[test]
    fn test_plain_text_ignores_far_away_percent() {
        // The leading 50% sits four lines above the region mention, outside
        // the window, and plain input is never DOM-parsed into one big
        // block that would surface it.
        let text = "50%\n\n\n\n臺北市\n30%";
        assert_eq!(extract_probability(text, "臺北市"), Some(30));
    }

    #[test]
    fn test_only_first_percent_per_line_considered() {
        // 300 is out of range and 45 is the second match on its line, so
        // neither the block search nor the window search may return it.
        let text = "臺北市 300% 45%";
        assert_eq!(extract_probability(text, "臺北市"), None);
    }

    #[test]
    fn test_out_of_range_rejected_everywhere() {
        let text = "臺北市 濕度 150%";
        assert_eq!(extract_probability_with_fallback(text, "臺北市"), None);
    }

    #[test]
    fn test_huge_digit_runs_are_noise() {
        assert_eq!(parse_percent("99999999999999999999"), None);
        assert_eq!(parse_percent("101"), None);
        assert_eq!(parse_percent("100"), Some(100));
        assert_eq!(parse_percent("0"), Some(0));
    }

    #[test]
    fn test_no_percentages_yields_none() {
        let html = r#"
        <html><body>
            <div>臺北市 多雲時晴，氣溫穩定</div>
        </body></html>
        "#;
        assert_eq!(extract_probability_with_fallback(html, "臺北市"), None);
    }

    #[test]
    fn test_region_scoped_value_outranks_other_strategies() {
        // Each strategy would answer differently here: the region line
        // carries 75, the surrounding window would surface 70 first, and
        // the page-wide sweep collects {70, 80}. Only 75 is correct.
        let text = "70% 有雨\n臺北市 75%\n30%\nx\nx\n80% 有雨";
        assert_eq!(extract_probability_with_fallback(text, "臺北市"), Some(75));
    }

    #[test]
    fn test_fallback_pick_is_reproducible() {
        // No region mention anywhere, so only the page-wide sweep can
        // answer. The candidate set here is exactly {20, 45, 60}.
        let text = "20% 有雨\n45% 有雨\n60% 有雨";
        let first = extract_probability_with_fallback(text, "新竹市");
        assert!(matches!(first, Some(20) | Some(45) | Some(60)));
        for _ in 0..10 {
            assert_eq!(extract_probability_with_fallback(text, "新竹市"), first);
        }
    }

    #[test]
    fn test_fallback_not_reachable_from_plain_extract() {
        let text = "20% 有雨\n45% 有雨\n60% 有雨";
        assert_eq!(extract_probability(text, "新竹市"), None);
    }

    #[test]
    fn test_looks_like_markup() {
        assert!(looks_like_markup("<div>hi</div>"));
        assert!(!looks_like_markup("臺北市 30%"));
        assert!(!looks_like_markup("a < b"));
    }

    #[test]
    fn test_stable_region_index_in_bounds() {
        for len in 1..20 {
            let index = stable_region_index("臺北市", len);
            assert!(index < len);
            assert_eq!(index, stable_region_index("臺北市", len));
        }
    }

    #[test]
    fn test_text_split_across_inline_tags_stays_contiguous() {
        let html = r#"<div>臺北市 降雨機率：<span>75</span>%</div>"#;
        assert_eq!(extract_probability(html, "臺北市"), Some(75));
    }
}
