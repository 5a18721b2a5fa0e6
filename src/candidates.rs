//! Parsing of recommended service candidates.
//!
//! The recommendation prompt asks for a numbered list, one service per
//! line, each with a fit score between 0 and 100. Models mostly comply,
//! and the parser absorbs the ways they don't: mixed bracket widths,
//! missing scores, duplicated names, prose instead of a list. The
//! result always has exactly [`CANDIDATE_COUNT`] entries.

use lazy_static::lazy_static;
use regex::Regex;

/// How many candidates a recommendation round produces.
pub(crate) const CANDIDATE_COUNT: usize = 8;

/// Score assigned to a named candidate that arrived without one.
const DEFAULT_SCORE: u8 = 70;

/// Score assigned to padding rows.
const PLACEHOLDER_SCORE: u8 = 50;

lazy_static! {
    // A numbered line with an optional trailing fit annotation, e.g.
    // "1. DCS更新・遠隔監視ソリューション（適合度: 92）". Half- and
    // full-width separators, colons, and brackets all occur.
    static ref SCORE_RE: Regex =
        Regex::new(r"^[1-8][\.．)\s]+(.+?)(?:\s*[（(]適合度\s*[：:]\s*([0-9]{1,3})[%）)%]?)?\s*$")
            .unwrap();

    // A bare fit annotation at the end of a line fragment.
    static ref TRAIL_RE: Regex =
        Regex::new(r"^(.+?)\s*[（(]適合度\s*[：:]\s*([0-9]{1,3})[%）)%]?\s*$").unwrap();

    // The numbered prefix alone.
    static ref INDEX_RE: Regex = Regex::new(r"^[1-8][\.．)\s]+(.+)$").unwrap();
}

/// A recommended service and its fit against the customer context.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub(crate) struct ServiceCandidate {
    pub name: String,
    /// Fit score, always within 0..=100.
    pub score: u8,
}

// The pattern admits up to three digits, so a score as written can
// reach 999. Clamp into range rather than reject the line.
fn clamp_score(digits: &str) -> u8 {
    let score: u32 = digits.parse().unwrap_or(0);

    score.min(100) as u8
}

fn push_unique(parsed: &mut Vec<ServiceCandidate>, name: String, score: u8) {
    if name.is_empty() || parsed.iter().any(|c| c.name == name) {
        return;
    }

    parsed.push(ServiceCandidate { name, score });
}

/// Extracts exactly [`CANDIDATE_COUNT`] candidates from a model
/// response. Lines that cannot be parsed are dropped, duplicates keep
/// their first occurrence, and the list is padded with numbered
/// placeholder rows. Never fails, whatever the input.
pub(crate) fn parse_candidates(raw: &str) -> Vec<ServiceCandidate> {
    let mut parsed: Vec<ServiceCandidate> = Vec::new();

    let lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

    for line in lines {
        if let Some(caps) = SCORE_RE.captures(line) {
            let mut name = caps[1].trim().to_string();
            let mut score = match caps.get(2) {
                Some(digits) => clamp_score(digits.as_str()),
                None => DEFAULT_SCORE,
            };

            // The lazy name capture can still be left holding an inner
            // annotation when a line carries more than one. Re-match
            // and prefer the inner pair.
            let trailed = TRAIL_RE
                .captures(&name)
                .map(|trail| (trail[1].trim().to_string(), clamp_score(&trail[2])));

            if let Some((trail_name, trail_score)) = trailed {
                name = trail_name;
                score = trail_score;
            }

            push_unique(&mut parsed, name, score);
        } else if let Some(caps) = INDEX_RE.captures(line) {
            let rest = caps[1].trim();

            match TRAIL_RE.captures(rest) {
                Some(trail) => {
                    let name = trail[1].trim().to_string();
                    let score = clamp_score(&trail[2]);

                    push_unique(&mut parsed, name, score);
                }
                None => {
                    push_unique(&mut parsed, rest.to_string(), DEFAULT_SCORE);
                }
            }
        }
    }

    while parsed.len() < CANDIDATE_COUNT {
        parsed.push(ServiceCandidate {
            name: format!("候補{}", parsed.len() + 1),
            score: PLACEHOLDER_SCORE,
        });
    }

    parsed.truncate(CANDIDATE_COUNT);

    parsed
}
