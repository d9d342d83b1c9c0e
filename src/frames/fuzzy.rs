//! Approximate string scoring on a 0-100 scale.
//!
//! Scores are built from an indel (insert/delete only) similarity: twice the
//! longest common subsequence over the combined length. [weighted_ratio] mixes
//! plain, partial (best window), token-sort and token-set comparisons, scaling
//! down the looser ones so an exact match is the only way to reach 100.

use std::collections::BTreeSet;

pub type Score = u8;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.90;
const LONG_PARTIAL_SCALE: f64 = 0.60;

/// Lowercase, turn everything but letters/digits/underscore into spaces, trim.
pub fn full_process(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            out.extend(ch.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

fn similarity(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    (2 * lcs_len(a, b)) as f64 / (a.len() + b.len()) as f64
}

fn to_score(value: f64) -> Score {
    (value * 100.0).round().clamp(0.0, 100.0) as Score
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// Whole-string similarity. Empty input on either side scores 0.
pub fn ratio(a: &str, b: &str) -> Score {
    to_score(similarity(&chars(a), &chars(b)))
}

/// Best similarity of the shorter string against every equally long window of the longer one.
pub fn partial_ratio(a: &str, b: &str) -> Score {
    let (a, b) = (chars(a), chars(b));
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        let sim = similarity(&short, window);
        if sim > 0.995 {
            return 100;
        }
        best = best.max(sim);
    }
    to_score(best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

pub fn token_sort_ratio(a: &str, b: &str, partial: bool) -> Score {
    let (a, b) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&a, &b)
    } else {
        ratio(&a, &b)
    }
}

/// Compares the shared tokens against each side's leftovers, so word order and
/// extra words on one side cost little.
pub fn token_set_ratio(a: &str, b: &str, partial: bool) -> Score {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();
    if left.is_empty() || right.is_empty() {
        return 0;
    }

    let join = |set: Vec<&str>| set.join(" ");
    let sect = join(left.intersection(&right).copied().collect());
    let diff_lr = join(left.difference(&right).copied().collect());
    let diff_rl = join(right.difference(&left).copied().collect());

    let combined_lr = format!("{sect} {diff_lr}").trim().to_string();
    let combined_rl = format!("{sect} {diff_rl}").trim().to_string();

    let score = |x: &str, y: &str| if partial { partial_ratio(x, y) } else { ratio(x, y) };
    score(&sect, &combined_lr)
        .max(score(&sect, &combined_rl))
        .max(score(&combined_lr, &combined_rl))
}

fn ascii_only(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}

/// Weighted best-of score used by every match stage. Non-ASCII characters are
/// dropped before processing, so accented input only scores on its ASCII part.
pub fn weighted_ratio(a: &str, b: &str) -> Score {
    let p1 = full_process(&ascii_only(a));
    let p2 = full_process(&ascii_only(b));
    let (len1, len2) = (p1.chars().count(), p2.chars().count());
    if len1 == 0 || len2 == 0 {
        return 0;
    }

    let base = f64::from(ratio(&p1, &p2));
    let len_ratio = len1.max(len2) as f64 / len1.min(len2) as f64;

    let best = if len_ratio < 1.5 {
        let tsor = f64::from(token_sort_ratio(&p1, &p2, false)) * UNBASE_SCALE;
        let tser = f64::from(token_set_ratio(&p1, &p2, false)) * UNBASE_SCALE;
        base.max(tsor).max(tser)
    } else {
        let partial_scale = if len_ratio > 8.0 {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let partial = f64::from(partial_ratio(&p1, &p2)) * partial_scale;
        let ptsor = f64::from(token_sort_ratio(&p1, &p2, true)) * UNBASE_SCALE * partial_scale;
        let ptser = f64::from(token_set_ratio(&p1, &p2, true)) * UNBASE_SCALE * partial_scale;
        base.max(partial).max(ptsor).max(ptser)
    };

    best.round().clamp(0.0, 100.0) as Score
}

/// Best-scoring choice for `query`. Ties keep the earliest choice.
/// Returns None only when there are no choices at all.
pub fn extract_one<'a, I>(query: &str, choices: I) -> Option<(&'a str, Score)>
where
    I: IntoIterator<Item = &'a str>,
{
    let processed = full_process(query);
    if processed.is_empty() {
        log::warn!("query '{query}' is empty after processing; every choice scores 0");
    }

    let mut best: Option<(&'a str, Score)> = None;
    for choice in choices {
        let score = if processed.is_empty() {
            0
        } else {
            weighted_ratio(&processed, choice)
        };
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((choice, score));
            if score == 100 {
                break;
            }
        }
    }
    best
}
