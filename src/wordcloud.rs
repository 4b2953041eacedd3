//! Title tokenizer and frequency ranker for the news word cloud
//!
//! Transforms a collection of scrapped-news titles into a ranked list of
//! salient terms with counts, suitable for size-weighted display.
//! Separator characters split compound terms, a trailing grammatical
//! particle is stripped from longer tokens, stop words are discarded,
//! and a small synonym map folds short aliases into their canonical
//! form before counting.
//!
//! The particle, stop-word, and synonym tables are hand-tuned fixed
//! configuration data, not the output of any linguistic algorithm.
//!
//! Ranking is deterministic: descending count, ties broken by first-seen
//! order. Any per-render display jitter (opacity, size wobble) belongs
//! to the renderer and must stay out of this module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feed::NewsItem;

/// Maximum terms emitted for display.
pub const MAX_CLOUD_TERMS: usize = 30;

/// Punctuation and separator characters replaced by a space before
/// tokenization. Splits compound terms joined by punctuation.
const SEPARATORS: &[char] = &[
    '[', ']', '(', ')', '{', '}', '<', '>', '「', '」', '『', '』', '【', '】', ',', '.', '"',
    '\'', '“', '”', '‘', '’', '·', 'ㆍ', '…', '‥', '-', '–', '—', '―', '/', '\\', '&', '!',
    '?', ':', ';', '~', '※', '↑', '↓', '=', '+', '*', '%',
];

/// Single-character grammatical particles stripped from the end of
/// tokens longer than two characters (topic, subject, object,
/// possessive, conjunctive, locative).
const PARTICLE_SUFFIXES: &[char] = &[
    '은', '는', '이', '가', '을', '를', '의', '와', '과', '도', '에', '로',
];

/// News-wire noise terms excluded from counting regardless of frequency.
const STOP_WORDS: &[&str] = &[
    "뉴스", "속보", "특징주", "마감", "단독", "종합", "포토", "영상", "칼럼", "기자", "주가",
    "증시", "시황", "급등", "급락", "상승", "하락", "오늘",
];

/// Short alias → canonical form, applied after stop-word filtering.
const SYNONYMS: &[(&str, &str)] = &[
    ("삼성", "삼성전자"),
    ("하이닉스", "SK하이닉스"),
    ("현대", "현대차"),
];

/// One ranked term for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudTerm {
    pub text: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy)]
struct TermEntry {
    count: u64,
    first_seen: usize,
}

/// Token → count aggregate over one title collection.
///
/// Built fresh per collection; there is no incremental update path.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    entries: HashMap<String, TermEntry>,
    next_index: usize,
}

impl FrequencyTable {
    fn record(&mut self, token: String) {
        let index = self.next_index;
        let entry = self.entries.entry(token).or_insert(TermEntry {
            count: 0,
            first_seen: index,
        });
        if entry.count == 0 {
            self.next_index += 1;
        }
        entry.count += 1;
    }

    /// Occurrence count for a term (zero when absent).
    pub fn count(&self, term: &str) -> u64 {
        self.entries.get(term).map_or(0, |e| e.count)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no terms were counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Terms sorted by descending count, ties broken by first-seen
    /// order, truncated to `limit`.
    pub fn ranked(&self, limit: usize) -> Vec<CloudTerm> {
        let mut terms: Vec<(&String, &TermEntry)> = self.entries.iter().collect();
        terms.sort_by(|a, b| b.1.count.cmp(&a.1.count).then(a.1.first_seen.cmp(&b.1.first_seen)));
        terms
            .into_iter()
            .take(limit)
            .map(|(text, entry)| CloudTerm {
                text: text.clone(),
                count: entry.count,
            })
            .collect()
    }
}

/// Normalize one candidate token. Returns `None` when the token is
/// filtered out.
fn normalize_token(raw: &str) -> Option<String> {
    let mut token = raw;

    // Strip one trailing particle, only from tokens long enough that
    // the remainder is still a word.
    if token.chars().count() > 2 {
        if let Some((idx, last)) = token.char_indices().last() {
            if PARTICLE_SUFFIXES.contains(&last) {
                token = &token[..idx];
            }
        }
    }

    if token.chars().count() <= 1 {
        return None;
    }
    if STOP_WORDS.contains(&token) {
        return None;
    }

    let canonical = SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == token)
        .map_or(token, |(_, canonical)| *canonical);

    Some(canonical.to_string())
}

/// Build a frequency table over a collection of titles.
///
/// Titles containing only separators or stop words contribute nothing;
/// an empty collection yields an empty table. Linear in total text
/// length.
pub fn build_frequency_table<'a, I>(titles: I) -> FrequencyTable
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = FrequencyTable::default();
    for title in titles {
        let cleaned: String = title
            .chars()
            .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
            .collect();
        for candidate in cleaned.split_whitespace() {
            if let Some(token) = normalize_token(candidate) {
                table.record(token);
            }
        }
    }
    table
}

/// Word-cloud state over the current bookmark collection.
///
/// Rebuilt from scratch whenever the collection changes (e.g., after a
/// bookmark deletion); counts are never updated incrementally.
#[derive(Debug, Default)]
pub struct TitleCloud {
    table: FrequencyTable,
    terms: Vec<CloudTerm>,
}

impl TitleCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the table and ranking from the given bookmark records.
    pub fn recompute(&mut self, items: &[NewsItem]) {
        self.table = build_frequency_table(items.iter().map(|item| item.title.as_str()));
        self.terms = self.table.ranked(MAX_CLOUD_TERMS);
        debug!(
            titles = items.len(),
            distinct_terms = self.table.len(),
            displayed = self.terms.len(),
            "word cloud recomputed"
        );
    }

    /// Current ranked terms, at most [`MAX_CLOUD_TERMS`].
    pub fn terms(&self) -> &[CloudTerm] {
        &self.terms
    }

    /// Current frequency table.
    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }
}
