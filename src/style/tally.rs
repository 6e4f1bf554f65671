//! Counting helpers for the style profile.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// Frequency counter that remembers first-seen order.
///
/// Ranking is by count, descending; equal counts keep the order in which the
/// keys were first added.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    pub fn get(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `n` entries, most frequent first.
    pub fn most_common(&self, n: usize) -> Vec<(K, usize)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

/// A ranked text and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextCount {
    pub text: String,
    pub count: usize,
}

impl Tally<String> {
    pub fn ranked_texts(&self, n: usize) -> Vec<TextCount> {
        self.most_common(n)
            .into_iter()
            .map(|(text, count)| TextCount { text, count })
            .collect()
    }
}

/// Summary statistics of a sample of lengths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: usize,
    pub p25: usize,
    pub p75: usize,
    pub p90: usize,
}

impl Distribution {
    /// `None` for an empty sample. Percentiles pick the element at
    /// `floor(n * q)` of the sorted sample.
    pub fn of(values: &[usize]) -> Option<Self> {
        let n = values.len();
        if n == 0 {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let at = |q_num: usize, q_den: usize| sorted[(n * q_num / q_den).min(n - 1)];

        Some(Self {
            min: sorted[0],
            max: sorted[n - 1],
            mean: round_to(values.iter().sum::<usize>() as f64 / n as f64, 1),
            median: at(1, 2),
            p25: at(1, 4),
            p75: at(3, 4),
            p90: at(9, 10),
        })
    }
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `part / whole` as a percentage, 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize, places: i32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round_to(part as f64 / whole as f64 * 100.0, places)
    }
}
