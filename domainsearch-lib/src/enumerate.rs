//! Candidate enumeration over a compiled pattern.
//!
//! Candidates come out in mixed-radix order: the first slot is the most
//! significant digit, the last slot the least significant. Each call to
//! [`CompiledPattern::candidates`] starts a fresh iterator, so the sequence
//! can be replayed any number of times.

use std::iter::FusedIterator;

use crate::pattern::{CompiledPattern, Slot};

/// Lazy iterator over every candidate of a [`CompiledPattern`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    pattern: &'a str,
    slots: &'a [Slot],
    /// Odometer: one alphabet position per slot
    counters: Vec<usize>,
    remaining: u128,
}

impl CompiledPattern {
    /// Iterate over all candidates.
    ///
    /// Yields exactly [`combination_count`](CompiledPattern::combination_count)
    /// strings. A pattern with no slots yields its own text once.
    pub fn candidates(&self) -> Candidates<'_> {
        Candidates {
            pattern: self.pattern(),
            slots: self.slots(),
            counters: vec![0; self.slots().len()],
            remaining: self.combination_count(),
        }
    }

    /// The candidate at `index` in enumeration order, or `None` when the
    /// index is past the end.
    ///
    /// ```
    /// use domainsearch_lib::compile;
    ///
    /// let compiled = compile("##").unwrap();
    /// assert_eq!(compiled.candidate_at(42).as_deref(), Some("42"));
    /// assert_eq!(compiled.candidate_at(100), None);
    /// ```
    pub fn candidate_at(&self, index: u128) -> Option<String> {
        if index >= self.combination_count() {
            return None;
        }
        if self.slots().is_empty() {
            return Some(self.pattern().to_string());
        }

        let mut digits = vec![0usize; self.slots().len()];
        let mut rest = index;
        for (i, slot) in self.slots().iter().enumerate().rev() {
            let radix = slot.alphabet.len() as u128;
            digits[i] = (rest % radix) as usize;
            rest /= radix;
        }

        Some(render(self.slots(), &digits))
    }
}

impl Candidates<'_> {
    /// Candidates not yet produced.
    pub fn remaining(&self) -> u128 {
        self.remaining
    }

    /// Advance the odometer by one, rightmost slot first.
    fn advance(&mut self) {
        for i in (0..self.counters.len()).rev() {
            self.counters[i] += 1;
            if self.counters[i] < self.slots[i].alphabet.len() {
                return;
            }
            self.counters[i] = 0;
        }
    }
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if self.slots.is_empty() {
            return Some(self.pattern.to_string());
        }

        let candidate = render(self.slots, &self.counters);
        self.advance();
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Candidates<'_> {}

/// Concatenate the chosen value of every slot; empty values add nothing.
fn render(slots: &[Slot], digits: &[usize]) -> String {
    slots
        .iter()
        .zip(digits)
        .filter_map(|(slot, &digit)| slot.alphabet.get(digit).flatten())
        .collect()
}
