//! Wildcard pattern compiler.
//!
//! Turns a pattern such as `redCV?.com` into an ordered list of [`Slot`]s,
//! one per output position, each bound to an [`Alphabet`].
//!
//! # Pattern Syntax
//!
//! - `A`: any letter (a-z)
//! - `C`: any consonant
//! - `V`: any vowel
//! - `#`: any digit (0-9)
//! - `*`: any letter or digit
//! - `[xyz]`: any one of the listed characters, taken literally
//! - `?`: makes the preceding token optional
//! - Any other character: literal
//!
//! # Examples
//!
//! ```
//! use domainsearch_lib::compile;
//!
//! let compiled = compile("a?b").unwrap();
//! assert_eq!(compiled.combination_count(), 2);
//! let names: Vec<String> = compiled.candidates().collect();
//! assert_eq!(names, vec!["b", "ab"]);
//! ```
//!
//! Compilation runs in two passes. The first is a two-state scanner that
//! emits tokens and enforces the syntactic rules (balanced brackets, no
//! leading or doubled `?`). The second folds every `?` into the token before
//! it.

use crate::alphabet::{Alphabet, CharClass};
use crate::error::DomainSearchError;

/// What a slot was compiled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    Literal(char),
    Class(CharClass),
    /// A bracket group, e.g. `[xyz]`
    Set,
}

/// One output position of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Position in the slot list
    pub index: usize,
    pub kind: SlotKind,
    pub alphabet: Alphabet,
}

impl Slot {
    pub fn is_optional(&self) -> bool {
        self.alphabet.is_optional()
    }
}

/// A pattern after compilation: the slots plus the precomputed number of
/// candidates they produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pattern: String,
    slots: Vec<Slot>,
    combination_count: u128,
}

impl CompiledPattern {
    /// The source text this was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Product of all slot alphabet sizes; 1 for a pattern without slots.
    ///
    /// Saturates at `u128::MAX` rather than overflowing.
    pub fn combination_count(&self) -> u128 {
        self.combination_count
    }

    /// True when every slot is a plain literal, so the only candidate is the
    /// pattern text itself.
    pub fn is_trivial(&self) -> bool {
        self.slots.iter().all(|slot| slot.alphabet.is_singleton())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    /// Inside `[...]`; holds the index of the opening bracket
    InBracket { opened_at: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    Class(CharClass),
    Set(Vec<char>),
    /// `?` at the given character index
    Optional(usize),
}

/// Compile a pattern into slots.
///
/// # Errors
///
/// Returns `DomainSearchError::PatternCompile` with the character index for:
/// - an unmatched `[` or `]`
/// - a `[` inside a bracket group
/// - an empty bracket group `[]`
/// - `?` as the first character
/// - two consecutive `?`
pub fn compile(pattern: &str) -> Result<CompiledPattern, DomainSearchError> {
    let tokens = tokenize(pattern)?;
    let slots = fold_optional(pattern, tokens)?;

    let combination_count = slots
        .iter()
        .fold(1u128, |count, slot| count.saturating_mul(slot.alphabet.len() as u128));

    Ok(CompiledPattern {
        pattern: pattern.to_string(),
        slots,
        combination_count,
    })
}

/// Number of candidates a pattern produces, without keeping the compiled form.
pub fn estimate_pattern_count(pattern: &str) -> Result<u128, DomainSearchError> {
    compile(pattern).map(|compiled| compiled.combination_count())
}

/// Compile and collect every candidate of a pattern.
///
/// Convenient for small patterns; use [`CompiledPattern::candidates`] to
/// stream large ones.
pub fn expand_pattern(pattern: &str) -> Result<Vec<String>, DomainSearchError> {
    Ok(compile(pattern)?.candidates().collect())
}

/// First pass: scan left to right and emit tokens.
fn tokenize(pattern: &str) -> Result<Vec<Token>, DomainSearchError> {
    let mut tokens = Vec::new();
    let mut state = ScanState::Normal;
    let mut buffer: Vec<char> = Vec::new();
    let mut previous: Option<char> = None;

    for (i, c) in pattern.chars().enumerate() {
        match state {
            ScanState::Normal => match c {
                '[' => {
                    state = ScanState::InBracket { opened_at: i };
                    buffer.clear();
                }
                ']' => {
                    return Err(DomainSearchError::pattern_compile(
                        pattern,
                        i,
                        "closing bracket without an opening bracket",
                    ));
                }
                '?' => {
                    if i == 0 {
                        return Err(DomainSearchError::pattern_compile(
                            pattern,
                            i,
                            "cannot use '?' as the first character",
                        ));
                    }
                    if previous == Some('?') {
                        return Err(DomainSearchError::pattern_compile(
                            pattern,
                            i,
                            "cannot use two consecutive '?' characters",
                        ));
                    }
                    tokens.push(Token::Optional(i));
                }
                _ => match CharClass::from_token(c) {
                    Some(class) => tokens.push(Token::Class(class)),
                    None => tokens.push(Token::Literal(c)),
                },
            },
            ScanState::InBracket { .. } => match c {
                '[' => {
                    return Err(DomainSearchError::pattern_compile(
                        pattern,
                        i,
                        "nested '[' inside a character set",
                    ));
                }
                ']' => {
                    if buffer.is_empty() {
                        return Err(DomainSearchError::pattern_compile(
                            pattern,
                            i,
                            "empty character set",
                        ));
                    }
                    tokens.push(Token::Set(std::mem::take(&mut buffer)));
                    state = ScanState::Normal;
                }
                _ => buffer.push(c),
            },
        }
        previous = Some(c);
    }

    if let ScanState::InBracket { opened_at } = state {
        return Err(DomainSearchError::pattern_compile(
            pattern,
            opened_at,
            "no closing bracket",
        ));
    }

    Ok(tokens)
}

/// Second pass: turn tokens into slots, folding each `?` into the slot
/// before it.
fn fold_optional(pattern: &str, tokens: Vec<Token>) -> Result<Vec<Slot>, DomainSearchError> {
    let mut slots: Vec<Slot> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let (kind, alphabet) = match token {
            Token::Literal(c) => (SlotKind::Literal(c), Alphabet::literal(c)),
            Token::Class(class) => (SlotKind::Class(class), class.alphabet()),
            Token::Set(chars) => (SlotKind::Set, Alphabet::from_chars(chars)),
            Token::Optional(at) => {
                let target = slots.last_mut().ok_or_else(|| {
                    DomainSearchError::pattern_compile(pattern, at, "'?' has nothing to apply to")
                })?;
                target.alphabet = target.alphabet.clone().optional();
                continue;
            }
        };
        slots.push(Slot {
            index: slots.len(),
            kind,
            alphabet,
        });
    }

    Ok(slots)
}
