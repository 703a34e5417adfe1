//! Character sets a pattern slot can range over.
//!
//! Each alphabet is an ordered list of values, where a value is either one
//! character or the empty value (`None`) that an optional slot contributes.
//! The order of the values is the order the enumerator visits them in.

const VOWELS: &str = "aeiou";

/// Named character classes of the pattern language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `A`: any lowercase letter
    Letter,
    /// `C`: any consonant
    Consonant,
    /// `V`: any vowel
    Vowel,
    /// `#`: any digit
    Digit,
    /// `*`: any letter or digit
    Alphanumeric,
}

impl CharClass {
    /// Map a pattern token to its class, if it is one.
    pub fn from_token(token: char) -> Option<Self> {
        match token {
            'A' => Some(Self::Letter),
            'C' => Some(Self::Consonant),
            'V' => Some(Self::Vowel),
            '#' => Some(Self::Digit),
            '*' => Some(Self::Alphanumeric),
            _ => None,
        }
    }

    /// The token this class is written as.
    pub fn token(self) -> char {
        match self {
            Self::Letter => 'A',
            Self::Consonant => 'C',
            Self::Vowel => 'V',
            Self::Digit => '#',
            Self::Alphanumeric => '*',
        }
    }

    pub fn alphabet(self) -> Alphabet {
        match self {
            Self::Letter => Alphabet::letters(),
            Self::Consonant => Alphabet::consonants(),
            Self::Vowel => Alphabet::vowels(),
            Self::Digit => Alphabet::digits(),
            Self::Alphanumeric => Alphabet::alphanumeric(),
        }
    }
}

/// An ordered, duplicate-free, non-empty set of slot values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    values: Vec<Option<char>>,
}

impl Alphabet {
    /// `a` through `z`.
    pub fn letters() -> Self {
        Self::from_chars('a'..='z')
    }

    /// `0` through `9`.
    pub fn digits() -> Self {
        Self::from_chars('0'..='9')
    }

    /// Letters followed by digits.
    pub fn alphanumeric() -> Self {
        Self::from_chars(('a'..='z').chain('0'..='9'))
    }

    pub fn vowels() -> Self {
        Self::from_chars(VOWELS.chars())
    }

    /// Letters that are not vowels, in alphabetical order.
    pub fn consonants() -> Self {
        Self::from_chars(('a'..='z').filter(|c| !VOWELS.contains(*c)))
    }

    /// A single fixed character.
    pub fn literal(c: char) -> Self {
        Self {
            values: vec![Some(c)],
        }
    }

    /// Build a set from arbitrary characters, keeping the first occurrence of
    /// each one. An empty input gives an empty alphabet; the compiler rejects
    /// that before it reaches a slot.
    pub fn from_chars<I: IntoIterator<Item = char>>(chars: I) -> Self {
        let mut values: Vec<Option<char>> = Vec::new();
        for c in chars {
            if !values.contains(&Some(c)) {
                values.push(Some(c));
            }
        }
        Self { values }
    }

    /// Prepend the empty value, making the slot optional.
    ///
    /// Idempotent: an alphabet that is already optional is returned as is.
    pub fn optional(mut self) -> Self {
        if !self.is_optional() {
            self.values.insert(0, None);
        }
        self
    }

    pub fn is_optional(&self) -> bool {
        self.values.contains(&None)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True for a single non-empty value, i.e. a plain literal position.
    pub fn is_singleton(&self) -> bool {
        matches!(self.values.as_slice(), [Some(_)])
    }

    pub fn get(&self, index: usize) -> Option<Option<char>> {
        self.values.get(index).copied()
    }

    pub fn values(&self) -> &[Option<char>] {
        &self.values
    }
}
