//! MBTI mapping from Big Five scores
//!
//! Each axis compares one trait against [`THRESHOLD`]. A score strictly above
//! the threshold picks the first letter; a score of exactly 50 picks the second.
//!
//! | Axis | Trait             | > 50 | <= 50 |
//! |------|-------------------|------|-------|
//! | E/I  | Extraversion      | E    | I     |
//! | N/S  | Openness          | N    | S     |
//! | F/T  | Agreeableness     | F    | T     |
//! | J/P  | Conscientiousness | J    | P     |

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::traits::{Trait, TraitSet, TraitVector};

pub const THRESHOLD: f64 = 50.0;

/// Axes in code order: trait, letter above threshold, letter at or below
const AXES: [(Trait, char, char); 4] = [
    (Trait::Extraversion, 'E', 'I'),
    (Trait::Openness, 'N', 'S'),
    (Trait::Agreeableness, 'F', 'T'),
    (Trait::Conscientiousness, 'J', 'P'),
];

/// Share of the general population per type, in percent
const POPULATION: [(&str, f64); 16] = [
    ("ISTJ", 11.6),
    ("ISFJ", 13.8),
    ("INFJ", 1.5),
    ("INTJ", 2.1),
    ("ISTP", 5.4),
    ("ISFP", 8.8),
    ("INFP", 4.4),
    ("INTP", 3.3),
    ("ESTP", 4.3),
    ("ESFP", 8.5),
    ("ENFP", 8.1),
    ("ENTP", 3.2),
    ("ESTJ", 8.7),
    ("ESFJ", 12.0),
    ("ENFJ", 2.5),
    ("ENTJ", 1.8),
];

const EXEMPLARS: [(&str, &str); 16] = [
    ("ISTJ", "George Washington"),
    ("ISFJ", "Mother Teresa"),
    ("INFJ", "Martin Luther King Jr."),
    ("INTJ", "Isaac Newton"),
    ("ISTP", "Clint Eastwood"),
    ("ISFP", "Frida Kahlo"),
    ("INFP", "J. R. R. Tolkien"),
    ("INTP", "Albert Einstein"),
    ("ESTP", "Ernest Hemingway"),
    ("ESFP", "Marilyn Monroe"),
    ("ENFP", "Robin Williams"),
    ("ENTP", "Thomas Edison"),
    ("ESTJ", "Henry Ford"),
    ("ESFJ", "Sam Walton"),
    ("ENFJ", "Oprah Winfrey"),
    ("ENTJ", "Steve Jobs"),
];

/// A four-letter type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MbtiCode([char; 4]);

impl MbtiCode {
    /// Map Big Five scores onto a type code; `None` for other trait sets
    pub fn from_vector(vector: &TraitVector) -> Option<MbtiCode> {
        if vector.set() != TraitSet::BigFive {
            return None;
        }

        let mut letters = ['?'; 4];
        for (slot, (t, high, low)) in letters.iter_mut().zip(AXES) {
            let score = vector.get(t)?;
            *slot = if score > THRESHOLD { high } else { low };
        }
        Some(MbtiCode(letters))
    }

    /// All 16 codes
    #[cfg(test)]
    pub fn all() -> impl Iterator<Item = MbtiCode> {
        (0..16u8).map(|bits| {
            let mut letters = ['?'; 4];
            for (i, (_, high, low)) in AXES.iter().enumerate() {
                letters[i] = if bits & (1 << (3 - i)) == 0 { *high } else { *low };
            }
            MbtiCode(letters)
        })
    }

    pub fn as_string(&self) -> String {
        self.0.iter().collect()
    }
}

impl fmt::Display for MbtiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl FromStr for MbtiCode {
    type Err = eyre::Error;

    fn from_str(s: &str) -> eyre::Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        let chars: Vec<char> = upper.chars().collect();
        if chars.len() != 4 {
            eyre::bail!("MBTI code must be 4 letters, got '{}'", s);
        }

        let mut letters = ['?'; 4];
        for (i, (c, (_, high, low))) in chars.iter().zip(AXES).enumerate() {
            if *c != high && *c != low {
                eyre::bail!("Invalid letter '{}' at position {} of '{}' (expected {} or {})", c, i + 1, s, high, low);
            }
            letters[i] = *c;
        }
        Ok(MbtiCode(letters))
    }
}

impl Serialize for MbtiCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

/// Population share in percent; `None` for anything outside the 16 codes
pub fn population_share(code: &str) -> Option<f64> {
    POPULATION.iter().find(|(c, _)| *c == code).map(|(_, p)| *p)
}

/// Well-known figure associated with a type; `None` for unknown codes
pub fn exemplar(code: &str) -> Option<&'static str> {
    EXEMPLARS.iter().find(|(c, _)| *c == code).map(|(_, n)| *n)
}

/// Code plus its table lookups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MbtiResult {
    pub code: MbtiCode,
    pub population_share: Option<f64>,
    pub exemplar: Option<&'static str>,
}

impl MbtiResult {
    pub fn for_code(code: MbtiCode) -> Self {
        let key = code.as_string();
        Self {
            code,
            population_share: population_share(&key),
            exemplar: exemplar(&key),
        }
    }

    pub fn from_vector(vector: &TraitVector) -> Option<Self> {
        MbtiCode::from_vector(vector).map(Self::for_code)
    }

    pub fn population_label(&self) -> String {
        self.population_share
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn exemplar_label(&self) -> &'static str {
        self.exemplar.unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn big_five(o: f64, c: f64, e: f64, a: f64, n: f64) -> TraitVector {
        TraitVector::from_scores(TraitSet::BigFive, &[o, c, e, a, n]).unwrap()
    }

    #[test]
    fn test_reference_profile() {
        let v = big_five(70.0, 65.0, 55.0, 80.0, 35.0);
        assert_eq!(MbtiCode::from_vector(&v).unwrap().to_string(), "ENFJ");
    }

    #[test]
    fn test_low_scores() {
        let v = big_five(10.0, 20.0, 30.0, 40.0, 99.0);
        assert_eq!(MbtiCode::from_vector(&v).unwrap().to_string(), "ISTP");
    }

    #[test]
    fn test_threshold_boundary_picks_second_letter() {
        let at = big_five(50.0, 50.0, 50.0, 50.0, 50.0);
        assert_eq!(MbtiCode::from_vector(&at).unwrap().to_string(), "ISTP");

        let above = big_five(50.01, 50.01, 50.01, 50.01, 0.0);
        assert_eq!(MbtiCode::from_vector(&above).unwrap().to_string(), "ENFJ");
    }

    #[test]
    fn test_neuroticism_does_not_affect_code() {
        let calm = big_five(70.0, 65.0, 55.0, 80.0, 0.0);
        let anxious = big_five(70.0, 65.0, 55.0, 80.0, 100.0);
        assert_eq!(MbtiCode::from_vector(&calm), MbtiCode::from_vector(&anxious));
    }

    #[test]
    fn test_archetype_vector_has_no_code() {
        let v = TraitVector::uniform(TraitSet::Archetype);
        assert!(MbtiCode::from_vector(&v).is_none());
        assert!(MbtiResult::from_vector(&v).is_none());
    }

    #[test]
    fn test_all_sixteen_codes_are_reachable() {
        let mut seen = HashSet::new();
        for bits in 0..16u8 {
            let pick = |i: u8| if bits & (1 << i) != 0 { 75.0 } else { 25.0 };
            let v = big_five(pick(0), pick(1), pick(2), pick(3), 50.0);
            seen.insert(MbtiCode::from_vector(&v).unwrap());
        }
        let all: HashSet<MbtiCode> = MbtiCode::all().collect();
        assert_eq!(seen.len(), 16);
        assert_eq!(seen, all);
    }

    #[test]
    fn test_population_table_is_exhaustive() {
        let expected = [
            ("ISTJ", 11.6),
            ("ISFJ", 13.8),
            ("INFJ", 1.5),
            ("INTJ", 2.1),
            ("ISTP", 5.4),
            ("ISFP", 8.8),
            ("INFP", 4.4),
            ("INTP", 3.3),
            ("ESTP", 4.3),
            ("ESFP", 8.5),
            ("ENFP", 8.1),
            ("ENTP", 3.2),
            ("ESTJ", 8.7),
            ("ESFJ", 12.0),
            ("ENFJ", 2.5),
            ("ENTJ", 1.8),
        ];
        for (code, share) in expected {
            assert_eq!(population_share(code), Some(share), "{}", code);
        }
        for code in MbtiCode::all() {
            assert!(population_share(&code.as_string()).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_exemplar_table_is_exhaustive() {
        let expected = [
            ("ISTJ", "George Washington"),
            ("ISFJ", "Mother Teresa"),
            ("INFJ", "Martin Luther King Jr."),
            ("INTJ", "Isaac Newton"),
            ("ISTP", "Clint Eastwood"),
            ("ISFP", "Frida Kahlo"),
            ("INFP", "J. R. R. Tolkien"),
            ("INTP", "Albert Einstein"),
            ("ESTP", "Ernest Hemingway"),
            ("ESFP", "Marilyn Monroe"),
            ("ENFP", "Robin Williams"),
            ("ENTP", "Thomas Edison"),
            ("ESTJ", "Henry Ford"),
            ("ESFJ", "Sam Walton"),
            ("ENFJ", "Oprah Winfrey"),
            ("ENTJ", "Steve Jobs"),
        ];
        for (code, name) in expected {
            assert_eq!(exemplar(code), Some(name), "{}", code);
        }
        for code in MbtiCode::all() {
            assert!(exemplar(&code.as_string()).is_some(), "{}", code);
        }
    }

    #[test]
    fn test_unknown_code_lookup_is_sentinel() {
        assert_eq!(population_share("XXXX"), None);
        assert_eq!(exemplar("enfj"), None);
        assert_eq!(exemplar(""), None);
    }

    #[test]
    fn test_result_labels() {
        let known = MbtiResult::for_code("enfj".parse().unwrap());
        assert_eq!(known.population_label(), "2.5%");
        assert_eq!(known.exemplar_label(), "Oprah Winfrey");

        let unknown = MbtiResult {
            code: "INTP".parse().unwrap(),
            population_share: None,
            exemplar: None,
        };
        assert_eq!(unknown.population_label(), "Unknown");
        assert_eq!(unknown.exemplar_label(), "Unknown");
    }

    #[test]
    fn test_parse_code() {
        assert_eq!("intj".parse::<MbtiCode>().unwrap().to_string(), "INTJ");
        assert!("INT".parse::<MbtiCode>().is_err());
        assert!("SNTJ".parse::<MbtiCode>().is_err());
        assert!("INJT".parse::<MbtiCode>().is_err());
    }
}
