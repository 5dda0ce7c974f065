//! Role recommendations for the dominant trait

use std::collections::HashMap;

use crate::error::RoleError;
use crate::traits::{Trait, TraitSet, TraitVector};

/// Scores above this count as high for threshold rules
pub const HIGH_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRule {
    Fixed(&'static [&'static str]),
    /// Picks `high` when the score is above [`HIGH_SCORE`], `low` otherwise
    ByScore {
        high: &'static [&'static str],
        low: &'static [&'static str],
    },
}

impl RoleRule {
    fn apply(&self, score: f64) -> &'static [&'static str] {
        match self {
            RoleRule::Fixed(roles) => roles,
            RoleRule::ByScore { high, low } => {
                if score > HIGH_SCORE {
                    high
                } else {
                    low
                }
            }
        }
    }
}

/// The dominant trait together with the roles chosen for it
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub dominant: Trait,
    pub score: f64,
    pub roles: Vec<String>,
}

pub struct RoleRules {
    rules: HashMap<Trait, RoleRule>,
}

impl RoleRules {
    pub fn standard() -> Self {
        let rules = HashMap::from([
            (
                Trait::Openness,
                RoleRule::Fixed(&["Artist", "Researcher", "Designer", "Writer"]),
            ),
            (
                Trait::Conscientiousness,
                RoleRule::Fixed(&["Project Manager", "Accountant", "Engineer", "Auditor"]),
            ),
            (
                Trait::Extraversion,
                RoleRule::Fixed(&["Sales Manager", "Public Relations Specialist", "Event Planner", "Team Lead"]),
            ),
            (
                Trait::Agreeableness,
                RoleRule::Fixed(&["Teacher", "Psychologist", "Nurse", "Social Worker"]),
            ),
            (
                Trait::Neuroticism,
                RoleRule::ByScore {
                    high: &["Writer", "Artist", "Musician", "Counselor"],
                    low: &["Pilot", "Surgeon", "Crisis Manager", "Air Traffic Controller"],
                },
            ),
            (
                Trait::Extrovert,
                RoleRule::Fixed(&["Public Speaker", "Sales Manager", "Team Lead"]),
            ),
            (
                Trait::Introvert,
                RoleRule::Fixed(&["Writer", "Researcher", "Software Developer"]),
            ),
            (Trait::Leader, RoleRule::Fixed(&["Project Manager", "Entrepreneur", "HR Head"])),
            (Trait::Thinker, RoleRule::Fixed(&["Scientist", "Data Analyst", "Philosopher"])),
        ]);
        Self { rules }
    }

    /// Check that every trait of `set` has a rule
    pub fn validate(&self, set: TraitSet) -> Result<(), RoleError> {
        for t in set.traits() {
            if !self.rules.contains_key(t) {
                return Err(RoleError::MissingRule(*t));
            }
        }
        Ok(())
    }

    /// Roles for the dominant trait (ties go to the first trait in declared order)
    pub fn recommend(&self, vector: &TraitVector) -> Result<Recommendation, RoleError> {
        let (dominant, score) = vector.dominant();
        let rule = self.rules.get(&dominant).ok_or(RoleError::MissingRule(dominant))?;
        Ok(Recommendation {
            dominant,
            score,
            roles: rule.apply(score).iter().map(|r| r.to_string()).collect(),
        })
    }
}
