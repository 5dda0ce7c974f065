//! Static profile metadata keyed by trait

use serde::Serialize;

use crate::traits::Trait;

/// Narrative text shown for the dominant trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraitProfile {
    pub description: &'static str,
    pub tip: &'static str,
    pub quote: &'static str,
}

impl TraitProfile {
    pub fn of(t: Trait) -> TraitProfile {
        match t {
            Trait::Openness => TraitProfile {
                description: "You are imaginative, curious, and drawn to new ideas and experiences.",
                tip: "Seek out projects that reward experimentation and creative problem-solving.",
                quote: "Imagination is more important than knowledge.",
            },
            Trait::Conscientiousness => TraitProfile {
                description: "You are organized, dependable, and follow through on your commitments.",
                tip: "Use your discipline to lead long-running efforts that need steady execution.",
                quote: "We are what we repeatedly do. Excellence, then, is not an act, but a habit.",
            },
            Trait::Extraversion => TraitProfile {
                description: "You are sociable, energetic, and come alive in the company of others.",
                tip: "Put yourself in roles where communication and networking matter.",
                quote: "Alone we can do so little; together we can do so much.",
            },
            Trait::Agreeableness => TraitProfile {
                description: "You are warm, cooperative, and care deeply about the people around you.",
                tip: "Your empathy builds trust; remember to voice your own needs as well.",
                quote: "No act of kindness, no matter how small, is ever wasted.",
            },
            Trait::Neuroticism => TraitProfile {
                description: "You feel emotions intensely and notice risks that others overlook.",
                tip: "Build routines that help you recover from stress, and channel sensitivity into craft.",
                quote: "Out of difficulties grow miracles.",
            },
            Trait::Extrovert => TraitProfile {
                description: "You are social, outgoing, and energized by being around people.",
                tip: "Engage in team-based projects to amplify your strengths.",
                quote: "The more you praise and celebrate your life, the more there is in life to celebrate.",
            },
            Trait::Introvert => TraitProfile {
                description: "You enjoy solitude, deep thoughts, and recharge by spending time alone.",
                tip: "Leverage your focus and depth in fields requiring attention to detail.",
                quote: "Silence is only frightening to people who are compulsively verbalizing.",
            },
            Trait::Leader => TraitProfile {
                description: "You take initiative, guide others, and enjoy managing responsibilities.",
                tip: "Continue improving your communication and delegation skills.",
                quote: "Leadership is not about being in charge. It's about taking care of those in your charge.",
            },
            Trait::Thinker => TraitProfile {
                description: "You are analytical, curious, and enjoy deep understanding.",
                tip: "Apply your problem-solving in research or tech-heavy roles.",
                quote: "The important thing is not to stop questioning. Curiosity has its own reason for existing.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::TraitSet;

    #[test]
    fn test_every_trait_has_profile_text() {
        for set in [TraitSet::BigFive, TraitSet::Archetype] {
            for t in set.traits() {
                let p = TraitProfile::of(*t);
                assert!(!p.description.is_empty());
                assert!(!p.tip.is_empty());
                assert!(!p.quote.is_empty());
            }
        }
    }

    #[test]
    fn test_archetype_text() {
        let p = TraitProfile::of(Trait::Leader);
        assert!(p.description.starts_with("You take initiative"));
    }
}
