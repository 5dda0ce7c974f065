//! Explanation generator
//!
//! One sentence per trait, produced from a per-trait, per-language template.
//! Templates carry a `{score}` placeholder that receives the formatted score.

use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ExplainError;
use crate::traits::{Trait, TraitSet, TraitVector};

const PLACEHOLDER: &str = "{score}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => f.write_str("english"),
            Language::Spanish => f.write_str("spanish"),
        }
    }
}

/// Format a score with the configured number of decimals and a literal `%`
pub fn format_score(score: f64, precision: usize) -> String {
    format!("{:.*}%", precision, score)
}

pub struct ExplanationTable {
    templates: HashMap<(Trait, Language), &'static str>,
}

impl ExplanationTable {
    pub fn standard() -> Self {
        use Language::{English, Spanish};

        let entries: [(Trait, Language, &'static str); 18] = [
            (
                Trait::Openness,
                English,
                "Openness ({score}): you are open to new experiences and enjoy exploring ideas.",
            ),
            (
                Trait::Openness,
                Spanish,
                "Apertura ({score}): estás abierto a nuevas experiencias y disfrutas explorando ideas.",
            ),
            (
                Trait::Conscientiousness,
                English,
                "Conscientiousness ({score}): you are organized and reliable in what you take on.",
            ),
            (
                Trait::Conscientiousness,
                Spanish,
                "Responsabilidad ({score}): eres organizado y confiable en lo que emprendes.",
            ),
            (
                Trait::Extraversion,
                English,
                "Extraversion ({score}): you draw energy from social settings and other people.",
            ),
            (
                Trait::Extraversion,
                Spanish,
                "Extraversión ({score}): obtienes energía de los entornos sociales y de otras personas.",
            ),
            (
                Trait::Agreeableness,
                English,
                "Agreeableness ({score}): you are cooperative, kind, and considerate of others.",
            ),
            (
                Trait::Agreeableness,
                Spanish,
                "Amabilidad ({score}): eres cooperativo, amable y considerado con los demás.",
            ),
            (
                Trait::Neuroticism,
                English,
                "Neuroticism ({score}): this reflects how strongly you react to stress and setbacks.",
            ),
            (
                Trait::Neuroticism,
                Spanish,
                "Neuroticismo ({score}): refleja la intensidad con la que reaccionas al estrés.",
            ),
            (
                Trait::Extrovert,
                English,
                "Extrovert ({score}): you are outgoing and energized by company.",
            ),
            (
                Trait::Extrovert,
                Spanish,
                "Extrovertido ({score}): eres sociable y la compañía te llena de energía.",
            ),
            (
                Trait::Introvert,
                English,
                "Introvert ({score}): you recharge in solitude and value depth over breadth.",
            ),
            (
                Trait::Introvert,
                Spanish,
                "Introvertido ({score}): recargas energía en soledad y valoras la profundidad.",
            ),
            (
                Trait::Leader,
                English,
                "Leader ({score}): you take initiative and guide the people around you.",
            ),
            (
                Trait::Leader,
                Spanish,
                "Líder ({score}): tomas la iniciativa y guías a las personas a tu alrededor.",
            ),
            (
                Trait::Thinker,
                English,
                "Thinker ({score}): you are analytical and seek to understand how things work.",
            ),
            (
                Trait::Thinker,
                Spanish,
                "Pensador ({score}): eres analítico y buscas entender cómo funcionan las cosas.",
            ),
        ];

        Self {
            templates: entries.into_iter().map(|(t, l, tpl)| ((t, l), tpl)).collect(),
        }
    }

    /// Check that every trait of `set` has a template in every language
    pub fn validate(&self, set: TraitSet) -> Result<(), ExplainError> {
        for t in set.traits() {
            for language in Language::value_variants() {
                self.template(*t, *language)?;
            }
        }
        Ok(())
    }

    fn template(&self, t: Trait, language: Language) -> Result<&'static str, ExplainError> {
        self.templates
            .get(&(t, language))
            .copied()
            .ok_or_else(|| ExplainError::MissingTemplate {
                trait_name: t,
                language: language.to_string(),
            })
    }

    /// One sentence per trait, in vector order
    pub fn generate(
        &self,
        vector: &TraitVector,
        language: Language,
        precision: usize,
    ) -> Result<Vec<String>, ExplainError> {
        let mut sentences = Vec::with_capacity(vector.len());
        for (t, score) in vector.iter() {
            let template = self.template(t, language)?;
            sentences.push(template.replace(PLACEHOLDER, &format_score(score, precision)));
        }
        Ok(sentences)
    }

    #[cfg(test)]
    fn without(mut self, t: Trait, language: Language) -> Self {
        self.templates.remove(&(t, language));
        self
    }
}
