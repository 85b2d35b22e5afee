// Data-driven coach persona.
//
// Each deployment serves one club and loads one persona record instead
// of shipping a patched copy of the server. The persona only feeds the
// commentary provider prompts and the local fallback lines; no tactical
// logic depends on it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::formation::Formation;
use crate::phase::Phase;

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("failed to read persona file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse persona file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A coach personality for one deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Coach name, e.g. "Juan Pablo Vojvoda".
    pub name: String,
    /// Club the coach speaks for.
    pub club: String,
    /// Language the coach answers in, e.g. "español argentino".
    pub language: String,
    /// Traits the provider should lean on: "sereno", "apasionado", ...
    pub tone_keywords: Vec<String>,
    /// Catchphrases the coach is known for.
    pub example_phrases: Vec<String>,
    /// Free-form description of temperament and speaking style.
    pub style: String,
    /// Canned reply used when the provider answers with nothing usable.
    pub quiet_reply: String,
}

impl Persona {
    /// Load a persona record from a JSON file.
    pub fn load(path: &Path) -> Result<Persona, PersonaError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load from the given path, falling back to the built-in persona on
    /// any failure. A broken persona file must not stop the server.
    pub fn load_or_default(path: Option<&Path>) -> Persona {
        match path {
            Some(p) => match Persona::load(p) {
                Ok(persona) => persona,
                Err(e) => {
                    tracing::warn!("could not load persona from {}: {e}; using default", p.display());
                    Persona::default()
                }
            },
            None => Persona::default(),
        }
    }

    /// System prompt establishing the coach's voice for the provider.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are {name}, head coach of {club}. You always answer in {language}, \
             fully in character, and never mention being an assistant.\n\
             Your temperament: {style}\n",
            name = self.name,
            club = self.club,
            language = self.language,
            style = self.style,
        );
        if !self.tone_keywords.is_empty() {
            prompt.push_str(&format!("Tone: {}.\n", self.tone_keywords.join(", ")));
        }
        if !self.example_phrases.is_empty() {
            prompt.push_str("Phrases you often use:\n");
            for phrase in &self.example_phrases {
                prompt.push_str(&format!("- \"{phrase}\"\n"));
            }
        }
        prompt
    }

    /// Per-analysis user prompt describing the detected situation.
    pub fn analysis_prompt(&self, formation: Formation, phase: Phase) -> String {
        format!(
            "The opposing team is lined up in a {formation} and the play is in the \
             \"{phase}\" phase. Comment on the situation as {name} of {club}: short, \
             tactical, and in character.",
            formation = formation.label(),
            phase = phase.label(),
            name = self.name,
            club = self.club,
        )
    }

    /// Local commentary used when the provider is unavailable. Always
    /// non-empty and always names the detected formation and phase.
    pub fn fallback_comment(&self, formation: Formation, phase: Phase) -> String {
        format!(
            "O adversário joga em {} e nós estamos na fase {}.",
            formation.label(),
            phase.label()
        )
    }
}

impl Default for Persona {
    fn default() -> Self {
        Persona {
            name: "O Mister".to_string(),
            club: "Os Invictos".to_string(),
            language: "português de Portugal".to_string(),
            tone_keywords: vec![
                "confiante".to_string(),
                "sarcástico".to_string(),
                "direto".to_string(),
            ],
            example_phrases: vec![
                "Quem sabe, sabe.".to_string(),
                "O jogo ganha-se no meio-campo.".to_string(),
            ],
            style: "Treinador lendário, irónico e sempre o centro das atenções."
                .to_string(),
            quiet_reply: "O mister não tem tempo para conversa fiada.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_persona_is_complete() {
        let persona = Persona::default();
        assert!(!persona.name.is_empty());
        assert!(!persona.quiet_reply.is_empty());
        assert!(!persona.system_prompt().is_empty());
    }

    #[test]
    fn test_fallback_comment_names_formation_and_phase() {
        let persona = Persona::default();
        let comment = persona.fallback_comment(Formation::ThreeFiveTwo, Phase::Attacking);
        assert!(comment.contains("3-5-2"));
        assert!(comment.contains("ataque"));
        assert!(!comment.is_empty());
    }

    #[test]
    fn test_analysis_prompt_mentions_situation() {
        let persona = Persona::default();
        let prompt = persona.analysis_prompt(Formation::FourFourTwo, Phase::Defending);
        assert!(prompt.contains("4-4-2"));
        assert!(prompt.contains("defesa"));
        assert!(prompt.contains(&persona.name));
    }

    #[test]
    fn test_persona_json_round_trip() {
        let persona = Persona {
            name: "Gustavo Costas".into(),
            club: "Racing Club".into(),
            language: "español argentino".into(),
            tone_keywords: vec!["apasionado".into(), "frontal".into()],
            example_phrases: vec!["hay que dejar todo".into()],
            style: "Líder de vestuario, habla con el corazón.".into(),
            quiet_reply: "Costas aprieta los puños en silencio.".into(),
        };
        let json = serde_json::to_string(&persona).unwrap();
        let back: Persona = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Gustavo Costas");
        assert_eq!(back.tone_keywords.len(), 2);
        assert!(back.system_prompt().contains("Racing Club"));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = Persona::load(Path::new("/nonexistent/persona.json"));
        assert!(matches!(err, Err(PersonaError::Io(_))));
    }

    #[test]
    fn test_load_or_default_survives_missing_file() {
        let persona = Persona::load_or_default(Some(Path::new("/nonexistent/persona.json")));
        assert_eq!(persona.name, Persona::default().name);
    }
}
