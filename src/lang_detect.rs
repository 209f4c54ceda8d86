use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Guesses below this confidence do not count as switch votes.
const SWITCH_THRESHOLD: f32 = 0.8;
/// High-confidence votes required inside the window before switching.
const MIN_VOTES: usize = 2;
/// Sliding window length; older guesses fall off.
const WINDOW_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Fr,
    En,
}

impl Lang {
    pub fn other(self) -> Self {
        match self {
            Lang::Fr => Lang::En,
            Lang::En => Lang::Fr,
        }
    }
}

/// One language guess from the speech-to-text collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LangGuess {
    pub lang: Lang,
    pub confidence: f32,
}

/// Per-session voting state. One active speaker per kiosk is assumed;
/// concurrent writers for the same session would race.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDetectionState {
    pub history: Vec<LangGuess>,
    pub current_lang: Lang,
    pub switch_count: u32,
}

impl LanguageDetectionState {
    pub fn new(initial_lang: Lang) -> Self {
        Self {
            history: Vec::new(),
            current_lang: initial_lang,
            switch_count: 0,
        }
    }
}

/// Outcome of feeding one guess into the voter.
#[derive(Debug, Clone)]
pub struct SwitchDecision {
    pub should_switch: bool,
    pub new_session_lang: Lang,
    /// Localized announcement, present only on an actual switch.
    pub message: Option<String>,
}

/// Sliding-window majority voter deciding whether a live session
/// should flip its spoken language.
///
/// Requires sustained evidence (2 of the last 3 guesses at >= 0.8
/// confidence) before flipping, so a single noisy transcription or a
/// mixed-language utterance cannot make the session oscillate.
pub fn process_language_guess(
    state: &mut LanguageDetectionState,
    guess: LangGuess,
) -> SwitchDecision {
    state.history.push(guess);
    if state.history.len() > WINDOW_SIZE {
        let overflow = state.history.len() - WINDOW_SIZE;
        state.history.drain(..overflow);
    }

    let other = state.current_lang.other();
    let votes_for_other = state
        .history
        .iter()
        .filter(|g| g.confidence >= SWITCH_THRESHOLD && g.lang == other)
        .count();

    if votes_for_other >= MIN_VOTES {
        state.current_lang = other;
        state.switch_count += 1;
        tracing::info!(new_lang = ?other, switch_count = state.switch_count, "session language switched");
        SwitchDecision {
            should_switch: true,
            new_session_lang: other,
            message: Some(switch_message(other)),
        }
    } else {
        SwitchDecision {
            should_switch: false,
            new_session_lang: state.current_lang,
            message: None,
        }
    }
}

/// Announcement in the language being switched TO.
fn switch_message(lang: Lang) -> String {
    match lang {
        Lang::Fr => "Je passe en français pour la suite de notre échange.".to_string(),
        Lang::En => "Switching to English for the rest of our conversation.".to_string(),
    }
}

static FRENCH_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "le", "la", "les", "un", "une", "des", "de", "du", "et", "ou", "est", "sont", "je",
        "tu", "il", "elle", "nous", "vous", "ils", "elles", "mon", "ton", "son", "pour",
        "avec", "dans", "sur", "pas", "que", "qui", "quoi", "mais", "donc", "votre", "notre",
        "être", "avoir", "faire", "bonjour", "merci", "oui", "non", "très", "bien", "ça",
    ]
    .into_iter()
    .collect()
});

static ENGLISH_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "is", "are", "was", "were", "i", "you", "he", "she",
        "we", "they", "my", "your", "his", "her", "for", "with", "in", "on", "not", "that",
        "which", "what", "but", "so", "to", "of", "have", "has", "do", "does", "hello",
        "thanks", "yes", "no", "very", "well", "this", "it",
    ]
    .into_iter()
    .collect()
});

const FRENCH_ACCENTS: &str = "àâäéèêëîïôöùûüçœ";

/// Independent text-based language guess using stop-word membership,
/// with a bonus vote for accented characters on the French side.
///
/// Confidence is the winning vote ratio capped at 0.99. No votes at
/// all, or a tie, defaults to French at 0.5 (kiosk domain bias).
pub fn detect_language_from_text(text: &str) -> LangGuess {
    let lowered = text.to_lowercase();

    let mut fr_votes = 0usize;
    let mut en_votes = 0usize;
    for word in lowered.split(|c: char| !c.is_alphanumeric() && c != '\'') {
        // Strip elisions like l'entreprise / j'aimerais
        let word = word.rsplit('\'').next().unwrap_or(word);
        if word.is_empty() {
            continue;
        }
        if FRENCH_STOP_WORDS.contains(word) {
            fr_votes += 1;
        }
        if ENGLISH_STOP_WORDS.contains(word) {
            en_votes += 1;
        }
    }

    if lowered.chars().any(|c| FRENCH_ACCENTS.contains(c)) {
        fr_votes += 1;
    }

    let total = fr_votes + en_votes;
    if total == 0 || fr_votes == en_votes {
        return LangGuess {
            lang: Lang::Fr,
            confidence: 0.5,
        };
    }

    let (lang, winning) = if fr_votes > en_votes {
        (Lang::Fr, fr_votes)
    } else {
        (Lang::En, en_votes)
    };

    LangGuess {
        lang,
        confidence: (winning as f32 / total as f32).min(0.99),
    }
}

/// Key-value store for per-session detection state, so the in-memory
/// map can be swapped for a distributed cache without touching the
/// voting algorithm.
pub trait SessionLangStore: Send + Sync {
    fn get(&self, session_id: &str) -> Option<LanguageDetectionState>;
    fn set(&self, session_id: &str, state: LanguageDetectionState);
}

/// Process-local store. State does not survive restarts and is not
/// shared across server instances.
#[derive(Default)]
pub struct InMemorySessionStore {
    states: RwLock<HashMap<String, LanguageDetectionState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience wrapper: load (or lazily create) the session state,
    /// feed one guess through the voter, store the result back.
    pub fn process_guess(
        &self,
        session_id: &str,
        initial_lang: Lang,
        guess: LangGuess,
    ) -> SwitchDecision {
        let mut state = self
            .get(session_id)
            .unwrap_or_else(|| LanguageDetectionState::new(initial_lang));
        let decision = process_language_guess(&mut state, guess);
        self.set(session_id, state);
        decision
    }
}

impl SessionLangStore for InMemorySessionStore {
    fn get(&self, session_id: &str) -> Option<LanguageDetectionState> {
        self.states
            .read()
            .ok()
            .and_then(|map| map.get(session_id).cloned())
    }

    fn set(&self, session_id: &str, state: LanguageDetectionState) {
        if let Ok(mut map) = self.states.write() {
            map.insert(session_id.to_string(), state);
        }
    }
}
