//! Translation Desk - state behind the text-to-animation pipeline
//!
//! The desk owns everything the person sees for a translation: the input,
//! the returned sign grammar text, loading and notices. Requests carry a
//! generation token; a response whose token is no longer current belongs to
//! a translation that has since been replaced and is dropped unseen.

use serde::Serialize;
use signa_anim::PlayerSession;
use signa_client::{HandMovement, TranslationResponse};
use signa_core::{Generation, GenerationCounter, SignaError, SignaResult};

use crate::Notice;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to translate.";
pub const TRANSLATE_FAILED_MESSAGE: &str = "Translation failed. Please try again.";
pub const BAD_ANIMATION_MESSAGE: &str = "Error processing animation data";
pub const TRANSLATE_OK_MESSAGE: &str = "Translation successful!";

/// One submitted translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateTicket {
    pub generation: Generation,
    pub text: String,
}

/// Whether a completion was applied or discarded as stale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T = ()> {
    Applied(T),
    Stale,
}

impl<T> Completion<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Completion::Stale)
    }
}

/// What an applied translation did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationOutcome {
    /// Sequence loaded (possibly empty)
    Loaded { frames: usize, skipped_joints: usize },
    /// Text kept, animation cleared
    MalformedFrames,
    /// Text and animation cleared
    Failed,
}

#[derive(Debug, Default)]
pub struct TranslationDesk {
    input: String,
    translation: Option<String>,
    facial_expression: Option<String>,
    hand_movement: Option<HandMovement>,
    loading: bool,
    has_translated: bool,
    generations: GenerationCounter,
    notices: Vec<Notice>,
}

impl TranslationDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn facial_expression(&self) -> Option<&str> {
        self.facial_expression.as_deref()
    }

    pub fn hand_movement(&self) -> Option<&HandMovement> {
        self.hand_movement.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_translated(&self) -> bool {
        self.has_translated
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Validate the input and issue a ticket for a new request. Blank input
    /// posts a warning and sends nothing.
    pub fn submit(&mut self) -> SignaResult<TranslateTicket> {
        if self.input.trim().is_empty() {
            self.notices.push(Notice::warning(EMPTY_INPUT_MESSAGE));
            return Err(SignaError::EmptyInput);
        }

        let generation = self.generations.advance();
        self.loading = true;
        self.has_translated = true;
        tracing::info!(%generation, "Translation requested");

        Ok(TranslateTicket {
            generation,
            text: self.input.clone(),
        })
    }

    /// Apply the response for `generation`.
    pub fn complete(
        &mut self,
        generation: Generation,
        result: SignaResult<TranslationResponse>,
        session: &mut PlayerSession,
    ) -> Completion<TranslationOutcome> {
        if !self.generations.is_current(generation) {
            tracing::debug!(
                %generation,
                current = %self.generations.current(),
                "Discarding stale translation response"
            );
            return Completion::Stale;
        }
        self.loading = false;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "Translation failed");
                self.translation = None;
                self.facial_expression = None;
                self.hand_movement = None;
                session.clear_sequence();
                self.notices.push(Notice::error(TRANSLATE_FAILED_MESSAGE));
                return Completion::Applied(TranslationOutcome::Failed);
            }
        };

        self.translation = response.sign_grammar_text.clone();
        self.facial_expression = response.facial_expression.clone();
        self.hand_movement = response.hand_movement.clone();

        match response.frames() {
            Ok(parsed) => {
                let frames = parsed.sequence.len();
                if frames == 0 {
                    tracing::warn!("No animation frames in translation response");
                } else {
                    tracing::info!(
                        frames,
                        joints = parsed.sequence.joint_count(),
                        skipped = parsed.skipped_joints,
                        "Animation frames loaded"
                    );
                }
                session.load_sequence(parsed.sequence);
                self.notices.push(Notice::success(TRANSLATE_OK_MESSAGE));
                Completion::Applied(TranslationOutcome::Loaded {
                    frames,
                    skipped_joints: parsed.skipped_joints,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Error parsing animation frames");
                session.clear_sequence();
                self.notices.push(Notice::error(BAD_ANIMATION_MESSAGE));
                Completion::Applied(TranslationOutcome::MalformedFrames)
            }
        }
    }
}
