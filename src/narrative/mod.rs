//! Narration of headline events.
//!
//! A `Narrator` turns one game event into flavor text. Narrators are
//! pluggable and allowed to fail (a remote text service, say); the engine
//! never waits on them and never lets them touch the state.
//! `narrate_or_fallback` swaps a failure for the deterministic
//! `CannedNarrator` text.

use thiserror::Error;
use tracing::warn;

use crate::board::Board;
use crate::core::{GameEvent, Variant};

/// Why a narrator produced no text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NarrativeError {
    #[error("narration service unavailable: {0}")]
    Unavailable(String),
    #[error("narration timed out")]
    TimedOut,
    #[error("event is not narrated")]
    Unsupported,
}

/// What a narrator may read.
#[derive(Clone, Copy, Debug)]
pub struct NarrativeContext<'a> {
    pub variant: Variant,
    pub board: &'a Board,
}

pub trait Narrator {
    /// Describe one event.
    fn narrate(&mut self, ctx: NarrativeContext<'_>, event: &GameEvent) -> Result<String, NarrativeError>;
}

/// True for the events worth a line of story: epidemics, cures,
/// outbreaks, eradications and the end of the game.
#[must_use]
pub fn is_headline(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::Epidemic { .. }
            | GameEvent::Cured { .. }
            | GameEvent::Outbreak { .. }
            | GameEvent::Eradicated { .. }
            | GameEvent::Victory
            | GameEvent::Defeat { .. }
    )
}

/// Deterministic text in the variant's vocabulary.
#[derive(Clone, Copy, Debug, Default)]
pub struct CannedNarrator;

impl Narrator for CannedNarrator {
    fn narrate(&mut self, ctx: NarrativeContext<'_>, event: &GameEvent) -> Result<String, NarrativeError> {
        let v = ctx.variant;
        let text = match event {
            GameEvent::Epidemic { city, color } => format!(
                "A {} strikes {}: the {} surges.",
                v.epidemic_word(),
                ctx.board.name(*city),
                color.label(v)
            ),
            GameEvent::Cured { color } => {
                format!("The {} of the {} is secured.", v.cure_word(), color.label(v))
            }
            GameEvent::Outbreak { city, color, total } => format!(
                "{} in {} as the {} spreads ({} so far).",
                capitalize(v.outbreak_word()),
                ctx.board.name(*city),
                color.label(v),
                total
            ),
            GameEvent::Eradicated { color } => {
                format!("The {} is gone from the board.", color.label(v))
            }
            GameEvent::Victory => "Victory: every threat has been answered.".to_string(),
            GameEvent::Defeat { reason } => format!("Defeat: {reason}."),
            _ => return Err(NarrativeError::Unsupported),
        };
        Ok(text)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Narrate `event`, falling back to canned text if `narrator` fails.
///
/// Returns `None` for events that are not headlines.
pub fn narrate_or_fallback(
    narrator: &mut dyn Narrator,
    ctx: NarrativeContext<'_>,
    event: &GameEvent,
) -> Option<String> {
    if !is_headline(event) {
        return None;
    }
    match narrator.narrate(ctx, event) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(%err, "Narrator failed; using canned text");
            CannedNarrator.narrate(ctx, event).ok()
        }
    }
}
