//! # Console Presentation
//!
//! Log-backed presentation for the CLI, and a recording variant for tests
//! and replays.

use crate::{completed_task, Biome, DialogueTokens, Presentation, PresentationTask};
use log::info;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Formats a dialogue key together with its tokens for display.
///
/// # Examples
///
/// ```
/// use wavebound::{render_dialogue, DialogueTokens};
///
/// let mut tokens = DialogueTokens::new();
/// tokens.insert("price".to_string(), "1690".to_string());
/// assert_eq!(render_dialogue("machine.tooltip", &tokens), "machine.tooltip {price=1690}");
/// assert_eq!(render_dialogue("machine.intro", &DialogueTokens::new()), "machine.intro");
/// ```
pub fn render_dialogue(key: &str, tokens: &DialogueTokens) -> String {
    if tokens.is_empty() {
        return key.to_string();
    }
    let pairs: Vec<String> = tokens.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{} {{{}}}", key, pairs.join(", "))
}

fn sleep_task(duration: Duration) -> PresentationTask {
    Box::pin(async move {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    })
}

/// Writes dialogue and visual cues to the log, pacing them with timers.
#[derive(Debug, Clone)]
pub struct ConsolePresentation {
    /// How long each dialogue entry stays up
    pub text_delay: Duration,
    /// How long a biome slide takes
    pub animation_duration: Duration,
}

impl ConsolePresentation {
    /// Creates a console presentation with the given pacing.
    pub fn new(text_delay: Duration, animation_duration: Duration) -> Self {
        Self {
            text_delay,
            animation_duration,
        }
    }

    /// Presentation that never waits.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Presentation for ConsolePresentation {
    fn show_text(&self, key: &str, tokens: &DialogueTokens) -> PresentationTask {
        info!("[text] {}", render_dialogue(key, tokens));
        sleep_task(self.text_delay)
    }

    fn animate_biome_change(&self, from: Biome, to: Biome) -> PresentationTask {
        info!("[arena] {} -> {}", from, to);
        sleep_task(self.animation_duration)
    }

    fn transition_intro_visuals(&self, hide: bool) -> PresentationTask {
        info!("[intro] {}", if hide { "fade out" } else { "slide out" });
        sleep_task(self.animation_duration / 2)
    }

    fn play_bgm(&self, biome: Biome) -> PresentationTask {
        info!("[bgm] {}", biome);
        completed_task()
    }
}

/// Something a [`RecordingPresentation`] saw happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    /// A dialogue entry finished showing
    Text { key: String, tokens: DialogueTokens },
    /// The biome slide finished
    BiomeChanged { from: Biome, to: Biome },
    /// The intro sprites finished leaving
    IntroTransitioned { hide: bool },
    /// Music switched
    Bgm(Biome),
}

/// Presentation that records each cue as it completes.
///
/// Clones share the same log, so a test can keep one handle and pass
/// another to the encounter.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresentation {
    events: Arc<Mutex<Vec<PresentationEvent>>>,
    animation_delay: Duration,
}

impl RecordingPresentation {
    /// Creates a recorder whose animations finish immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder whose animations take `delay` to finish.
    pub fn with_animation_delay(delay: Duration) -> Self {
        Self {
            events: Arc::default(),
            animation_delay: delay,
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<PresentationEvent> {
        self.lock().clone()
    }

    /// Keys of the dialogue shown so far, in order.
    pub fn text_keys(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                PresentationEvent::Text { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PresentationEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_after(&self, delay: Duration, event: PresentationEvent) -> PresentationTask {
        let events = Arc::clone(&self.events);
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            events
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(event);
        })
    }
}

impl Presentation for RecordingPresentation {
    fn show_text(&self, key: &str, tokens: &DialogueTokens) -> PresentationTask {
        self.record_after(
            Duration::ZERO,
            PresentationEvent::Text {
                key: key.to_string(),
                tokens: tokens.clone(),
            },
        )
    }

    fn animate_biome_change(&self, from: Biome, to: Biome) -> PresentationTask {
        self.record_after(self.animation_delay, PresentationEvent::BiomeChanged { from, to })
    }

    fn transition_intro_visuals(&self, hide: bool) -> PresentationTask {
        self.record_after(self.animation_delay / 2, PresentationEvent::IntroTransitioned { hide })
    }

    fn play_bgm(&self, biome: Biome) -> PresentationTask {
        self.lock().push(PresentationEvent::Bgm(biome));
        completed_task()
    }
}
