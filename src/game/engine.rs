/// Game progression state machine.
///
/// Owns the current level and arbitrates the high score; draws nothing
/// itself. All rendering goes through the `View` trait, all persistence
/// through the `HighscoreStore` trait, so the engine can be driven by the
/// terminal UI or by a recording mock in tests.
///
/// Phases:
///
///   Idle ──start──▶ RoundActive ──hit──▶ RoundActive (level + 1)
///                        │
///                      miss
///                        ▼
///                   Revealing ──reveal done──▶ RoundActive (level 0)
///
/// There is no terminal phase; the game loops until the process exits.
/// While `Revealing`, hit/miss activations are ignored: a reveal is
/// scheduled at most once and no second round can become active until its
/// delay has elapsed.

use std::io;

use crate::config::RulesConfig;
use crate::game::color::Color;
use crate::game::curve;
use crate::store::HighscoreStore;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    RoundActive,
    Revealing,
}

/// How the view classified an activated box.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Activation {
    Target,
    Decoy,
}

/// The abstract rendering surface the engine draws rounds on.
///
/// `add_boxes` must render `count` boxes of `base`, exactly one of them
/// (chosen by the view) with `base.deviated(deviation)` and flagged as the
/// target. `begin_reveal` starts the decoy fade; the engine then calls
/// `tick_reveal` once per frame until `reveal_finished` reports true.
pub trait View {
    fn clear_boxes(&mut self) -> io::Result<()>;
    fn add_boxes(&mut self, count: usize, base: Color, deviation: u8) -> io::Result<()>;
    fn set_score(&mut self, level: u32, highscore: u32) -> io::Result<()>;
    fn begin_reveal(&mut self) -> io::Result<()>;
    fn tick_reveal(&mut self) -> io::Result<()>;
    fn reveal_finished(&self) -> bool;
}

pub struct GameEngine<S: HighscoreStore> {
    rules: RulesConfig,
    store: S,
    phase: Phase,
    level: u32,
}

impl<S: HighscoreStore> GameEngine<S> {
    pub fn new(rules: RulesConfig, store: S) -> Self {
        GameEngine {
            rules,
            store,
            phase: Phase::Idle,
            level: 0,
        }
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Best level ever reached, from the store. Absent or unreadable → 0.
    pub fn highscore(&self) -> u32 {
        self.store.get(&self.rules.highscore_key).unwrap_or(0)
    }

    /// Begin a new session: level 0, default box count and deviation.
    pub fn start<V: View>(&mut self, view: &mut V) -> io::Result<()> {
        self.save_highscore();
        self.level = 0;
        self.phase = Phase::RoundActive;
        self.render_round(view, self.rules.default_box_count, self.rules.default_deviation)
    }

    /// The player clicked the target: advance one level and build the next,
    /// harder round. Ignored unless a round is active.
    pub fn on_target_hit<V: View>(&mut self, view: &mut V) -> io::Result<()> {
        if self.phase != Phase::RoundActive {
            return Ok(());
        }
        self.level += 1;
        let count = curve::box_count(&self.rules, self.level);
        let deviation = curve::deviation(&self.rules, self.level);
        self.render_round(view, count, deviation)
    }

    /// The player clicked a decoy: persist the high score if beaten, then
    /// have the view reveal the target. Ignored unless a round is active.
    pub fn on_target_missed<V: View>(&mut self, view: &mut V) -> io::Result<()> {
        if self.phase != Phase::RoundActive {
            return Ok(());
        }
        self.save_highscore();
        self.phase = Phase::Revealing;
        view.begin_reveal()
    }

    /// Advance the reveal animation by one frame. Once the view reports the
    /// reveal finished, a fresh session begins at level 0.
    pub fn tick<V: View>(&mut self, view: &mut V) -> io::Result<()> {
        if self.phase != Phase::Revealing {
            return Ok(());
        }
        view.tick_reveal()?;
        if view.reveal_finished() {
            self.start(view)?;
        }
        Ok(())
    }

    fn render_round<V: View>(
        &mut self,
        view: &mut V,
        count: usize,
        deviation: u8,
    ) -> io::Result<()> {
        let base = Color::random(&mut rand::thread_rng());
        view.clear_boxes()?;
        view.set_score(self.level, self.highscore())?;
        view.add_boxes(count, base, deviation)
    }

    /// Persist the current level iff it beats the stored best. Write
    /// failures degrade silently inside the store; the round never aborts.
    fn save_highscore(&mut self) {
        let stored = self.store.get(&self.rules.highscore_key).unwrap_or(0);
        if self.level > stored {
            self.store.set(&self.rules.highscore_key, self.level);
        }
    }
}
