//! Status line animations
//!
//! Each status text is revealed one character at a time, held, then
//! retracted. In-progress kinds (fetching, pushing, pulling) stay in the
//! visible phase until [`SyncAnimation::finish`] releases them, and then
//! hand over to their completion kind once retracted.

/// Spinner glyphs shown while an in-progress text is fully visible
pub const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// What the status line is announcing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncKind {
    #[default]
    Idle,
    Fetching,
    Pushing,
    Pulling,
    Synced,
    Pushed,
    Pulled,
}

/// Phase of the current text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Appearing,
    Visible,
    Disappearing,
}

/// Per-kind timing, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    /// Ticks per revealed or retracted character
    pub step: u32,
    /// Minimum ticks spent fully visible
    pub hold: u32,
    /// Stay visible until released by the operation finishing
    pub wait_for_release: bool,
}

impl SyncKind {
    pub fn text(self) -> &'static str {
        match self {
            SyncKind::Idle => "",
            SyncKind::Fetching => "Fetching",
            SyncKind::Pushing => "Pushing",
            SyncKind::Pulling => "Pulling",
            SyncKind::Synced => "Synced!",
            SyncKind::Pushed => "Pushed!",
            SyncKind::Pulled => "Pulled!",
        }
    }

    pub fn cadence(self) -> Cadence {
        let (step, hold, wait_for_release) = match self {
            SyncKind::Idle => (1, 0, false),
            SyncKind::Fetching => (2, 48, true),
            SyncKind::Pushing => (1, 0, true),
            SyncKind::Pulling => (2, 24, true),
            SyncKind::Synced => (2, 60, false),
            SyncKind::Pushed => (1, 100, false),
            SyncKind::Pulled => (2, 40, false),
        };
        Cadence {
            step,
            hold,
            wait_for_release,
        }
    }

    /// Kind shown after this one retracts
    pub fn successor(self) -> SyncKind {
        match self {
            SyncKind::Fetching => SyncKind::Synced,
            SyncKind::Pushing => SyncKind::Pushed,
            SyncKind::Pulling => SyncKind::Pulled,
            _ => SyncKind::Idle,
        }
    }

    /// Fetching, pushing or pulling
    pub fn in_progress(self) -> bool {
        matches!(self, SyncKind::Fetching | SyncKind::Pushing | SyncKind::Pulling)
    }
}

/// Animation state carried in `AppState`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncAnimation {
    kind: SyncKind,
    phase: Phase,
    revealed: usize,
    frame: u32,
    released: bool,
    spinner: usize,
}

impl SyncAnimation {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> SyncKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_idle(&self) -> bool {
        self.kind == SyncKind::Idle
    }

    /// Begin announcing `kind` from an empty string
    pub fn start(&mut self, kind: SyncKind) {
        *self = Self {
            kind,
            spinner: self.spinner,
            ..Self::default()
        };
    }

    /// Let an in-progress text leave its visible phase
    pub fn finish(&mut self) {
        if self.kind.in_progress() {
            self.released = true;
        }
    }

    /// Drop straight to idle (failed operation)
    pub fn reset(&mut self) {
        self.start(SyncKind::Idle);
    }

    /// Advance one tick
    pub fn tick(&mut self) {
        if self.kind == SyncKind::Idle {
            return;
        }
        self.spinner = (self.spinner + 1) % SPINNER.len();
        self.frame += 1;

        let cadence = self.kind.cadence();
        let full = self.kind.text().chars().count();

        match self.phase {
            Phase::Appearing => {
                if self.frame % cadence.step == 0 {
                    self.revealed = (self.revealed + 1).min(full);
                }
                if self.revealed >= full {
                    self.enter(Phase::Visible);
                }
            }
            Phase::Visible => {
                let held = self.frame >= cadence.hold;
                if held && (!cadence.wait_for_release || self.released) {
                    self.enter(Phase::Disappearing);
                }
            }
            Phase::Disappearing => {
                if self.frame % cadence.step == 0 {
                    self.revealed = self.revealed.saturating_sub(1);
                }
                if self.revealed == 0 {
                    self.start(self.kind.successor());
                }
            }
        }
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.frame = 0;
    }

    /// Text to draw this frame, spinner included
    pub fn display_text(&self) -> String {
        if self.kind == SyncKind::Idle {
            return String::new();
        }
        let partial: String = self.kind.text().chars().take(self.revealed).collect();
        if self.phase == Phase::Visible && self.kind.in_progress() && !partial.is_empty() {
            format!("{} {}", partial, SPINNER[self.spinner])
        } else {
            partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_until_idle(anim: &mut SyncAnimation, limit: usize) -> Vec<SyncKind> {
        let mut kinds = vec![anim.kind()];
        for _ in 0..limit {
            anim.finish();
            anim.tick();
            if kinds.last() != Some(&anim.kind()) {
                kinds.push(anim.kind());
            }
            if anim.is_idle() {
                break;
            }
        }
        kinds
    }

    #[test]
    fn test_fetching_hands_over_to_synced() {
        let mut anim = SyncAnimation::idle();
        anim.start(SyncKind::Fetching);
        let kinds = run_until_idle(&mut anim, 10_000);
        assert_eq!(kinds, vec![SyncKind::Fetching, SyncKind::Synced, SyncKind::Idle]);
    }

    #[test]
    fn test_pushing_holds_until_released() {
        let mut anim = SyncAnimation::idle();
        anim.start(SyncKind::Pushing);
        for _ in 0..500 {
            anim.tick();
        }
        assert_eq!(anim.kind(), SyncKind::Pushing);
        assert_eq!(anim.phase(), Phase::Visible);
        assert!(anim.display_text().starts_with("Pushing "));

        anim.finish();
        let kinds = run_until_idle(&mut anim, 10_000);
        assert_eq!(kinds, vec![SyncKind::Pushing, SyncKind::Pushed, SyncKind::Idle]);
    }

    #[test]
    fn test_reset_short_circuits_to_idle() {
        let mut anim = SyncAnimation::idle();
        anim.start(SyncKind::Pulling);
        anim.tick();
        anim.reset();
        assert!(anim.is_idle());
        assert_eq!(anim.display_text(), "");
    }

    #[test]
    fn test_completion_text_has_no_spinner() {
        let mut anim = SyncAnimation::idle();
        anim.start(SyncKind::Synced);
        while anim.phase() != Phase::Visible {
            anim.tick();
        }
        assert_eq!(anim.display_text(), "Synced!");
    }

    fn arb_kind() -> impl Strategy<Value = SyncKind> {
        prop_oneof![
            Just(SyncKind::Fetching),
            Just(SyncKind::Pushing),
            Just(SyncKind::Pulling),
            Just(SyncKind::Synced),
            Just(SyncKind::Pushed),
            Just(SyncKind::Pulled),
        ]
    }

    proptest! {
        #[test]
        fn prop_reveal_count_is_monotonic_per_phase(kind in arb_kind(), release_after in 0usize..400) {
            let mut anim = SyncAnimation::idle();
            anim.start(kind);

            let mut prev_kind = anim.kind();
            let mut prev_phase = anim.phase();
            let mut prev_revealed = anim.revealed();

            for tick in 0..5_000 {
                if tick >= release_after {
                    anim.finish();
                }
                anim.tick();

                let full = prev_kind.text().chars().count();
                if anim.kind() == prev_kind && anim.phase() == prev_phase {
                    match prev_phase {
                        Phase::Appearing => prop_assert!(anim.revealed() >= prev_revealed),
                        Phase::Disappearing => prop_assert!(anim.revealed() <= prev_revealed),
                        Phase::Visible => prop_assert_eq!(anim.revealed(), full),
                    }
                } else if anim.kind() == prev_kind {
                    // phase change within a kind
                    match prev_phase {
                        Phase::Appearing => prop_assert_eq!(anim.revealed(), full),
                        Phase::Visible => prop_assert_eq!(prev_revealed, full),
                        Phase::Disappearing => prop_assert!(false, "disappearing must end the kind"),
                    }
                } else {
                    // kind change only happens once fully retracted
                    prop_assert_eq!(prev_phase, Phase::Disappearing);
                    prop_assert!(prev_revealed <= 1);
                    prop_assert_eq!(anim.revealed(), 0);
                    prop_assert_eq!(anim.kind(), prev_kind.successor());
                }

                prev_kind = anim.kind();
                prev_phase = anim.phase();
                prev_revealed = anim.revealed();
                if anim.is_idle() {
                    break;
                }
            }
            prop_assert!(anim.is_idle());
        }
    }
}
