//! Reveal timeline: the timed state machine behind a draw
//!
//! One instance is live at a time. Every timer of an instance is a task in the
//! timeline's [`JoinSet`]; superseding the instance aborts the whole set before
//! any new state is written.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};

use td_core::{Color, MAX_TICKET_NUMBER, MIN_TICKET_NUMBER, TicketId, Variant};

use crate::event::{RevealEvent, RevealEventKind};
use crate::state::{RevealPhase, RevealState};
use crate::timing::RevealTiming;

/// Timed, cancellable reveal state machine.
///
/// Effects run as tokio tasks on the caller's runtime, so [`RevealTimeline::start`]
/// must be called from within one. Dropping the timeline aborts every pending
/// task of the live instance.
pub struct RevealTimeline {
    timing: RevealTiming,
    state: Arc<Mutex<RevealState>>,
    tasks: JoinSet<()>,
    events: mpsc::UnboundedSender<RevealEvent>,
    seeds: ChaCha8Rng,
    generation: u64,
}

impl RevealTimeline {
    /// Create an idle timeline reporting transitions on `events`
    pub fn new(timing: RevealTiming, events: mpsc::UnboundedSender<RevealEvent>) -> Self {
        Self {
            timing: timing.sanitized(),
            state: Arc::new(Mutex::new(RevealState::idle(0))),
            tasks: JoinSet::new(),
            events,
            seeds: ChaCha8Rng::from_os_rng(),
            generation: 0,
        }
    }

    /// Seed the display cycling for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seeds = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    /// Takes effect on the next start
    pub fn set_timing(&mut self, timing: RevealTiming) {
        self.timing = timing.sanitized();
    }

    /// Copy of the current display state
    pub fn snapshot(&self) -> RevealState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> RevealPhase {
        self.state.lock().phase
    }

    /// Generation of the live instance (0 before the first start)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONTROL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Begin revealing `target`, cycling colors from `continuity`.
    ///
    /// Cancels the previous instance first. Without a target the timeline
    /// returns to a blank idle display and `None` is returned; otherwise the
    /// new instance's generation.
    pub fn start(&mut self, target: Option<TicketId>, continuity: Option<Color>) -> Option<u64> {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let Some(ticket) = target else {
            *self.state.lock() = RevealState::idle(generation);
            return None;
        };

        *self.state.lock() = RevealState::cycling(generation, ticket, continuity);
        log::info!("[Reveal] #{} started for {}", generation, ticket);

        let started = Instant::now();
        send_event(
            &self.events,
            RevealEvent::new(RevealEventKind::Started, generation, ticket, 0),
        );

        let seed = self.seeds.random();
        let number_cycler = self.spawn_number_cycler(generation, seed);
        let color_cycler = self.spawn_color_cycler(generation);
        self.spawn_settle_sequence(generation, ticket, started, [number_cycler, color_cycler]);

        Some(generation)
    }

    /// Hard reset: cancel everything and go back to a blank idle display
    pub fn reset(&mut self) {
        self.cancel();
        self.generation += 1;
        *self.state.lock() = RevealState::idle(self.generation);
        log::debug!("[Reveal] reset to idle (#{})", self.generation);
    }

    fn cancel(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("[Reveal] cancelling {} task(s) of #{}", self.tasks.len(), self.generation);
        }
        self.tasks.abort_all();
        self.tasks = JoinSet::new();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EFFECTS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Random number plus variant toggle on every tick
    fn spawn_number_cycler(&mut self, generation: u64, seed: u64) -> AbortHandle {
        let state = Arc::clone(&self.state);
        let period = self.timing.number_interval();

        self.tasks.spawn(async move {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let number = rng.random_range(MIN_TICKET_NUMBER..=MAX_TICKET_NUMBER);
                let still_cycling = update_if_cycling(&state, generation, |s| {
                    s.displayed_number = Some(number);
                    s.displayed_variant =
                        Some(s.displayed_variant.unwrap_or(Variant::A).toggled());
                });
                if !still_cycling {
                    break;
                }
            }
        })
    }

    /// Overlay advances through the color sequence after a short delay
    fn spawn_color_cycler(&mut self, generation: u64) -> AbortHandle {
        let state = Arc::clone(&self.state);
        let delay = self.timing.color_start_delay();
        let period = self.timing.color_interval();

        self.tasks.spawn(async move {
            time::sleep(delay).await;
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let still_cycling = update_if_cycling(&state, generation, |s| {
                    s.overlay_color = Some(s.overlay_color.unwrap_or_default().next());
                });
                if !still_cycling {
                    break;
                }
            }
        })
    }

    /// Cycling → Settling → Revealed → overlay cleared
    fn spawn_settle_sequence(
        &mut self,
        generation: u64,
        ticket: TicketId,
        started: Instant,
        cyclers: [AbortHandle; 2],
    ) {
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let settle_at = started + self.timing.cycle_duration();
        let reveal_at = settle_at + self.timing.settle_delay();
        let fade_out = self.timing.fade_out();

        self.tasks.spawn(async move {
            let emit = |kind: RevealEventKind| {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                send_event(&events, RevealEvent::new(kind, generation, ticket, elapsed_ms));
            };

            time::sleep_until(settle_at).await;
            for cycler in &cyclers {
                cycler.abort();
            }
            let settled = update_if_live(&state, generation, |s| {
                s.phase = RevealPhase::Settling;
                s.displayed_number = Some(ticket.number());
                s.displayed_variant = Some(ticket.variant());
                s.overlay_color = Some(ticket.color());
            });
            if !settled {
                return;
            }
            emit(RevealEventKind::Settling);

            time::sleep_until(reveal_at).await;
            if !update_if_live(&state, generation, |s| {
                s.phase = RevealPhase::Revealed;
                s.background_color = Some(ticket.color());
            }) {
                return;
            }
            log::info!("[Reveal] #{} revealed {}", generation, ticket);
            emit(RevealEventKind::Revealed);

            time::sleep(fade_out).await;
            if update_if_live(&state, generation, |s| s.overlay_color = None) {
                emit(RevealEventKind::OverlayCleared);
            }
        });
    }
}

impl std::fmt::Debug for RevealTimeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealTimeline")
            .field("timing", &self.timing)
            .field("generation", &self.generation)
            .field("pending_tasks", &self.tasks.len())
            .finish()
    }
}

/// Report a transition; a missing listener never stops the timeline
fn send_event(events: &mpsc::UnboundedSender<RevealEvent>, event: RevealEvent) -> bool {
    let delivered = events.send(event).is_ok();
    if !delivered {
        log::trace!("[Reveal] no listener for {:?} of #{}", event.kind, event.generation);
    }
    delivered
}

/// Apply `f` only while `generation` is the live instance.
///
/// An aborted task may still be mid-poll on another worker; the check under
/// the lock keeps it from touching a newer draw.
fn update_if_live(
    state: &Mutex<RevealState>,
    generation: u64,
    f: impl FnOnce(&mut RevealState),
) -> bool {
    let mut s = state.lock();
    if s.generation != generation {
        return false;
    }
    f(&mut s);
    true
}

/// Like [`update_if_live`], and additionally only during the cycling phase
fn update_if_cycling(
    state: &Mutex<RevealState>,
    generation: u64,
    f: impl FnOnce(&mut RevealState),
) -> bool {
    let mut s = state.lock();
    if s.generation != generation || s.phase != RevealPhase::Cycling {
        return false;
    }
    f(&mut s);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn ticket(color: Color, variant: Variant, number: u8) -> TicketId {
        TicketId::new(color, variant, number).unwrap()
    }

    fn timeline() -> (RevealTimeline, UnboundedReceiver<RevealEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RevealTimeline::new(RevealTiming::normal(), tx).with_seed(7), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<RevealEvent>) -> Vec<RevealEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    async fn wait_ms(ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_sequence() {
        let (mut timeline, mut rx) = timeline();
        let target = ticket(Color::Green, Variant::B, 42);

        assert_eq!(timeline.start(Some(target), None), Some(1));
        let s = timeline.snapshot();
        assert_eq!(s.phase, RevealPhase::Cycling);
        assert_eq!(s.target, Some(target));
        assert_eq!(s.overlay_color, Some(Color::Red));
        assert_eq!(s.displayed_number, None);

        wait_ms(500).await;
        let s = timeline.snapshot();
        assert_eq!(s.phase, RevealPhase::Cycling);
        let n = s.displayed_number.expect("number cycling");
        assert!((1..=100).contains(&n));
        assert!(s.displayed_variant.is_some());
        assert_eq!(s.overlay_color, Some(Color::Red));

        // First color step lands at 50 + 900ms
        wait_ms(500).await;
        assert_eq!(timeline.snapshot().overlay_color, Some(Color::Blue));

        // 2050ms: frozen on the target
        wait_ms(1050).await;
        let s = timeline.snapshot();
        assert_eq!(s.phase, RevealPhase::Settling);
        assert_eq!(s.displayed_number, Some(42));
        assert_eq!(s.displayed_variant, Some(Variant::B));
        assert_eq!(s.overlay_color, Some(Color::Green));
        assert_eq!(s.background_color, None);

        // 2150ms: revealed, overlay still fading
        wait_ms(100).await;
        let s = timeline.snapshot();
        assert_eq!(s.phase, RevealPhase::Revealed);
        assert_eq!(s.background_color, Some(Color::Green));
        assert_eq!(s.overlay_color, Some(Color::Green));

        // 2800ms: overlay gone
        wait_ms(650).await;
        let s = timeline.snapshot();
        assert_eq!(s.overlay_color, None);
        assert_eq!(s.visible_color(), Some(Color::Green));
        assert_eq!(s.number_label(), "42");

        let events = drain(&mut rx);
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RevealEventKind::Started,
                RevealEventKind::Settling,
                RevealEventKind::Revealed,
                RevealEventKind::OverlayCleared,
            ]
        );
        assert!(events.iter().all(|e| e.generation == 1 && e.ticket == target));
        assert!((2100..2110).contains(&events[2].elapsed_ms));
        assert!((2700..2710).contains(&events[3].elapsed_ms));
    }

    #[tokio::test(start_paused = true)]
    async fn test_variant_toggles_each_tick() {
        let (mut timeline, _rx) = timeline();
        timeline.start(Some(ticket(Color::Red, Variant::A, 1)), None);

        wait_ms(75).await;
        assert_eq!(timeline.snapshot().displayed_variant, Some(Variant::B));
        wait_ms(70).await;
        assert_eq!(timeline.snapshot().displayed_variant, Some(Variant::A));
        wait_ms(70).await;
        assert_eq!(timeline.snapshot().displayed_variant, Some(Variant::B));
    }

    #[tokio::test(start_paused = true)]
    async fn test_color_cycle_continues_from_previous_draw() {
        let (mut timeline, _rx) = timeline();
        timeline.start(Some(ticket(Color::Red, Variant::A, 1)), Some(Color::Yellow));
        assert_eq!(timeline.snapshot().overlay_color, Some(Color::Yellow));

        wait_ms(1000).await;
        assert_eq!(timeline.snapshot().overlay_color, Some(Color::White));

        // Second step at 1850ms wraps to the start of the sequence
        wait_ms(900).await;
        assert_eq!(timeline.snapshot().overlay_color, Some(Color::Red));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_yields_single_terminal_event() {
        let (mut timeline, mut rx) = timeline();
        let first = ticket(Color::Blue, Variant::A, 10);
        let second = ticket(Color::White, Variant::B, 20);

        timeline.start(Some(first), None);
        wait_ms(1000).await;
        assert_eq!(timeline.start(Some(second), None), Some(2));
        assert_eq!(timeline.snapshot().target, Some(second));

        wait_ms(5000).await;
        let revealed: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(RevealEvent::is_terminal)
            .collect();
        assert_eq!(revealed.len(), 1);
        assert_eq!(revealed[0].ticket, second);
        assert_eq!(revealed[0].generation, 2);
        assert_eq!(timeline.snapshot().background_color, Some(Color::White));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_during_settling() {
        let (mut timeline, mut rx) = timeline();
        timeline.start(Some(ticket(Color::Blue, Variant::A, 10)), None);
        wait_ms(2050).await;
        assert_eq!(timeline.phase(), RevealPhase::Settling);

        timeline.start(Some(ticket(Color::Red, Variant::B, 3)), Some(Color::Blue));
        wait_ms(5000).await;

        let terminal: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(RevealEvent::is_terminal)
            .collect();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_during_cycling() {
        let (mut timeline, mut rx) = timeline();
        timeline.start(Some(ticket(Color::Green, Variant::A, 5)), None);
        wait_ms(500).await;

        timeline.reset();
        let s = timeline.snapshot();
        assert_eq!(s.phase, RevealPhase::Idle);
        assert_eq!(s.target, None);
        assert_eq!(s.displayed_number, None);
        assert_eq!(s.overlay_color, None);

        wait_ms(5000).await;
        assert!(!drain(&mut rx).iter().any(RevealEvent::is_terminal));
        assert_eq!(timeline.phase(), RevealPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_without_target_is_idle() {
        let (mut timeline, mut rx) = timeline();
        timeline.start(Some(ticket(Color::Green, Variant::A, 5)), None);
        wait_ms(300).await;

        assert_eq!(timeline.start(None, Some(Color::Red)), None);
        assert_eq!(timeline.snapshot(), RevealState::idle(2));

        wait_ms(5000).await;
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RevealEventKind::Started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timers() {
        let (mut timeline, mut rx) = timeline();
        timeline.start(Some(ticket(Color::Yellow, Variant::A, 9)), None);
        wait_ms(500).await;
        drop(timeline);

        let mut events = Vec::new();
        while let Ok(Some(event)) = time::timeout(Duration::from_secs(10), rx.recv()).await {
            events.push(event);
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, RevealEventKind::Started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turbo_timing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timeline = RevealTimeline::new(RevealTiming::turbo(), tx).with_seed(1);
        timeline.start(Some(ticket(Color::White, Variant::A, 100)), None);

        wait_ms(1100).await;
        assert_eq!(timeline.phase(), RevealPhase::Revealed);
        let revealed = drain(&mut rx)
            .into_iter()
            .find(RevealEvent::is_terminal)
            .expect("revealed");
        assert!((1050..1060).contains(&revealed.elapsed_ms));
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_to_completion_without_listener() {
        let (mut timeline, rx) = timeline();
        drop(rx);
        let target = ticket(Color::Blue, Variant::A, 3);

        assert_eq!(timeline.start(Some(target), None), Some(1));
        wait_ms(2100).await;
        let s = timeline.snapshot();
        assert_eq!(s.phase, RevealPhase::Revealed);
        assert_eq!(s.background_color, Some(Color::Blue));

        wait_ms(600).await;
        assert_eq!(timeline.snapshot().overlay_color, None);
    }

    #[test]
    fn test_send_event_reports_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let event = RevealEvent::new(
            RevealEventKind::Started,
            4,
            ticket(Color::Red, Variant::B, 1),
            0,
        );

        assert!(send_event(&tx, event));
        assert_eq!(rx.try_recv().ok(), Some(event));

        drop(rx);
        assert!(!send_event(&tx, event));
    }
}
