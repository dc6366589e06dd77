//! Draw session: idle → drawing → revealed → bookkeeping

use tokio::sync::{broadcast, mpsc};

use td_core::{Color, TdError, TdResult, TicketId};
use td_pool::{PoolGroup, RangeSpec, Selector, available_tickets, pool_counts};
use td_reveal::{RevealEvent, RevealEventKind, RevealState, RevealTimeline};

use crate::config::SessionConfig;
use crate::history::WinningList;

/// Fire-and-forget cue for the sound/animation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationCue {
    /// Draw started (spinning wheel sound)
    WheelSpin,
    /// Winner revealed (fanfare + confetti)
    Fanfare,
}

/// What the presentation layer hears about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DrawStarted { ticket: TicketId },
    Settling { ticket: TicketId },
    Revealed { ticket: TicketId, total_won: usize },
    OverlayCleared { color: Color },
    Reset,
}

impl SessionEvent {
    pub fn cue(&self) -> Option<PresentationCue> {
        match self {
            SessionEvent::DrawStarted { .. } => Some(PresentationCue::WheelSpin),
            SessionEvent::Revealed { .. } => Some(PresentationCue::Fanfare),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlightDraw {
    generation: u64,
    ticket: TicketId,
}

/// Single owner of draw state.
///
/// Overlapping draws are rejected with [`TdError::DrawInFlight`], never queued.
/// Reveal timers run on the caller's tokio runtime; drive them with
/// [`DrawSession::next_event`] or [`DrawSession::finish_draw`].
///
/// Pumping is required: a draw only lands in the win list when its `Revealed`
/// transition is applied by one of those two. Transitions queued for a draw that
/// is superseded are discarded by the next [`DrawSession::draw`] or
/// [`DrawSession::reset`].
pub struct DrawSession {
    ranges: RangeSpec,
    won: WinningList,
    selector: Selector,
    timeline: RevealTimeline,
    reveal_rx: mpsc::UnboundedReceiver<RevealEvent>,
    in_flight: Option<InFlightDraw>,
    continuity_color: Option<Color>,
    confetti_pending: bool,
    notify: broadcast::Sender<SessionEvent>,
}

impl DrawSession {
    pub fn new(config: SessionConfig) -> Self {
        let (reveal_tx, reveal_rx) = mpsc::unbounded_channel();
        // Display cycling runs on its own stream, separate from winner picks
        let mut selector = Selector::new(config.seed);
        let timeline = RevealTimeline::new(config.reveal_timing(), reveal_tx)
            .with_seed(selector.derive_seed());
        let (notify, _) = broadcast::channel(64);

        Self {
            ranges: config.ranges,
            won: WinningList::new(),
            selector,
            timeline,
            reveal_rx,
            in_flight: None,
            continuity_color: None,
            confetti_pending: false,
            notify,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn ranges(&self) -> &RangeSpec {
        &self.ranges
    }

    /// Replace the sold ranges as a whole
    pub fn set_ranges(&mut self, ranges: RangeSpec) {
        self.ranges = ranges;
        log::debug!("[Session] ranges updated, {} ticket(s) available", self.available_count());
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // POOL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Drawable tickets, recomputed from ranges and win list
    pub fn available_tickets(&self) -> Vec<TicketId> {
        available_tickets(&self.ranges, self.won.tickets())
    }

    pub fn available_count(&self) -> usize {
        self.available_tickets().len()
    }

    pub fn pool_counts(&self) -> Vec<PoolGroup> {
        pool_counts(&self.ranges, self.won.tickets())
    }

    /// Whether the draw control should be enabled
    pub fn can_draw(&self) -> bool {
        !self.is_drawing() && self.available_count() > 0
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CONTROL
    // ═══════════════════════════════════════════════════════════════════════════

    /// Pick a winner and start its reveal.
    ///
    /// The ticket joins the win list only once its reveal settles. Fails with
    /// [`TdError::DrawInFlight`] while a reveal is running and with
    /// [`TdError::NoTicketsAvailable`] when nothing is left; neither changes
    /// any state.
    pub fn draw(&mut self) -> TdResult<TicketId> {
        if let Some(current) = self.in_flight {
            log::warn!("[Session] draw rejected, {} is still being revealed", current.ticket);
            return Err(TdError::DrawInFlight);
        }

        let pool = self.available_tickets();
        let ticket = self.selector.pick(&pool).map_err(|e| match e {
            TdError::EmptyPool => {
                log::warn!("[Session] draw rejected, no tickets available");
                TdError::NoTicketsAvailable
            }
            other => other,
        })?;

        self.discard_pending();
        self.timeline.start(Some(ticket), self.continuity_color);
        let generation = self.timeline.generation();
        self.in_flight = Some(InFlightDraw { generation, ticket });
        log::info!("[Session] drawing from {} ticket(s): {}", pool.len(), ticket);

        self.publish(SessionEvent::DrawStarted { ticket });
        Ok(ticket)
    }

    /// Clear the win list and cancel any running reveal
    pub fn reset(&mut self) {
        self.timeline.reset();
        self.discard_pending();
        self.won.clear();
        self.in_flight = None;
        self.confetti_pending = false;
        log::info!("[Session] reset");
        self.publish(SessionEvent::Reset);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENT PUMP
    // ═══════════════════════════════════════════════════════════════════════════

    /// Wait for the next timeline transition of the live draw and apply it
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        loop {
            let event = self.reveal_rx.recv().await?;
            if let Some(session_event) = self.apply(event) {
                return Some(session_event);
            }
        }
    }

    /// Pump events until the in-flight draw is revealed.
    ///
    /// Returns `None` right away when nothing is in flight.
    pub async fn finish_draw(&mut self) -> Option<TicketId> {
        if self.in_flight.is_none() {
            return None;
        }
        while let Some(event) = self.next_event().await {
            if let SessionEvent::Revealed { ticket, .. } = event {
                return Some(ticket);
            }
        }
        None
    }

    fn apply(&mut self, event: RevealEvent) -> Option<SessionEvent> {
        if event.generation != self.timeline.generation() {
            log::debug!("[Session] ignoring stale {:?} from #{}", event.kind, event.generation);
            return None;
        }

        let session_event = match event.kind {
            // Announced synchronously by draw()
            RevealEventKind::Started => return None,
            RevealEventKind::Settling => SessionEvent::Settling {
                ticket: event.ticket,
            },
            RevealEventKind::Revealed => {
                let draw = self
                    .in_flight
                    .filter(|draw| draw.generation == event.generation)?;
                self.in_flight = None;
                self.won.push(draw.ticket);
                self.continuity_color = Some(draw.ticket.color());
                self.confetti_pending = true;
                log::info!(
                    "[Session] winner {} after {}ms ({} drawn)",
                    draw.ticket,
                    event.elapsed_ms,
                    self.won.len()
                );
                SessionEvent::Revealed {
                    ticket: draw.ticket,
                    total_won: self.won.len(),
                }
            }
            RevealEventKind::OverlayCleared => SessionEvent::OverlayCleared {
                color: event.color(),
            },
        };

        self.publish(session_event.clone());
        Some(session_event)
    }

    /// Drop queued transitions; every one of them belongs to a superseded draw
    fn discard_pending(&mut self) {
        let mut discarded = 0;
        while self.reveal_rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            log::debug!("[Session] discarded {} stale reveal event(s)", discarded);
        }
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.notify.send(event);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // PRESENTATION
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn is_drawing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn reveal_snapshot(&self) -> RevealState {
        self.timeline.snapshot()
    }

    pub fn won_tickets(&self) -> &WinningList {
        &self.won
    }

    /// Color the next draw's cycling starts from
    pub fn continuity_color(&self) -> Option<Color> {
        self.continuity_color
    }

    pub fn confetti_pending(&self) -> bool {
        self.confetti_pending
    }

    /// Consume the confetti trigger (the animation layer calls this when it starts)
    pub fn take_confetti(&mut self) -> bool {
        std::mem::take(&mut self.confetti_pending)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.notify.subscribe()
    }
}

impl std::fmt::Debug for DrawSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawSession")
            .field("won", &self.won.len())
            .field("in_flight", &self.in_flight)
            .field("continuity_color", &self.continuity_color)
            .field("timeline", &self.timeline)
            .finish()
    }
}
