use std::cell::Cell;
use std::rc::Rc;
use crate::core::bus::{EventBus, Subscription};
use crate::core::engine::OutcomeSink;
use crate::models::{Action, Candidate, CardOutcome, RoutedEvent};

/// Ordered candidates plus the cursor of the next undecided one
///
/// `handle_action` never moves the cursor itself. It only broadcasts which card
/// must animate; the cursor moves once that card reports back through
/// [`DeckController::apply_outcome`]. The cursor always stays within `0..=len`.
#[derive(Debug)]
pub struct DeckController {
    candidates: Vec<Candidate>,
    current_index: Cell<usize>,
    bus: EventBus<RoutedEvent>,
}

impl DeckController {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self::with_bus(candidates, EventBus::new())
    }

    /// Build a deck that broadcasts on an existing bus
    pub fn with_bus(candidates: Vec<Candidate>, bus: EventBus<RoutedEvent>) -> Self {
        Self {
            candidates,
            current_index: Cell::new(0),
            bus,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index.get()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index() >= self.len()
    }

    /// Candidate that Nope/Like would apply to
    pub fn current_candidate(&self) -> Option<&Candidate> {
        self.candidates.get(self.current_index())
    }

    /// Candidate that Redo would restore
    pub fn previous_candidate(&self) -> Option<&Candidate> {
        self.current_index()
            .checked_sub(1)
            .and_then(|index| self.candidates.get(index))
    }

    pub fn bus(&self) -> &EventBus<RoutedEvent> {
        &self.bus
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&RoutedEvent) + 'static,
    {
        self.bus.subscribe(handler)
    }

    /// Broadcast a user intent to the card it targets
    ///
    /// Returns the published event, or `None` when the action falls outside the
    /// deck (Nope/Like on an exhausted deck, Redo before any decision).
    pub fn handle_action(&self, action: Action) -> Option<RoutedEvent> {
        let target = match action {
            Action::Nope | Action::Like => self.current_candidate(),
            Action::Redo => self.previous_candidate(),
        };

        let Some(target) = target else {
            tracing::debug!(%action, index = self.current_index(), "action ignored at deck boundary");
            return None;
        };

        let event = RoutedEvent::new(target.id.clone(), action);
        let delivered = self.bus.publish(&event);
        tracing::debug!(%action, target_id = %event.target_id, delivered, "routed event published");
        Some(event)
    }

    /// Move the cursor one step back (`is_redo`) or forward
    ///
    /// Returns whether the cursor moved; a step outside `0..=len` is refused.
    pub fn adjust_index(&self, is_redo: bool) -> bool {
        let index = self.current_index();
        let next = if is_redo {
            index.checked_sub(1)
        } else {
            Some(index + 1).filter(|next| *next <= self.len())
        };

        match next {
            Some(next) => {
                self.current_index.set(next);
                tracing::debug!(from = index, to = next, "index adjusted");
                true
            }
            None => {
                tracing::warn!(index, is_redo, len = self.len(), "index adjustment out of range");
                false
            }
        }
    }

    /// Apply a card's completion signal if it matches the expected candidate
    ///
    /// A removal must come from the current candidate and a reset from the
    /// previous one. Anything else (a snap-back of the undecided top card, a
    /// repeated signal) leaves the cursor alone.
    pub fn apply_outcome(&self, outcome: &CardOutcome) -> bool {
        let expected = if outcome.is_redo() {
            self.previous_candidate()
        } else {
            self.current_candidate()
        };

        match expected {
            Some(candidate) if candidate.id == outcome.id() => self.adjust_index(outcome.is_redo()),
            _ => {
                tracing::trace!(id = outcome.id(), redo = outcome.is_redo(), "outcome does not match cursor");
                false
            }
        }
    }

    /// Sink for card engines; holds the deck weakly so cards never keep it alive
    pub fn outcome_sink(self: &Rc<Self>) -> OutcomeSink {
        let deck = Rc::downgrade(self);
        Rc::new(move |outcome: CardOutcome| {
            if let Some(deck) = deck.upgrade() {
                deck.apply_outcome(&outcome);
            }
        })
    }
}
