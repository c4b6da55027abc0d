use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::core::bus::Subscription;
use crate::core::deck::DeckController;
use crate::core::engine::CardMotionEngine;
use crate::core::motion::MotionThresholds;
use crate::models::{Action, Candidate, CardPhase, RoutedEvent, VisualFrame};
use crate::services::provider::{ensure_unique_ids, CandidateProvider, ProviderError};

struct MountedCard {
    engine: Rc<RefCell<CardMotionEngine>>,
    _routing: Subscription,
}

/// A deck controller wired to one motion engine per candidate
///
/// Every mounted card listens on the deck's bus and filters by its own id, so
/// button taps and drags end in the same commit/reset path.
pub struct CardStack {
    deck: Rc<DeckController>,
    cards: HashMap<String, MountedCard>,
    reference_width: f64,
}

impl CardStack {
    /// Mount one card per candidate; ids must be unique since cards are keyed by id
    pub fn new(
        candidates: Vec<Candidate>,
        reference_width: f64,
        thresholds: MotionThresholds,
    ) -> Result<Self, ProviderError> {
        ensure_unique_ids(&candidates)?;

        let deck = Rc::new(DeckController::new(candidates));
        let mut cards = HashMap::with_capacity(deck.len());

        for candidate in deck.candidates() {
            let engine = Rc::new(RefCell::new(CardMotionEngine::new(
                candidate.id.clone(),
                reference_width,
                thresholds,
                deck.outcome_sink(),
            )));

            let routing = {
                let engine = Rc::clone(&engine);
                deck.subscribe(move |event: &RoutedEvent| match engine.try_borrow_mut() {
                    Ok(mut engine) => {
                        engine.on_routed_event(event);
                    }
                    Err(_) => {
                        tracing::warn!(target_id = %event.target_id, "card busy, re-entrant routed event dropped");
                    }
                })
            };

            cards.insert(
                candidate.id.clone(),
                MountedCard {
                    engine,
                    _routing: routing,
                },
            );
        }

        tracing::debug!(cards = cards.len(), reference_width, "card stack built");

        Ok(Self {
            deck,
            cards,
            reference_width,
        })
    }

    pub fn from_provider<P: CandidateProvider + ?Sized>(
        provider: &P,
        reference_width: f64,
        thresholds: MotionThresholds,
    ) -> Result<Self, ProviderError> {
        Self::new(provider.candidates()?, reference_width, thresholds)
    }

    pub fn deck(&self) -> &DeckController {
        &self.deck
    }

    pub fn current_index(&self) -> usize {
        self.deck.current_index()
    }

    pub fn reference_width(&self) -> f64 {
        self.reference_width
    }

    /// Undecided candidate on top of the stack
    pub fn top_card(&self) -> Option<&Candidate> {
        self.deck.current_candidate()
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    /// Button tap
    pub fn tap(&self, action: Action) -> Option<RoutedEvent> {
        self.deck.handle_action(action)
    }

    pub fn drag_changed(&self, id: &str, dx: f64, dy: f64) -> Option<VisualFrame> {
        self.with_engine(id, |engine| engine.on_drag_changed(dx, dy))
    }

    pub fn drag_ended(&self, id: &str, dx: f64, dy: f64) -> Option<VisualFrame> {
        self.with_engine(id, |engine| engine.on_drag_ended(dx, dy))
    }

    /// Forward a new viewport width to every mounted card
    pub fn resize(&mut self, reference_width: f64) {
        self.reference_width = reference_width;
        for card in self.cards.values() {
            card.engine.borrow_mut().set_reference_width(reference_width);
        }
    }

    /// Drop a card and its bus subscription; later events for it reach nobody
    pub fn unmount(&mut self, id: &str) -> bool {
        let removed = self.cards.remove(id).is_some();
        if removed {
            tracing::debug!(id, "card unmounted");
        }
        removed
    }

    pub fn frame(&self, id: &str) -> Option<VisualFrame> {
        self.cards.get(id).map(|card| card.engine.borrow().frame())
    }

    pub fn phase(&self, id: &str) -> Option<CardPhase> {
        self.cards.get(id).map(|card| card.engine.borrow().phase())
    }

    /// Frames of mounted cards in paint order: last candidate first, top card last
    pub fn frames(&self) -> Vec<(String, VisualFrame)> {
        self.deck
            .candidates()
            .iter()
            .rev()
            .filter_map(|candidate| self.frame(&candidate.id).map(|frame| (candidate.id.clone(), frame)))
            .collect()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_frames<F>(&self, id: &str, observer: F) -> Option<Subscription>
    where
        F: Fn(&VisualFrame) + 'static,
    {
        self.cards
            .get(id)
            .map(|card| card.engine.borrow().subscribe_frames(observer))
    }

    fn with_engine<R>(&self, id: &str, f: impl FnOnce(&mut CardMotionEngine) -> R) -> Option<R> {
        let card = self.cards.get(id)?;
        let mut engine = card.engine.borrow_mut();
        Some(f(&mut *engine))
    }
}
