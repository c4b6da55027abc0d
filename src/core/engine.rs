use std::rc::Rc;
use crate::core::bus::{EventBus, Subscription};
use crate::core::motion::{self, MotionThresholds, Release};
use crate::models::{Action, CardOutcome, CardPhase, Offset, RoutedEvent, Transition, VisualFrame};

/// Callback through which a card reports that its removal or reset was dispatched
pub type OutcomeSink = Rc<dyn Fn(CardOutcome)>;

/// Per-card motion state: owns the drag offset and derives the visual frame from it
///
/// Every state-changing method returns the new frame and also publishes it to
/// frame observers. Commit and reset report a tagged [`CardOutcome`] to the
/// outcome sink synchronously, before returning.
pub struct CardMotionEngine {
    candidate_id: String,
    offset: Offset,
    phase: CardPhase,
    reference_width: f64,
    thresholds: MotionThresholds,
    outcome_sink: OutcomeSink,
    frames: EventBus<VisualFrame>,
}

impl CardMotionEngine {
    pub fn new(
        candidate_id: impl Into<String>,
        reference_width: f64,
        thresholds: MotionThresholds,
        outcome_sink: OutcomeSink,
    ) -> Self {
        Self {
            candidate_id: candidate_id.into(),
            offset: Offset::ZERO,
            phase: CardPhase::Resting,
            reference_width,
            thresholds,
            outcome_sink,
            frames: EventBus::new(),
        }
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    pub fn reference_width(&self) -> f64 {
        self.reference_width
    }

    pub fn thresholds(&self) -> &MotionThresholds {
        &self.thresholds
    }

    /// Current visual tuple; a pure function of offset and reference width
    pub fn frame(&self) -> VisualFrame {
        motion::visual_frame(self.offset, self.reference_width, &self.thresholds, Transition::Immediate)
    }

    /// Observe every frame this card emits
    ///
    /// Observers run while the engine is being mutated and must not call back into it.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe_frames<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&VisualFrame) + 'static,
    {
        self.frames.subscribe(observer)
    }

    pub fn on_drag_changed(&mut self, dx: f64, dy: f64) -> VisualFrame {
        self.offset = Offset::new(dx, motion::clamp_vertical(dy, self.thresholds.max_vertical_drag));
        // a removed card stays removed until it is reset
        if !self.phase.is_removed() {
            self.phase = CardPhase::Dragging;
        }
        tracing::trace!(id = %self.candidate_id, dx, dy = self.offset.height, "drag changed");
        self.emit(Transition::Immediate)
    }

    pub fn on_drag_ended(&mut self, dx: f64, dy: f64) -> VisualFrame {
        match motion::release_decision(dx, dy, self.reference_width, &self.thresholds) {
            Release::Commit { liked, height } => self.commit_removal(liked, height),
            Release::SnapBack => self.reset_position(),
        }
    }

    /// Send the card off-screen and report the removal
    pub fn commit_removal(&mut self, is_liked: bool, height: f64) -> VisualFrame {
        self.offset = motion::exit_offset(is_liked, height, self.reference_width, &self.thresholds);
        self.phase = CardPhase::Removed { liked: is_liked };
        tracing::debug!(id = %self.candidate_id, liked = is_liked, "card removed");

        let frame = self.emit(Transition::Smooth);
        (self.outcome_sink)(CardOutcome::Removed {
            id: self.candidate_id.clone(),
            liked: is_liked,
        });
        frame
    }

    /// Return the card to the centre and report the reset
    pub fn reset_position(&mut self) -> VisualFrame {
        self.offset = Offset::ZERO;
        self.phase = CardPhase::Resting;
        tracing::debug!(id = %self.candidate_id, "card reset");

        let frame = self.emit(Transition::Smooth);
        (self.outcome_sink)(CardOutcome::Reset {
            id: self.candidate_id.clone(),
        });
        frame
    }

    /// React to a broadcast; events for other candidates are ignored
    pub fn on_routed_event(&mut self, event: &RoutedEvent) -> Option<VisualFrame> {
        if event.target_id != self.candidate_id {
            return None;
        }

        let frame = match event.action {
            Action::Nope => self.commit_removal(false, 0.0),
            Action::Like => self.commit_removal(true, 0.0),
            Action::Redo => self.reset_position(),
        };
        Some(frame)
    }

    /// Resize callback from the rendering surface
    pub fn set_reference_width(&mut self, reference_width: f64) -> VisualFrame {
        if !motion::is_usable_width(reference_width) {
            tracing::warn!(id = %self.candidate_id, reference_width, "unusable reference width, visuals fall back to neutral");
        }
        self.reference_width = reference_width;
        self.emit(Transition::Immediate)
    }

    fn emit(&self, transition: Transition) -> VisualFrame {
        let frame = motion::visual_frame(self.offset, self.reference_width, &self.thresholds, transition);
        self.frames.publish(&frame);
        frame
    }
}

impl std::fmt::Debug for CardMotionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardMotionEngine")
            .field("candidate_id", &self.candidate_id)
            .field("offset", &self.offset)
            .field("phase", &self.phase)
            .field("reference_width", &self.reference_width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const WIDTH: f64 = 400.0;

    fn recording_engine(id: &str) -> (CardMotionEngine, Rc<RefCell<Vec<CardOutcome>>>) {
        let outcomes = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let outcomes = Rc::clone(&outcomes);
            Rc::new(move |outcome: CardOutcome| outcomes.borrow_mut().push(outcome))
        };
        let engine = CardMotionEngine::new(id, WIDTH, MotionThresholds::default(), sink);
        (engine, outcomes)
    }

    #[test]
    fn test_drag_changed_clamps_height_only() {
        let (mut engine, outcomes) = recording_engine("a");

        let frame = engine.on_drag_changed(-900.0, 150.0);
        assert_eq!(frame.offset(), Offset::new(-900.0, 100.0));
        assert_eq!(engine.phase(), CardPhase::Dragging);

        let frame = engine.on_drag_changed(10.0, -250.0);
        assert_eq!(frame.offset(), Offset::new(10.0, -100.0));
        assert!(outcomes.borrow().is_empty());
    }

    #[test]
    fn test_drag_end_commits_like() {
        let (mut engine, outcomes) = recording_engine("a");

        engine.on_drag_changed(250.0, 20.0);
        let frame = engine.on_drag_ended(250.0, 20.0);

        assert_eq!(frame.offset(), Offset::new(600.0, 20.0));
        assert_eq!(frame.transition, Transition::Smooth);
        assert_eq!(engine.phase(), CardPhase::Removed { liked: true });
        assert_eq!(
            *outcomes.borrow(),
            vec![CardOutcome::Removed { id: "a".to_string(), liked: true }]
        );
    }

    #[test]
    fn test_drag_end_below_threshold_snaps_back() {
        let (mut engine, outcomes) = recording_engine("a");

        engine.on_drag_changed(99.0, 5.0);
        let frame = engine.on_drag_ended(100.0, 5.0);

        assert_eq!(frame.offset(), Offset::ZERO);
        assert_eq!(engine.phase(), CardPhase::Resting);
        assert_eq!(*outcomes.borrow(), vec![CardOutcome::Reset { id: "a".to_string() }]);
    }

    #[test]
    fn test_drag_on_removed_card_keeps_removed_phase() {
        let (mut engine, outcomes) = recording_engine("a");
        engine.commit_removal(false, 0.0);

        let frame = engine.on_drag_changed(30.0, 10.0);
        assert_eq!(frame.offset(), Offset::new(30.0, 10.0));
        assert_eq!(engine.phase(), CardPhase::Removed { liked: false });
        assert_eq!(outcomes.borrow().len(), 1);

        engine.reset_position();
        assert_eq!(engine.phase(), CardPhase::Resting);
        engine.on_drag_changed(30.0, 10.0);
        assert_eq!(engine.phase(), CardPhase::Dragging);
    }

    #[test]
    fn test_routed_event_filtering() {
        let (mut engine, outcomes) = recording_engine("a");

        assert!(engine.on_routed_event(&RoutedEvent::new("b", Action::Like)).is_none());
        assert!(outcomes.borrow().is_empty());

        let frame = engine.on_routed_event(&RoutedEvent::new("a", Action::Nope));
        assert_eq!(frame.map(|f| f.offset()), Some(Offset::new(-600.0, 0.0)));

        let frame = engine.on_routed_event(&RoutedEvent::new("a", Action::Redo));
        assert_eq!(frame.map(|f| f.offset()), Some(Offset::ZERO));
        assert_eq!(outcomes.borrow().len(), 2);
    }

    #[test]
    fn test_frame_observers_and_resize() {
        let (mut engine, _outcomes) = recording_engine("a");
        let frames = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let frames = Rc::clone(&frames);
            engine.subscribe_frames(move |frame| frames.borrow_mut().push(*frame))
        };

        engine.on_drag_changed(100.0, 0.0);
        let resized = engine.set_reference_width(200.0);

        assert_eq!(frames.borrow().len(), 2);
        assert_eq!(frames.borrow()[0].angle_degrees, 2.5);
        assert_eq!(resized.angle_degrees, 5.0);
    }

    #[test]
    fn test_repeated_drag_is_idempotent() {
        let (mut engine, _outcomes) = recording_engine("a");
        let first = engine.on_drag_changed(123.0, -45.0);
        let second = engine.on_drag_changed(123.0, -45.0);
        assert_eq!(first, second);
        assert_eq!(engine.frame(), first);
    }
}
