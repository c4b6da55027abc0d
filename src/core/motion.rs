use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::{Offset, Transition, VisualFrame};

/// Errors for motion thresholds that would make the transforms meaningless
#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("{name} must be a finite number greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("min_scale must be within (0, 1], got {0}")]
    ScaleOutOfRange(f64),
}

/// Policy constants for the drag-to-motion mapping
///
/// Defaults reproduce the classic swipe-card feel:
/// commit past a quarter of the width, fly out to 1.5 widths,
/// vertical drag limited to 100 points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionThresholds {
    /// Fraction of the reference width a release must strictly exceed to commit
    pub commit_ratio: f64,
    /// Exit offset as a multiple of the reference width
    pub exit_travel_ratio: f64,
    pub max_vertical_drag: f64,
    pub min_scale: f64,
    /// Rotation at a full reference width of horizontal travel
    pub max_rotation_degrees: f64,
    pub indicator_gain: f64,
}

impl Default for MotionThresholds {
    fn default() -> Self {
        Self {
            commit_ratio: 0.25,
            exit_travel_ratio: 1.5,
            max_vertical_drag: 100.0,
            min_scale: 0.75,
            max_rotation_degrees: 10.0,
            indicator_gain: 4.0,
        }
    }
}

impl MotionThresholds {
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (name, value) in [
            ("commit_ratio", self.commit_ratio),
            ("exit_travel_ratio", self.exit_travel_ratio),
            ("max_vertical_drag", self.max_vertical_drag),
            ("max_rotation_degrees", self.max_rotation_degrees),
            ("indicator_gain", self.indicator_gain),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ThresholdError::NotPositive { name, value });
            }
        }

        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(ThresholdError::ScaleOutOfRange(self.min_scale));
        }

        Ok(())
    }
}

/// Decision taken when a drag is released
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    Commit { liked: bool, height: f64 },
    SnapBack,
}

/// A reference width is usable only when it is finite and positive
#[inline]
pub fn is_usable_width(reference_width: f64) -> bool {
    reference_width.is_finite() && reference_width > 0.0
}

/// Horizontal travel as a fraction of the reference width; 0 for unusable widths
#[inline]
fn travel_ratio(width: f64, reference_width: f64) -> f64 {
    if is_usable_width(reference_width) {
        width / reference_width
    } else {
        0.0
    }
}

/// Limit vertical drag to `[-max, max]`
#[inline]
pub fn clamp_vertical(dy: f64, max: f64) -> f64 {
    if dy > 0.0 {
        dy.min(max)
    } else {
        dy.max(-max)
    }
}

/// scale = max(1 - |width| / reference_width, min_scale)
#[inline]
pub fn scale_for(width: f64, reference_width: f64, thresholds: &MotionThresholds) -> f64 {
    (1.0 - travel_ratio(width, reference_width).abs()).max(thresholds.min_scale)
}

/// angle = (width / reference_width) * max_rotation_degrees
#[inline]
pub fn angle_for(width: f64, reference_width: f64, thresholds: &MotionThresholds) -> f64 {
    travel_ratio(width, reference_width) * thresholds.max_rotation_degrees
}

/// Signed indicator strength; positive drives LIKE, negative drives NOPE
#[inline]
pub fn indicator_for(width: f64, reference_width: f64, thresholds: &MotionThresholds) -> f64 {
    travel_ratio(width, reference_width) * thresholds.indicator_gain
}

/// Derive the full visual tuple for an offset
pub fn visual_frame(
    offset: Offset,
    reference_width: f64,
    thresholds: &MotionThresholds,
    transition: Transition,
) -> VisualFrame {
    let indicator = indicator_for(offset.width, reference_width, thresholds);

    VisualFrame {
        offset_x: offset.width,
        offset_y: offset.height,
        scale: scale_for(offset.width, reference_width, thresholds),
        angle_degrees: angle_for(offset.width, reference_width, thresholds),
        like_opacity: indicator.clamp(0.0, 1.0),
        nope_opacity: (-indicator).clamp(0.0, 1.0),
        transition,
    }
}

/// Decide between committing and snapping back
///
/// Commits only when `|dx|` is strictly greater than `reference_width * commit_ratio`;
/// a release exactly on the threshold snaps back. Unusable widths always snap back.
pub fn release_decision(dx: f64, dy: f64, reference_width: f64, thresholds: &MotionThresholds) -> Release {
    if !is_usable_width(reference_width) {
        return Release::SnapBack;
    }

    if dx.abs() > reference_width * thresholds.commit_ratio {
        Release::Commit {
            liked: dx > 0.0,
            height: dy,
        }
    } else {
        Release::SnapBack
    }
}

/// Off-screen target offset for a committed card
pub fn exit_offset(liked: bool, height: f64, reference_width: f64, thresholds: &MotionThresholds) -> Offset {
    let travel = if is_usable_width(reference_width) {
        reference_width * thresholds.exit_travel_ratio
    } else {
        0.0
    };

    Offset::new(if liked { travel } else { -travel }, height)
}
