//! Control-point picking state, independent of any UI toolkit.

use crate::documents::{ControlPixelPoint, ControlPixelRecord};
use georef_core::{default_label, Pt2, Side, ValidationError, CORRESPONDENCE_COUNT};

/// Append-only sequence of picked pixel locations with undo.
///
/// Points are labelled `P1..P4` in pick order; the order is the
/// correspondence order of the resulting [`ControlPixelRecord`].
///
/// ```
/// use georef_core::Pt2;
/// use georef_pipeline::PickSession;
///
/// let mut session = PickSession::new("mrt_clean.png");
/// session.push(Pt2::new(10.0, 10.0));
/// session.push(Pt2::new(99.0, 99.0));
/// session.undo();
/// assert_eq!(session.len(), 1);
/// assert!(session.finish().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PickSession {
    image: String,
    points: Vec<ControlPixelPoint>,
}

impl PickSession {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            points: Vec::with_capacity(CORRESPONDENCE_COUNT),
        }
    }

    /// Record a pick. Returns `None` once all four points are placed.
    pub fn push(&mut self, px: Pt2) -> Option<&ControlPixelPoint> {
        if self.is_complete() {
            return None;
        }
        self.points.push(ControlPixelPoint {
            id: default_label(self.points.len()),
            px: [px.x, px.y],
        });
        self.points.last()
    }

    /// Remove the most recent pick.
    pub fn undo(&mut self) -> Option<ControlPixelPoint> {
        self.points.pop()
    }

    pub fn points(&self) -> &[ControlPixelPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == CORRESPONDENCE_COUNT
    }

    /// Label the next pick will receive, if any.
    pub fn next_label(&self) -> Option<String> {
        (!self.is_complete()).then(|| default_label(self.points.len()))
    }

    /// Snapshot the session as a control-point record.
    ///
    /// Fails unless exactly four points have been picked; the session is left
    /// untouched so picking can continue.
    pub fn finish(&self) -> Result<ControlPixelRecord, ValidationError> {
        if !self.is_complete() {
            return Err(ValidationError::CorrespondenceCount {
                side: Side::Pixel,
                expected: CORRESPONDENCE_COUNT,
                actual: self.points.len(),
            });
        }
        Ok(ControlPixelRecord {
            image: Some(self.image.clone()),
            points: self.points.clone(),
        })
    }
}
