use std::time::Duration;

use super::{Display, Document, ElementId, Visibility};
use crate::constants::{FADE_DELAY_MS, FADE_STEP_FAST, FADE_STEP_NORMAL, FADE_STEP_SLOW};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FadeSpeed {
    Fast,
    Slow,
    #[default]
    Normal,
    Step(f64),
}

impl FadeSpeed {
    pub fn step(self) -> f64 {
        match self {
            FadeSpeed::Fast => FADE_STEP_FAST,
            FadeSpeed::Slow => FADE_STEP_SLOW,
            FadeSpeed::Normal => FADE_STEP_NORMAL,
            FadeSpeed::Step(step) if step > 0.0 && step.is_finite() => step,
            FadeSpeed::Step(_) => FADE_STEP_NORMAL,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "fast" => FadeSpeed::Fast,
            "slow" => FadeSpeed::Slow,
            _ => FadeSpeed::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeProgress {
    Continue,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    element: ElementId,
    direction: FadeDirection,
    step: f64,
    delay: Duration,
    epoch: u64,
}

/// Makes `element` visible at zero opacity and returns the fade that brings
/// it to full opacity.
pub fn fade_in<L>(doc: &mut Document<L>, element: ElementId, speed: FadeSpeed) -> Option<Fade> {
    let epoch = doc.bump_fade_epoch(element)?;
    doc.set_opacity(element, 0.0);
    doc.set_visibility(element, Visibility::Visible);
    doc.set_display(element, Display::Block);
    Some(Fade::new(element, FadeDirection::In, speed, epoch))
}

/// Returns the fade that takes `element` to zero opacity and hides it.
pub fn fade_out<L>(doc: &mut Document<L>, element: ElementId, speed: FadeSpeed) -> Option<Fade> {
    let epoch = doc.bump_fade_epoch(element)?;
    Some(Fade::new(element, FadeDirection::Out, speed, epoch))
}

impl Fade {
    fn new(element: ElementId, direction: FadeDirection, speed: FadeSpeed, epoch: u64) -> Self {
        Self {
            element,
            direction,
            step: speed.step(),
            delay: Duration::from_millis(FADE_DELAY_MS),
            epoch,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Time between two steps.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn step<L>(&self, doc: &mut Document<L>) -> FadeProgress {
        let Some(style) = doc.style(self.element) else {
            tracing::debug!(element = ?self.element, "fade step on removed element");
            return FadeProgress::Cancelled;
        };
        if doc.fade_epoch(self.element) != Some(self.epoch) {
            return FadeProgress::Cancelled;
        }

        let opacity = style.opacity;
        match self.direction {
            FadeDirection::In => {
                let next = (opacity + self.step).min(1.0);
                doc.set_opacity(self.element, next);
                if next >= 1.0 {
                    FadeProgress::Finished
                } else {
                    FadeProgress::Continue
                }
            }
            FadeDirection::Out => {
                let next = (opacity - self.step).max(0.0);
                if next > 0.0 {
                    doc.set_opacity(self.element, next);
                    return FadeProgress::Continue;
                }
                doc.set_opacity(self.element, 1.0);
                doc.set_visibility(self.element, Visibility::Hidden);
                doc.set_display(self.element, Display::None);
                FadeProgress::Finished
            }
        }
    }
}
