//! Commit/apply: writing proposed values back into the chart.

use crate::host::{Animation, ChartHost};
use dp_core::model::Chart;
use dp_core::translate::{PendingUpdates, PositionSnapshot};
use std::time::{Duration, Instant};

/// Write every pending field value into its point. Returns the number of
/// fields written.
pub fn apply_updates(chart: &mut Chart, updates: &PendingUpdates) -> usize {
    let mut written = 0;
    for update in updates.iter() {
        let Some(point) = chart.point_mut(update.id) else {
            log::debug!("{:?} vanished before its update was applied", update.id);
            continue;
        };
        for (field, value) in update.values.iter() {
            point.set(field, value);
            written += 1;
        }
    }
    written
}

/// Put back every value captured in `origin`.
pub fn restore_origin(chart: &mut Chart, origin: &PositionSnapshot) {
    for entry in &origin.points {
        if let Some(point) = chart.point_mut(entry.id) {
            for (field, value) in entry.values.iter() {
                point.set(field, value);
            }
        }
    }
}

/// Time-based "drop animation running" flag.
///
/// Set for the animation duration after a commit; the host may end it
/// earlier with [`AnimationGate::finish`] when it knows the redraw is done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationGate {
    until: Option<Instant>,
}

impl AnimationGate {
    pub fn start(&mut self, now: Instant, duration: Duration) {
        self.until = (!duration.is_zero()).then(|| now + duration);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    pub fn finish(&mut self) {
        self.until = None;
    }
}

/// Apply a batch, redraw once with the chart animation and arm the gate.
pub fn commit<H: ChartHost + ?Sized>(
    chart: &mut Chart,
    host: &mut H,
    updates: &PendingUpdates,
    gate: &mut AnimationGate,
) -> usize {
    let written = apply_updates(chart, updates);
    let duration = chart.options.animation_duration();
    host.redraw(Animation::over(duration));
    gate.start(host.now(), duration);
    log::debug!("committed {written} field(s) across {} point(s)", updates.len());
    written
}
