//! Notification hook for order outcomes.

use tracing::{info, warn};

use crate::domain::{FillEvent, Order, RejectReason};

/// Receives every fill and rejection as the run resolves orders.
pub trait OrderObserver {
    fn on_fill(&mut self, fill: &FillEvent);

    fn on_reject(&mut self, _order: &Order, _reason: &RejectReason) {}
}

/// Any `FnMut(&FillEvent)` closure observes fills.
impl<F: FnMut(&FillEvent)> OrderObserver for F {
    fn on_fill(&mut self, fill: &FillEvent) {
        self(fill)
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl OrderObserver for NullObserver {
    fn on_fill(&mut self, _fill: &FillEvent) {}
}

/// Logs fills at `info` and rejections at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl OrderObserver for TracingObserver {
    fn on_fill(&mut self, fill: &FillEvent) {
        info!(
            order = %fill.order_id,
            side = %fill.side,
            price = fill.price,
            size = fill.size,
            commission = fill.commission,
            at = %fill.timestamp,
            "order filled"
        );
    }

    fn on_reject(&mut self, order: &Order, reason: &RejectReason) {
        warn!(
            order = %order.id,
            side = %order.side,
            at = %order.submitted_at,
            %reason,
            "order rejected"
        );
    }
}

/// Collects every fill in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub fills: Vec<FillEvent>,
    pub rejections: Vec<RejectReason>,
}

impl OrderObserver for RecordingObserver {
    fn on_fill(&mut self, fill: &FillEvent) {
        self.fills.push(*fill);
    }

    fn on_reject(&mut self, _order: &Order, reason: &RejectReason) {
        self.rejections.push(reason.clone());
    }
}
