//! BacktestEngine: the bar-by-bar event loop.
//!
//! Per bar, strictly in order:
//! 1. Mark the position to the close and append an equity snapshot
//! 2. If an order is still pending, resolve it here and skip the strategy
//! 3. Past warmup, ask the strategy for a decision on the visible history
//! 4. Submit the intent and resolve it at this bar's close
//!
//! At end of data an open position is closed without strategy input and
//! the last snapshot is restated after that close, so the curve ends flat.

use tracing::{debug, info};

use super::broker::Broker;
use super::config::{validate_stake, EngineConfig};
use super::lifecycle::{OrderLifecycle, Submission};
use super::observer::{OrderObserver, TracingObserver};
use super::result::{EquitySnapshot, RunResult};
use super::trades::extract_trades;
use crate::domain::{Bar, FillEvent, OrderSide, OrderStatus, RejectReason};
use crate::enrich::EnrichedTable;
use crate::strategy::{Decision, Strategy};

/// Single-instrument, single-threaded simulator.
///
/// Broker state and the order slot are owned by one `run` call and never
/// shared; the same table and strategy always produce the same result.
#[derive(Debug, Clone, Copy)]
pub struct BacktestEngine {
    config: EngineConfig,
}

/// Mutable state of one run.
struct RunState<'o> {
    broker: Broker,
    lifecycle: OrderLifecycle,
    fills: Vec<FillEvent>,
    observer: &'o mut dyn OrderObserver,
}

impl RunState<'_> {
    /// Resolve whatever is pending at `bar`'s close and notify.
    fn resolve_at(&mut self, bar: &Bar) {
        let Some(order) = self
            .lifecycle
            .resolve(&mut self.broker, bar.close, bar.timestamp)
        else {
            return;
        };
        match &order.status {
            OrderStatus::Filled(exec) => {
                let fill = FillEvent {
                    order_id: order.id,
                    timestamp: exec.filled_at,
                    side: order.side,
                    price: exec.price,
                    size: exec.size,
                    commission: exec.commission,
                };
                self.observer.on_fill(&fill);
                self.fills.push(fill);
            }
            OrderStatus::Rejected { reason } => self.observer.on_reject(order, reason),
            OrderStatus::Submitted => {}
        }
    }

    fn reject_pending(&mut self, reason: RejectReason) {
        if let Some(order) = self.lifecycle.reject(reason.clone()) {
            self.observer.on_reject(order, &reason);
        }
    }
}

impl BacktestEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run with fills and rejections logged through `tracing`.
    pub fn run(&self, table: &EnrichedTable, strategy: &dyn Strategy) -> RunResult {
        self.run_with_observer(table, strategy, &mut TracingObserver)
    }

    pub fn run_with_observer(
        &self,
        table: &EnrichedTable,
        strategy: &dyn Strategy,
        observer: &mut dyn OrderObserver,
    ) -> RunResult {
        let warmup = self.config.warmup_bars();
        info!(
            symbol = table.symbol(),
            strategy = strategy.name(),
            bars = table.len(),
            warmup,
            "backtest started"
        );

        let mut state = RunState {
            broker: Broker::new(self.config.initial_cash(), self.config.commission_rate()),
            lifecycle: OrderLifecycle::new(),
            fills: Vec::new(),
            observer,
        };
        let mut equity_curve = Vec::with_capacity(table.len());

        for (i, bar) in table.bars().iter().enumerate() {
            equity_curve.push(EquitySnapshot {
                timestamp: bar.timestamp,
                equity: state.broker.equity(bar.close),
                cash: state.broker.cash(),
                position_size: state.broker.position().size,
                close: bar.close,
            });

            if state.lifecycle.is_pending() {
                debug!(bar = i, "order pending, strategy skipped");
                state.resolve_at(bar);
                continue;
            }
            if i < warmup {
                continue;
            }
            let Some(view) = table.view_until(i) else {
                break;
            };

            match strategy.decide(&view, state.broker.position()) {
                Decision::Hold => {}
                Decision::Enter { stake_fraction } => {
                    let stake = stake_fraction.unwrap_or(self.config.stake_fraction());
                    let valid = validate_stake(stake).is_ok();
                    let size = if valid {
                        state.broker.entry_size(stake, bar.close)
                    } else {
                        0.0
                    };
                    if let Submission::Accepted(_) =
                        state.lifecycle.submit(OrderSide::Buy, size, bar.timestamp)
                    {
                        if valid {
                            state.resolve_at(bar);
                        } else {
                            state.reject_pending(RejectReason::InvalidStake {
                                stake_fraction: stake,
                            });
                        }
                    }
                }
                Decision::Exit => {
                    if let Submission::Accepted(_) =
                        state.lifecycle.submit(OrderSide::Close, 0.0, bar.timestamp)
                    {
                        state.resolve_at(bar);
                    }
                }
            }
        }

        let mut forced_exit = false;
        if let Some(last) = table.bars().last() {
            state.resolve_at(last);
            if !state.broker.position().is_flat() {
                info!(
                    size = state.broker.position().size,
                    price = last.close,
                    "closing open position at end of data"
                );
                state
                    .lifecycle
                    .submit(OrderSide::Close, 0.0, last.timestamp);
                state.resolve_at(last);
                forced_exit = true;
            }
            if let Some(snap) = equity_curve.last_mut() {
                *snap = EquitySnapshot {
                    timestamp: last.timestamp,
                    equity: state.broker.equity(last.close),
                    cash: state.broker.cash(),
                    position_size: state.broker.position().size,
                    close: last.close,
                };
            }
        }

        let RunState {
            broker,
            lifecycle,
            fills,
            ..
        } = state;
        let trades = extract_trades(&fills);
        info!(
            fills = fills.len(),
            trades = trades.len(),
            final_cash = broker.cash(),
            "backtest finished"
        );

        RunResult {
            symbol: table.symbol().to_string(),
            strategy: strategy.name().to_string(),
            equity_curve,
            orders: lifecycle.into_history(),
            fills,
            trades,
            initial_cash: self.config.initial_cash(),
            final_cash: broker.cash(),
            bar_count: table.len(),
            warmup_bars: warmup,
            forced_exit,
        }
    }
}
