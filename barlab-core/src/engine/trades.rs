//! Round-trip extraction from the fill log.

use chrono::NaiveDateTime;

use crate::domain::{FillEvent, OrderSide, TradeRecord};

struct OpenTrade {
    entry_time: NaiveDateTime,
    size: f64,
    avg_price: f64,
    /// Entry commission not yet attributed to a closed trade.
    commission: f64,
}

/// Pair buys with the sells/closes that reduce them.
///
/// Each reducing fill yields one record for the units it sold, carrying a
/// proportional share of the entry commission.
pub fn extract_trades(fills: &[FillEvent]) -> Vec<TradeRecord> {
    let mut trades = Vec::new();
    let mut open: Option<OpenTrade> = None;

    for fill in fills {
        match fill.side {
            OrderSide::Buy => match open.as_mut() {
                Some(trade) => {
                    let size = trade.size + fill.size;
                    trade.avg_price = (trade.size * trade.avg_price + fill.size * fill.price) / size;
                    trade.size = size;
                    trade.commission += fill.commission;
                }
                None => {
                    open = Some(OpenTrade {
                        entry_time: fill.timestamp,
                        size: fill.size,
                        avg_price: fill.price,
                        commission: fill.commission,
                    });
                }
            },
            OrderSide::Sell | OrderSide::Close => {
                let Some(trade) = open.as_mut() else {
                    continue;
                };
                let share = (fill.size / trade.size).min(1.0);
                let entry_commission = trade.commission * share;
                let gross_pnl = (fill.price - trade.avg_price) * fill.size;
                let commission = entry_commission + fill.commission;
                trades.push(TradeRecord {
                    entry_time: trade.entry_time,
                    exit_time: fill.timestamp,
                    entry_price: trade.avg_price,
                    exit_price: fill.price,
                    size: fill.size,
                    gross_pnl,
                    commission,
                    net_pnl: gross_pnl - commission,
                });
                trade.size -= fill.size;
                trade.commission -= entry_commission;
                if trade.size <= 0.0 {
                    open = None;
                }
            }
        }
    }
    trades
}
