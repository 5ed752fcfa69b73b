//! Qualitative signals and the recommendation aggregator.

use crate::domain::indicator::{calculate_macd, calculate_rsi, calculate_sma, macd, rsi, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const SIGNAL_SMA_PERIOD: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Bullish,
    Bearish,
    Neutral,
    Overbought,
    Oversold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Signal::Bullish => "Bullish",
            Signal::Bearish => "Bearish",
            Signal::Neutral => "Neutral",
            Signal::Overbought => "Overbought",
            Signal::Oversold => "Oversold",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Recommendation {
    pub const ALL: [Recommendation; 5] = [
        Recommendation::StrongBuy,
        Recommendation::Buy,
        Recommendation::Hold,
        Recommendation::Sell,
        Recommendation::StrongSell,
    ];

    /// StrongBuy(5) > Buy(4) > Hold(3) > Sell(2) > StrongSell(1)
    pub fn rank(self) -> u8 {
        match self {
            Recommendation::StrongBuy => 5,
            Recommendation::Buy => 4,
            Recommendation::Hold => 3,
            Recommendation::Sell => 2,
            Recommendation::StrongSell => 1,
        }
    }

    /// Map a net vote count (buy minus sell) to a recommendation.
    pub fn from_net_votes(net: i32) -> Self {
        match net {
            n if n > 1 => Recommendation::StrongBuy,
            1 => Recommendation::Buy,
            0 => Recommendation::Hold,
            -1 => Recommendation::Sell,
            _ => Recommendation::StrongSell,
        }
    }
}

impl PartialOrd for Recommendation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Recommendation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::StrongBuy => "STRONG_BUY",
            Recommendation::Buy => "BUY",
            Recommendation::Hold => "HOLD",
            Recommendation::Sell => "SELL",
            Recommendation::StrongSell => "STRONG_SELL",
        };
        f.write_str(s)
    }
}

impl FromStr for Recommendation {
    type Err = String;

    /// Accepts `STRONG_BUY`, `strong buy`, `StrongBuy` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | ' ' | '-'))
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "STRONGBUY" => Ok(Recommendation::StrongBuy),
            "BUY" => Ok(Recommendation::Buy),
            "HOLD" => Ok(Recommendation::Hold),
            "SELL" => Ok(Recommendation::Sell),
            "STRONGSELL" => Ok(Recommendation::StrongSell),
            _ => Err(format!("unknown recommendation: {}", s.trim())),
        }
    }
}

/// Latest-bar inputs consumed by a recommendation strategy.
#[derive(Debug, Clone, Copy)]
pub struct SignalInput<'a> {
    pub price: f64,
    pub price_change: f64,
    pub rsi: Option<f64>,
    pub short_sma: Option<f64>,
    pub long_sma: Option<f64>,
    /// Full volume history, oldest first.
    pub volumes: &'a [u64],
}

/// Combines indicator readings into one recommendation.
pub trait RecommendationStrategy {
    fn name(&self) -> &str;
    fn recommend(&self, input: &SignalInput<'_>) -> Recommendation;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Votes {
    pub buy: u32,
    pub sell: u32,
}

impl Votes {
    pub fn net(&self) -> i32 {
        self.buy as i32 - self.sell as i32
    }
}

/// Rule-based vote counting.
///
/// - RSI below 30 votes buy, above 70 votes sell.
/// - Short SMA above long SMA with price above short SMA votes buy; the
///   mirror case votes sell.
/// - Latest volume above 1.5x the mean of the last 3 volumes (latest included)
///   casts two votes: buy on a positive price change, sell otherwise.
///
/// Net votes map through [`Recommendation::from_net_votes`].
#[derive(Debug, Clone, Copy)]
pub struct VoteCountStrategy {
    pub oversold: f64,
    pub overbought: f64,
    pub surge_factor: f64,
    pub surge_lookback: usize,
}

impl Default for VoteCountStrategy {
    fn default() -> Self {
        Self {
            oversold: RSI_OVERSOLD,
            overbought: RSI_OVERBOUGHT,
            surge_factor: 1.5,
            surge_lookback: 3,
        }
    }
}

impl VoteCountStrategy {
    pub fn votes(&self, input: &SignalInput<'_>) -> Votes {
        let mut votes = Votes::default();

        if let Some(rsi) = input.rsi {
            if rsi < self.oversold {
                votes.buy += 1;
            } else if rsi > self.overbought {
                votes.sell += 1;
            }
        }

        if let (Some(short), Some(long)) = (input.short_sma, input.long_sma) {
            if short > long && input.price > short {
                votes.buy += 1;
            } else if short < long && input.price < short {
                votes.sell += 1;
            }
        }

        if self.is_volume_surge(input.volumes) {
            if input.price_change > 0.0 {
                votes.buy += 2;
            } else {
                votes.sell += 2;
            }
        }

        votes
    }

    fn is_volume_surge(&self, volumes: &[u64]) -> bool {
        let Some(&latest) = volumes.last() else {
            return false;
        };
        let recent = &volumes[volumes.len().saturating_sub(self.surge_lookback)..];
        let avg = recent.iter().map(|&v| v as f64).sum::<f64>() / recent.len() as f64;
        latest as f64 > avg * self.surge_factor
    }
}

impl RecommendationStrategy for VoteCountStrategy {
    fn name(&self) -> &str {
        "vote-count"
    }

    fn recommend(&self, input: &SignalInput<'_>) -> Recommendation {
        let votes = self.votes(input);
        log::debug!("votes buy={} sell={}", votes.buy, votes.sell);
        Recommendation::from_net_votes(votes.net())
    }
}

/// Per-indicator qualitative readings of the latest bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorSignals {
    pub rsi: Option<Signal>,
    pub macd: Option<Signal>,
    pub moving_average: Option<Signal>,
}

/// RSI(14) overbought/oversold, MACD(12,26,9) line versus signal and close
/// versus SMA(20). Indicators still in warmup produce no entry.
pub fn generate_trading_signals(bars: &[OhlcvBar]) -> IndicatorSignals {
    let rsi = calculate_rsi(bars, rsi::DEFAULT_PERIOD)
        .latest_simple()
        .map(|v| {
            if v > RSI_OVERBOUGHT {
                Signal::Overbought
            } else if v < RSI_OVERSOLD {
                Signal::Oversold
            } else {
                Signal::Neutral
            }
        });

    let macd_series = calculate_macd(
        bars,
        macd::DEFAULT_FAST,
        macd::DEFAULT_SLOW,
        macd::DEFAULT_SIGNAL,
    );
    let macd = match macd_series.latest() {
        Some(IndicatorValue::Macd { line, signal, .. }) if line > signal => Some(Signal::Bullish),
        Some(IndicatorValue::Macd { .. }) => Some(Signal::Bearish),
        _ => None,
    };

    let moving_average = match (
        bars.last(),
        calculate_sma(bars, SIGNAL_SMA_PERIOD).latest_simple(),
    ) {
        (Some(bar), Some(sma)) if bar.close > sma => Some(Signal::Bullish),
        (Some(_), Some(_)) => Some(Signal::Bearish),
        _ => None,
    };

    IndicatorSignals {
        rsi,
        macd,
        moving_average,
    }
}
