use serde::{Deserialize, Serialize};

use crate::block::Level;

/// [level, btc, eur, usd, cny, jpy, krw, eth, gbp] per spec §3. Populated
/// from an external price feed; advisory only, never consulted by the
/// synchronization engine's own invariants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quote {
    pub level: Level,
    pub btc: f64,
    pub eur: f64,
    pub usd: f64,
    pub cny: f64,
    pub jpy: f64,
    pub krw: f64,
    pub eth: f64,
    pub gbp: f64,
}
