//! Domain value types.
//!
//! Newtypes for quantities (`Amount`, `Shares`), rates (`FeeRate`,
//! `Weight`, `Price`), identifiers, the caller context and the request,
//! quote and event records exchanged with a pool.  Constructors that can
//! fail validate eagerly so an invalid value never exists.

mod amount;
mod context;
mod event;
mod fee_rate;
mod ids;
mod liquidity;
mod price;
mod rounding;
mod shares;
mod swap;
mod weight;

pub use amount::Amount;
pub use context::{Timestamp, TxContext};
pub use event::PoolEvent;
pub use fee_rate::{BPS_DENOMINATOR, FeeRate};
pub use ids::{AccountId, AssetId, PoolId};
pub use liquidity::{ExitQuote, ExitRequest, JoinQuote, JoinRequest, LiquidityPosition};
pub use price::Price;
pub use rounding::Rounding;
pub use shares::Shares;
pub use swap::{SwapKind, SwapQuote, SwapRequest};
pub use weight::{MIN_WEIGHT_BPS, Weight};
