//! Bid recommendation: win-probability modelling, the discount ladder, and
//! final bid selection.

pub mod recommend;
pub mod select;
pub mod winprob;

pub use recommend::{BidSuggestion, CurrentBid, Recommendation, recommend};
pub use select::select_best;
pub use winprob::{FixedJitter, Jitter, UniformJitter, price_competitiveness, win_probability};
