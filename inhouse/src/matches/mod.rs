//! Match reporting: fetch a finished match, adjust inhouse ratings and settle
//! bets.

pub mod errors;
pub mod models;
pub mod reporter;
pub mod source;

pub use errors::{MatchError, MatchResult};
pub use models::{FinishedMatch, MatchId, MatchReport};
pub use reporter::MatchReporter;
pub use source::{FixedMatchSource, MatchResultSource};
