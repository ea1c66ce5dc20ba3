pub mod fraction;
pub mod ids;
pub mod match_info;
pub mod score;

pub use fraction::Fraction;
pub use ids::{MatchId, PlayerId, Quarter, TeamId};
pub use match_info::{MatchInfo, Player};
pub use score::{GoalEvent, QuarterScore};
