pub mod balanced_community;
pub mod greedy;
pub mod maximal_cohesion;

use std::sync::Arc;

use crate::domain::ports::community_detector::CommunityDetector;
use crate::domain::ports::grouping_strategy::GroupingStrategy;
use crate::domain::values::strategy_kind::StrategyKind;

use self::balanced_community::BalancedCommunityStrategy;
use self::greedy::GreedyStrategy;
use self::maximal_cohesion::MaximalCohesionStrategy;

/// Registry of the available strategies, keyed by [`StrategyKind`].
pub struct StrategySet {
    greedy: GreedyStrategy,
    maximal_cohesion: MaximalCohesionStrategy,
    balanced: BalancedCommunityStrategy,
}

impl StrategySet {
    pub fn new(detector: Arc<dyn CommunityDetector>) -> Self {
        Self {
            greedy: GreedyStrategy,
            maximal_cohesion: MaximalCohesionStrategy,
            balanced: BalancedCommunityStrategy::new(detector),
        }
    }

    pub fn get(&self, kind: StrategyKind) -> &dyn GroupingStrategy {
        match kind {
            StrategyKind::Greedy => &self.greedy,
            StrategyKind::MaximalCohesion => &self.maximal_cohesion,
            StrategyKind::BalancedGroups => &self.balanced,
        }
    }
}
