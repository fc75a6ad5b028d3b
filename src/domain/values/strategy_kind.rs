use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Greedy,
    #[default]
    MaximalCohesion,
    BalancedGroups,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::MaximalCohesion,
        StrategyKind::BalancedGroups,
        StrategyKind::Greedy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Greedy => "greedy",
            StrategyKind::MaximalCohesion => "maximal_cohesion",
            StrategyKind::BalancedGroups => "balanced_groups",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "greedy" => Ok(StrategyKind::Greedy),
            "maximal_cohesion" => Ok(StrategyKind::MaximalCohesion),
            "balanced_groups" => Ok(StrategyKind::BalancedGroups),
            _ => Err(format!(
                "Invalid strategy: {s}. Choose from: maximal_cohesion, balanced_groups, greedy"
            )),
        }
    }
}
