//! Voting-power based validator selection for fault-tolerance scenarios.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Share of total voting power a selection should control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VotingPowerScenario {
    /// Target `floor(total / 3) - 1`: the single largest validator under it.
    LessThanOneThird,
    /// Target `floor(total / 3)`: a single validator matching it exactly.
    ExactlyOneThird,
    /// Target `floor(total / 3) + 1`: smallest validators first until reached.
    MoreThanOneThird,
}

impl VotingPowerScenario {
    /// Kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LessThanOneThird => "less-than-one-third",
            Self::ExactlyOneThird => "exactly-one-third",
            Self::MoreThanOneThird => "more-than-one-third",
        }
    }

    /// Human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::LessThanOneThird => "less than 1/3 of total voting power",
            Self::ExactlyOneThird => "exactly 1/3 of total voting power",
            Self::MoreThanOneThird => "more than 1/3 of total voting power",
        }
    }
}

impl fmt::Display for VotingPowerScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VotingPowerScenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "less-than-one-third" => Ok(Self::LessThanOneThird),
            "exactly-one-third" => Ok(Self::ExactlyOneThird),
            "more-than-one-third" => Ok(Self::MoreThanOneThird),
            _ => Err(Error::invalid_config(format!(
                "unknown voting power scenario '{s}'"
            ))),
        }
    }
}

/// Outcome of [`select_validators`].
///
/// `achieved_voting_power` may differ from `target_voting_power`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorSelection {
    /// Selected node indices.
    pub validators: Vec<u32>,
    /// Sum over all participating validators.
    pub total_voting_power: u64,
    /// Scenario target.
    pub target_voting_power: u64,
    /// Sum over the selected validators.
    pub achieved_voting_power: u64,
    /// What the scenario aims for.
    pub scenario_description: String,
}

/// Select validators from `(index, voting_power)` pairs given in node order.
///
/// Greedy and single-match heuristics only; no subset search is performed.
pub fn select_validators<I>(validators: I, scenario: VotingPowerScenario) -> ValidatorSelection
where
    I: IntoIterator<Item = (u32, u64)>,
{
    let validators: Vec<(u32, u64)> = validators.into_iter().collect();
    let total: u64 = validators.iter().map(|(_, power)| power).sum();
    let third = total / 3;

    let (target, selected) = match scenario {
        VotingPowerScenario::LessThanOneThird => match third.checked_sub(1) {
            // A negative target admits no validator.
            None => (0, Vec::new()),
            Some(target) => {
                let mut best: Option<(u32, u64)> = None;
                for &(index, power) in &validators {
                    if power <= target && best.is_none_or(|(_, p)| power > p) {
                        best = Some((index, power));
                    }
                }
                (target, best.into_iter().collect())
            }
        },
        VotingPowerScenario::ExactlyOneThird => (
            third,
            validators
                .iter()
                .find(|(_, power)| *power == third)
                .copied()
                .into_iter()
                .collect(),
        ),
        VotingPowerScenario::MoreThanOneThird => {
            let target = third + 1;
            let mut ascending = validators.clone();
            ascending.sort_by_key(|(_, power)| *power);

            let mut picked = Vec::new();
            let mut sum = 0;
            for (index, power) in ascending {
                if sum >= target {
                    break;
                }
                sum += power;
                picked.push((index, power));
            }
            (target, picked)
        }
    };

    ValidatorSelection {
        validators: selected.iter().map(|(index, _)| *index).collect(),
        total_voting_power: total,
        target_voting_power: target,
        achieved_voting_power: selected.iter().map(|(_, power)| power).sum(),
        scenario_description: scenario.description().to_owned(),
    }
}
