use serde::{Deserialize, Serialize};

use crate::block::Level;

/// One stage of the five-period voting epoch, per spec §4.3's state
/// machine diagram (proposal → exploration → cooldown → promotion →
/// adoption). Earlier protocols skip `Cooldown`; the handler simply never
/// produces it for those protocols rather than the type distinguishing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodKind {
    Proposal,
    Exploration,
    Cooldown,
    Promotion,
    Adoption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodStatus {
    InProgress,
    NoProposal,
    NoQuorum,
    NoSupermajority,
    Successful,
}

/// [index (unique), epoch, kind, firstLevel, lastLevel, status, topUpvotes,
/// topRolls, proposalsCount, ballotQuorum?, participationEma?] per spec §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingPeriod {
    pub index: i32,
    pub epoch: i32,
    pub kind: PeriodKind,
    pub first_level: Level,
    pub last_level: Level,
    pub status: PeriodStatus,
    pub top_upvotes: i64,
    pub top_rolls: i64,
    pub proposals_count: i32,
    pub ballot_quorum: Option<u64>,
    pub participation_ema: Option<u64>,
    pub total_rolls: i64,
    pub yay_rolls: i64,
    pub nay_rolls: i64,
    pub pass_rolls: i64,
}

impl VotingPeriod {
    pub fn is_ballot_period(&self) -> bool {
        matches!(self.kind, PeriodKind::Exploration | PeriodKind::Promotion)
    }

    /// Quorum + supermajority check from spec §4.3 BallotCommit:
    /// `(yay/(yay+nay+pass)) ≥ period.ballotQuorum ∧ yay/(yay+nay) ≥ supermajority`.
    pub fn meets_quorum_and_supermajority(&self) -> bool {
        let total = self.yay_rolls + self.nay_rolls + self.pass_rolls;
        if total == 0 {
            return false;
        }
        let quorum = self.ballot_quorum.unwrap_or(0);
        let participation = (self.yay_rolls + self.nay_rolls + self.pass_rolls) as u128
            * crate::config::QUORUM_DENOMINATOR as u128
            / total as u128;
        if participation < quorum as u128 {
            return false;
        }
        let yay_nay = self.yay_rolls + self.nay_rolls;
        if yay_nay == 0 {
            return false;
        }
        let yay_share = self.yay_rolls as u128 * crate::config::SUPERMAJORITY_DENOMINATOR as u128
            / yay_nay as u128;
        yay_share >= crate::config::SUPERMAJORITY_NUMERATOR as u128
    }

    pub fn next_kind(&self, passed: bool) -> PeriodKind {
        match (self.kind, passed) {
            (PeriodKind::Proposal, true) => PeriodKind::Exploration,
            (PeriodKind::Proposal, false) => PeriodKind::Proposal,
            (PeriodKind::Exploration, true) => PeriodKind::Cooldown,
            (PeriodKind::Exploration, false) => PeriodKind::Proposal,
            (PeriodKind::Cooldown, _) => PeriodKind::Promotion,
            (PeriodKind::Promotion, true) => PeriodKind::Adoption,
            (PeriodKind::Promotion, false) => PeriodKind::Proposal,
            (PeriodKind::Adoption, _) => PeriodKind::Proposal,
        }
    }
}
