mod period;
mod proposal;
mod snapshot;

pub use period::{PeriodKind, PeriodStatus, VotingPeriod};
pub use proposal::{Proposal, ProposalStatus};
pub use snapshot::{SnapshotStatus, VotingSnapshot};

/// Outcome of closing out a voting period, driving what the cycle engine
/// (C6) and the registry (C4) do next: seal the period, open the
/// successor, and whether the epoch restarts from `Proposal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodOutcome {
    Advanced { next: PeriodKind },
    Aborted { next: PeriodKind },
}

/// Pure transition function for the five-period voting epoch (spec §4.3
/// diagram). Takes the period's closing rolls tallies and proposal quorum
/// parameters; returns what the successor period should be. Kept free of
/// storage/cache concerns so it can be unit- and property-tested directly.
pub fn transition(period: &VotingPeriod, total_rolls: i64, proposal_quorum_num: u64) -> PeriodOutcome {
    match period.kind {
        PeriodKind::Proposal => {
            let quorum_met = total_rolls > 0
                && period.top_rolls as u128 * crate::config::QUORUM_DENOMINATOR as u128
                    >= proposal_quorum_num as u128 * total_rolls as u128;
            if period.proposals_count > 0 && quorum_met {
                PeriodOutcome::Advanced {
                    next: PeriodKind::Exploration,
                }
            } else {
                PeriodOutcome::Aborted {
                    next: PeriodKind::Proposal,
                }
            }
        }
        PeriodKind::Exploration => {
            if period.meets_quorum_and_supermajority() {
                PeriodOutcome::Advanced {
                    next: PeriodKind::Cooldown,
                }
            } else {
                PeriodOutcome::Aborted {
                    next: PeriodKind::Proposal,
                }
            }
        }
        PeriodKind::Cooldown => PeriodOutcome::Advanced {
            next: PeriodKind::Promotion,
        },
        PeriodKind::Promotion => {
            if period.meets_quorum_and_supermajority() {
                PeriodOutcome::Advanced {
                    next: PeriodKind::Adoption,
                }
            } else {
                PeriodOutcome::Aborted {
                    next: PeriodKind::Proposal,
                }
            }
        }
        PeriodKind::Adoption => PeriodOutcome::Advanced {
            next: PeriodKind::Proposal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(kind: PeriodKind) -> VotingPeriod {
        VotingPeriod {
            index: 0,
            epoch: 0,
            kind,
            first_level: 1,
            last_level: 100,
            status: PeriodStatus::InProgress,
            top_upvotes: 0,
            top_rolls: 0,
            proposals_count: 0,
            ballot_quorum: Some(2000),
            participation_ema: None,
            total_rolls: 1000,
            yay_rolls: 0,
            nay_rolls: 0,
            pass_rolls: 0,
        }
    }

    #[test]
    fn proposal_with_no_proposals_stays_in_proposal() {
        let p = period(PeriodKind::Proposal);
        assert_eq!(
            transition(&p, 1000, 500),
            PeriodOutcome::Aborted {
                next: PeriodKind::Proposal
            }
        );
    }

    #[test]
    fn proposal_meeting_quorum_advances_to_exploration() {
        let mut p = period(PeriodKind::Proposal);
        p.proposals_count = 1;
        p.top_rolls = 600;
        assert_eq!(
            transition(&p, 1000, 500),
            PeriodOutcome::Advanced {
                next: PeriodKind::Exploration
            }
        );
    }

    #[test]
    fn exploration_without_supermajority_restarts_at_proposal() {
        let mut p = period(PeriodKind::Exploration);
        p.yay_rolls = 100;
        p.nay_rolls = 100;
        p.pass_rolls = 0;
        assert_eq!(
            transition(&p, 1000, 500),
            PeriodOutcome::Aborted {
                next: PeriodKind::Proposal
            }
        );
    }

    #[test]
    fn exploration_with_supermajority_advances_to_cooldown() {
        let mut p = period(PeriodKind::Exploration);
        p.yay_rolls = 900;
        p.nay_rolls = 10;
        p.pass_rolls = 0;
        assert_eq!(
            transition(&p, 1000, 500),
            PeriodOutcome::Advanced {
                next: PeriodKind::Cooldown
            }
        );
    }

    #[test]
    fn cooldown_always_advances_to_promotion() {
        let p = period(PeriodKind::Cooldown);
        assert_eq!(
            transition(&p, 1000, 500),
            PeriodOutcome::Advanced {
                next: PeriodKind::Promotion
            }
        );
    }

    #[test]
    fn adoption_always_restarts_at_proposal() {
        let p = period(PeriodKind::Adoption);
        assert_eq!(
            transition(&p, 1000, 500),
            PeriodOutcome::Advanced {
                next: PeriodKind::Proposal
            }
        );
    }
}
