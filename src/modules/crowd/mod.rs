//! CrowdStock: crowd-funded stocking campaigns with a closed vote ceiling.
//!
//! A campaign is a monotonic vote counter: votes only ever increment by one,
//! and once the goal is reached the campaign is terminal. Proposals never
//! self-apply; the caller confirms and then registers the vote explicitly.

use serde::{Deserialize, Serialize};

use crate::scoring::{ActionProposal, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Open,
    Funded,
}

impl CampaignStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CampaignStatus::Open => "open",
            CampaignStatus::Funded => "funded",
        }
    }
}

/// A crowd testing campaign for a product the store does not stock yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdCampaign {
    pub campaign_id: String,
    pub item_name: String,
    pub votes_needed: u32,
    pub votes_current: u32,
    pub price_est: Money,
    pub status: CampaignStatus,
}

impl CrowdCampaign {
    /// Launch a campaign with a vote goal. A zero goal is already funded.
    pub fn launch(
        campaign_id: impl Into<String>,
        item_name: impl Into<String>,
        votes_needed: u32,
        price_est: Money,
    ) -> Self {
        let status = if votes_needed == 0 {
            CampaignStatus::Funded
        } else {
            CampaignStatus::Open
        };

        Self {
            campaign_id: campaign_id.into(),
            item_name: item_name.into(),
            votes_needed,
            votes_current: 0,
            price_est,
            status,
        }
    }

    pub fn funded(&self) -> bool {
        self.votes_current >= self.votes_needed
    }

    /// Funding progress as a percentage, capped at 100.
    pub fn progress_pct(&self) -> u32 {
        if self.votes_needed == 0 {
            return 100;
        }
        let pct = (u64::from(self.votes_current) * 100) / u64::from(self.votes_needed);
        pct.min(100) as u32
    }

    /// Apply a permitted vote. Increments by exactly one, flips the status to
    /// funded at the ceiling, and refuses anything past it.
    pub fn register_vote(&mut self) -> Result<VoteOutcome, VoteError> {
        if self.funded() {
            return Err(VoteError::CampaignClosed(self.campaign_id.clone()));
        }

        self.votes_current += 1;
        if self.funded() {
            self.status = CampaignStatus::Funded;
            Ok(VoteOutcome::FullyFunded)
        } else {
            Ok(VoteOutcome::Recorded)
        }
    }
}

/// Parameters of a permitted vote registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRegistration {
    pub campaign_id: String,
    pub next_votes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    Recorded,
    /// The vote that reached the goal; time to order stock.
    FullyFunded,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum VoteError {
    #[error("campaign '{0}' is fully funded; no further votes accepted")]
    CampaignClosed(String),
}

/// Vote policy: one more vote is permitted while the campaign is short of its
/// goal; a funded campaign is terminal.
pub fn propose_vote(campaign: &CrowdCampaign) -> ActionProposal<VoteRegistration> {
    if campaign.funded() {
        return ActionProposal::declined("campaign fully funded");
    }

    ActionProposal::Permitted {
        parameters: VoteRegistration {
            campaign_id: campaign.campaign_id.clone(),
            next_votes: campaign.votes_current + 1,
        },
    }
}
