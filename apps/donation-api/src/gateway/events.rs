//! Wire format of the admin notification channel.
//!
//! Every frame is a JSON object tagged by `type`. The set of kinds is closed.

use serde::{Deserialize, Serialize};

use donation_common::time::now_iso8601;

use crate::models::donation::{Donation, DonationSummary, VerificationChange};
use crate::models::stats::DashboardStats;

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Sent once, to the new connection only.
    ConnectionEstablished {
        username: String,
        message: String,
        timestamp: String,
    },
    /// Reply to a client `ping`.
    Pong { timestamp: String },
    NewDonation {
        data: DonationSummary,
        timestamp: String,
    },
    /// Emitted for both verify and unverify; `data.is_verified` carries the state.
    DonationVerified {
        data: VerificationChange,
        timestamp: String,
    },
    StatsUpdate {
        data: DashboardStats,
        timestamp: String,
    },
}

impl ServerEvent {
    pub fn connection_established(username: &str) -> Self {
        Self::ConnectionEstablished {
            username: username.to_string(),
            message: "Real-time connection established".to_string(),
            timestamp: now_iso8601(),
        }
    }

    pub fn pong() -> Self {
        Self::Pong {
            timestamp: now_iso8601(),
        }
    }

    pub fn new_donation(donation: &Donation) -> Self {
        Self::NewDonation {
            data: DonationSummary::from(donation),
            timestamp: now_iso8601(),
        }
    }

    pub fn donation_verified(donation: &Donation) -> Self {
        Self::DonationVerified {
            data: VerificationChange::from(donation),
            timestamp: now_iso8601(),
        }
    }

    pub fn stats_update(stats: DashboardStats) -> Self {
        Self::StatsUpdate {
            data: stats,
            timestamp: now_iso8601(),
        }
    }

    /// The `type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionEstablished { .. } => "connection_established",
            Self::Pong { .. } => "pong",
            Self::NewDonation { .. } => "new_donation",
            Self::DonationVerified { .. } => "donation_verified",
            Self::StatsUpdate { .. } => "stats_update",
        }
    }
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// A message received from an admin client.
#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    RequestStats,
    /// Any other `type`. Ignored.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Parse a text frame. Anything that is not a JSON object with a string
    /// `type` field yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}
