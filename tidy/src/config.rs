//! Configuration for the tidy command line
//!
//! CLI arguments and environment variable handling using clap.

use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use tidy_ledger::{LedgerConfig, OwnerId, Priority};

/// tidy - household chore ledger
#[derive(Parser, Debug, Clone)]
#[command(name = "tidy")]
#[command(about = "Chore completion rewards, quests and decorations for a TIDY household")]
pub struct Args {
    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "tidy")]
    pub mongodb_db: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,

    /// YAML file with the reward policy
    #[arg(long, env = "LEDGER_CONFIG")]
    pub ledger_config: Option<PathBuf>,

    /// Family whose ledger to operate on
    #[arg(long, env = "FAMILY_ID")]
    pub family_id: Option<String>,

    /// Act on this member's list instead of the family list
    #[arg(long, env = "MEMBER_ID")]
    pub member_id: Option<String>,

    /// Argon2 hash of the shared family access code
    #[arg(long, env = "ACCESS_CODE_HASH")]
    pub access_code_hash: Option<String>,

    /// Shared family access code
    #[arg(long, env = "ACCESS_CODE")]
    pub access_code: Option<String>,

    /// Enable development mode (skips the access code check)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the Argon2 hash of an access code for ACCESS_CODE_HASH
    HashCode { code: String },

    /// List chores
    Chores,
    /// Add a chore
    AddChore {
        title: String,
        #[arg(long)]
        priority: Option<Priority>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Remove a chore
    RemoveChore { chore_id: String },
    /// Check or uncheck a chore
    Toggle { chore_id: String },
    /// Replace the chore list with a JSON file and pay out first completions
    ApplyChores { file: PathBuf },

    /// Show the coin balance
    Balance,
    /// Show the currency history
    Transactions,

    /// List quests
    Quests {
        /// Only unclaimed quests
        #[arg(long, conflicts_with = "claimable")]
        active: bool,
        /// Only completed, unclaimed quests
        #[arg(long)]
        claimable: bool,
    },
    /// Create this period's quests that do not exist yet
    InitQuests,
    /// Claim a completed quest's reward
    Claim { quest_id: String },

    /// List decorations for sale
    Shop,
    /// Buy a decoration
    Buy { decoration_id: String },
    /// Show an owned decoration
    #[command(group(
        ArgGroup::new("selection")
            .required(true)
            .args(["decoration_id", "clear"])
    ))]
    Decorate {
        decoration_id: Option<String>,
        /// Clear the active decoration
        #[arg(long)]
        clear: bool,
    },

    /// List family members
    Members,
    /// Add a family member
    AddMember { name: String },
    /// Rename a family member
    RenameMember { member_id: String, name: String },
    /// Remove a family member
    RemoveMember { member_id: String },
}

impl Command {
    /// Whether the command works on ledger data (and so needs a session).
    pub fn needs_session(&self) -> bool {
        !matches!(self, Command::HashCode { .. })
    }
}

impl Args {
    /// Family id, if configured.
    pub fn family(&self) -> Option<OwnerId> {
        self.family_id.as_deref().map(OwnerId::from)
    }

    /// Log filter used when RUST_LOG is not set.
    pub fn default_log_filter(&self) -> String {
        format!(
            "tidy={level},tidy_ledger={level},info",
            level = self.log_level
        )
    }

    /// Read the reward policy file, or the defaults when none is set.
    pub fn load_ledger_config(&self) -> anyhow::Result<LedgerConfig> {
        match &self.ledger_config {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)?;
                Ok(LedgerConfig::from_yaml(&yaml)?)
            }
            None => Ok(LedgerConfig::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.command.needs_session() {
            return Ok(());
        }

        if self.family_id.as_deref().map_or(true, |f| f.trim().is_empty()) {
            return Err("FAMILY_ID is required".to_string());
        }

        if !self.dev_mode {
            if self.access_code_hash.is_none() {
                return Err("ACCESS_CODE_HASH is required outside development mode".to_string());
            }
            if self.access_code.is_none() {
                return Err("ACCESS_CODE is required outside development mode".to_string());
            }
        }

        Ok(())
    }
}
