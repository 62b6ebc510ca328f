//! Command dispatch for the tidy binary.
//!
//! Commands run against any [`LedgerStore`], so they are exercised in tests
//! with the in-memory store.

use anyhow::Context;
use chrono::Utc;
use serde_json::{json, Value};
use tidy_ledger::{hash_access_code, ChoreLedger, LedgerError, OwnerId, Session};
use tracing::info;

use crate::config::{Args, Command};

/// Log in with the configured access code and select the member, if any.
pub async fn open_session(ledger: &ChoreLedger, args: &Args) -> anyhow::Result<Session> {
    let family_id = args.family().context("FAMILY_ID is required")?;

    let session = match (&args.access_code, &args.access_code_hash) {
        (Some(code), Some(hash)) => Session::login(code, hash, family_id)?,
        _ if args.dev_mode => {
            info!(family = %family_id, "Development mode, skipping access code");
            Session {
                family_id,
                member_id: None,
                started_at: Utc::now(),
            }
        }
        _ => {
            return Err(LedgerError::Unauthorized("access code not configured".to_string()).into())
        }
    };

    match args.member_id.as_deref() {
        Some(member) => {
            let member_id = OwnerId::from(member);
            let known = ledger
                .members(&session.family_id)
                .await?
                .iter()
                .any(|m| m.id == member_id);
            if !known {
                return Err(LedgerError::NotFound(format!("member '{}'", member_id)).into());
            }
            Ok(session.with_member(member_id))
        }
        None => Ok(session),
    }
}

/// Run a command that needs no ledger access.
pub fn run_offline(command: &Command) -> anyhow::Result<Option<Value>> {
    match command {
        Command::HashCode { code } => Ok(Some(json!({ "hash": hash_access_code(code)? }))),
        _ => Ok(None),
    }
}

/// Run a ledger command and return its result as JSON.
pub async fn execute(
    ledger: &ChoreLedger,
    session: &Session,
    command: Command,
) -> anyhow::Result<Value> {
    let owner = session.owner();
    let family = &session.family_id;
    let now = Utc::now();

    let output = match command {
        Command::HashCode { code } => json!({ "hash": hash_access_code(&code)? }),

        Command::Chores => json!(ledger.chores(owner).await?),
        Command::AddChore {
            title,
            priority,
            due,
        } => json!(ledger.add_chore(owner, &title, priority, due, now).await?),
        Command::RemoveChore { chore_id } => json!(ledger.remove_chore(owner, &chore_id).await?),
        Command::Toggle { chore_id } => json!(ledger.toggle_chore(owner, &chore_id, now).await?),
        Command::ApplyChores { file } => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let chores = tidy_ledger::parse_chore_list(&body)?;
            json!(ledger.apply_chore_update(owner, chores).await?)
        }

        Command::Balance => json!({ "balance": ledger.balance(owner).await? }),
        Command::Transactions => json!(ledger.transactions(owner).await?),

        Command::Quests { active, claimable } => {
            let quests = if claimable {
                ledger.claimable_quests(owner).await?
            } else if active {
                ledger.active_quests(owner).await?
            } else {
                ledger.quests(owner).await?
            };
            json!(quests)
        }
        Command::InitQuests => json!({ "created": ledger.initialize_quests(owner, now).await? }),
        Command::Claim { quest_id } => json!(ledger.claim_quest(owner, &quest_id).await?),

        Command::Shop => json!(ledger.shop(owner).await?),
        Command::Buy { decoration_id } => {
            json!({ "balance": ledger.purchase_decoration(owner, &decoration_id).await? })
        }
        Command::Decorate {
            decoration_id,
            clear,
        } => {
            let selection = if clear { None } else { decoration_id.as_deref() };
            json!(ledger.set_active_decoration(owner, selection).await?)
        }

        Command::Members => json!(ledger.members(family).await?),
        Command::AddMember { name } => json!(ledger.add_member(family, &name, now).await?),
        Command::RenameMember { member_id, name } => {
            json!(ledger.rename_member(family, &OwnerId::from(member_id), &name).await?)
        }
        Command::RemoveMember { member_id } => {
            let member_id = OwnerId::from(member_id);
            ledger.remove_member(family, &member_id).await?;
            json!({ "removed": member_id })
        }
    };

    Ok(output)
}
