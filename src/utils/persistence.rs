use std::{fs, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::{errors::Result, trip::TripPlan, wallet::Wallet};

/// Writes a submitted trip plan to disk atomically.
pub fn save_plan_to_file(plan: &TripPlan, path: &Path) -> Result<()> {
    save_json(plan, path)?;
    info!(trip = %plan.id, path = %path.display(), "trip plan saved");
    Ok(())
}

/// Reads a trip plan and rejects files whose contents break its invariants.
pub fn load_plan_from_file(path: &Path) -> Result<TripPlan> {
    let plan: TripPlan = load_json(path)?;
    plan.validate()?;
    info!(trip = %plan.id, path = %path.display(), "trip plan loaded");
    Ok(plan)
}

pub fn save_wallet_to_file(wallet: &Wallet, path: &Path) -> Result<()> {
    save_json(wallet, path)?;
    info!(cards = wallet.cards.len(), path = %path.display(), "wallet saved");
    Ok(())
}

pub fn load_wallet_from_file(path: &Path) -> Result<Wallet> {
    load_json(path)
}

/// Stages the JSON next to `path` and renames it into place, so a failed
/// write never clobbers the previous file.
fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
