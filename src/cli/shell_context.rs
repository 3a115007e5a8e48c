use crate::{
    config::{Config, ConfigManager},
    trip::{TripDraft, TripPlan},
    wallet::Wallet,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything one shell session owns: a single trip draft (and with it a
/// single budget allocator), the wallet, and the last submitted plan.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub draft: TripDraft,
    pub wallet: Wallet,
    pub last_plan: Option<TripPlan>,
    pub running: bool,
}
