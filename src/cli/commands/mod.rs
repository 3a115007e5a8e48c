pub mod budget;
pub mod config;
pub mod system;
pub mod trip;
pub mod wallet;

use super::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        budget::definitions(),
        trip::definitions(),
        wallet::definitions(),
        config::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}
