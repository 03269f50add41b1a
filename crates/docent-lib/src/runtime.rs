use crate::context::DocentContext;
use crate::db::driver::DatabaseDriver;
use crate::providers::ProviderFactory;
use crate::settings::Settings;

/// Everything a command needs, built once at startup.
pub struct Runtime {
    pub context: DocentContext,
    pub db: DatabaseDriver,
    pub settings: Settings,
    pub providers: Box<dyn ProviderFactory>,
}
