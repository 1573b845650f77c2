// Offers module: per-card offers panel and the shared external script loader.

pub mod loader;
pub mod panel;

pub use loader::{HttpScriptSource, OffersScript, ScriptRegistry, DEFAULT_OFFERS_SCRIPT_URL};
pub use panel::OffersPanel;
