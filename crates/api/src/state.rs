//! Shared application state.

use std::sync::Arc;

use inventory_store::EntityStore;
use ledger::{Authenticator, CatalogService, LedgerService};
use reporting::ReportingService;

/// Services shared by every handler.
pub struct AppState<S: EntityStore> {
    pub catalog: CatalogService<S>,
    pub ledger: LedgerService<S>,
    pub reporting: ReportingService<S>,
    pub authenticator: Arc<dyn Authenticator>,
}
