use std::sync::Arc;

use showbill_core::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}
