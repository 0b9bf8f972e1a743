//! HTTP API for the facility assistant

mod handlers;
mod types;

pub use handlers::create_router;

use crate::collaborators::Responder;
use crate::db::Database;
use crate::navigation::Facility;
use crate::runtime::{DatabaseStorage, ProductionRuntime};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionRuntime>,
    pub db: Database,
}

impl AppState {
    pub fn new(facility: Arc<Facility>, db: Database, responder: Arc<dyn Responder>) -> Self {
        let storage = DatabaseStorage::new(db.clone());
        Self {
            runtime: Arc::new(ProductionRuntime::new(facility, storage, responder)),
            db,
        }
    }
}
