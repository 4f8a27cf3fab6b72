use std::sync::Arc;

use async_trait::async_trait;

use super::PowerResponder;
use crate::error::ResponderError;
use crate::table::Table;

/// Responder that resolves against an in-process [`Table`].
#[derive(Clone)]
pub struct LocalResponder {
    table: Arc<Table>,
}

impl LocalResponder {
    pub fn new(table: Arc<Table>) -> Self {
        Self { table }
    }
}

impl Default for LocalResponder {
    fn default() -> Self {
        Self::new(Arc::new(Table::new()))
    }
}

#[async_trait]
impl PowerResponder for LocalResponder {
    async fn resolve(&self, power: u32, name: &str) -> Result<u32, ResponderError> {
        Ok(self.table.resolve(power, name)?)
    }

    fn responder_id(&self) -> &str {
        "local"
    }
}
