//! Resource services: validation, identifiers, timestamps and persistence
//! for each resource type.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, error};

use crate::db::{Document, DocumentStore, FindOptions, SortDirection};
use crate::error::AppError;
use crate::models::Record;

pub mod appointment;
pub mod consultation;
pub mod emergency;
pub mod health_tips;

pub use appointment::AppointmentService;
pub use consultation::ConsultationService;
pub use emergency::EmergencyService;
pub use health_tips::HealthTipService;

/// Upper bound on documents returned by any list call.
pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Typed view of one store collection.
pub struct Collection<R> {
    store: Arc<dyn DocumentStore>,
    list_limit: usize,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            list_limit: self.list_limit,
            _record: PhantomData,
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new(store: Arc<dyn DocumentStore>, list_limit: usize) -> Self {
        Self {
            store,
            list_limit,
            _record: PhantomData,
        }
    }

    pub async fn insert(&self, record: &R) -> Result<(), AppError> {
        self.store.insert(R::COLLECTION, record.to_document()?).await?;
        debug!(collection = R::COLLECTION, id = record.id(), "record stored");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<R, AppError> {
        let document = self
            .store
            .find_one(R::COLLECTION, id)
            .await?
            .ok_or(AppError::NotFound(R::NAME))?;
        Self::decode(document)
    }

    pub async fn list(&self, sort: Option<(&'static str, SortDirection)>) -> Result<Vec<R>, AppError> {
        let mut options = FindOptions::limit(self.list_limit);
        if let Some((field, direction)) = sort {
            options = options.sorted_by(field, direction);
        }
        self.store
            .find_many(R::COLLECTION, &options)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Fails with `NotFound` when no document has this id.
    pub async fn update_fields(&self, id: &str, fields: Document) -> Result<(), AppError> {
        match self.store.update_fields(R::COLLECTION, id, fields).await? {
            0 => Err(AppError::NotFound(R::NAME)),
            _ => Ok(()),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        match self.store.delete(R::COLLECTION, id).await? {
            0 => Err(AppError::NotFound(R::NAME)),
            _ => Ok(()),
        }
    }

    fn decode(document: Document) -> Result<R, AppError> {
        let id = crate::db::document_id(&document).unwrap_or("<missing>").to_owned();
        R::from_document(document).map_err(|err| {
            error!(collection = R::COLLECTION, %id, error = %err, "stored document could not be decoded");
            err
        })
    }
}
