//! One-shot flash messages carried in the session cookie.
//!
//! A handler that redirects queues a message; the next page read drains it.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;

pub(crate) const FLASHES_KEY: &str = "_flashes";

/// Presentation category of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    /// Completed action worth highlighting, such as a deletion.
    Warning,
    /// Failed action.
    Danger,
}

/// A message queued for the next page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    /// How the message should be styled.
    pub category: FlashCategory,
    /// Text shown to the user.
    #[schema(example = "Student Ana Cruz Deleted Successfully")]
    pub message: String,
}

impl FlashMessage {
    /// Build a message in the given category.
    #[must_use]
    pub fn new(category: FlashCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

/// Session-backed flash queue extracted from requests.
#[derive(Clone)]
pub struct Flashes(Session);

impl Flashes {
    /// Wrap an Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Append a message to the pending queue.
    pub fn push(&self, flash: FlashMessage) -> Result<(), Error> {
        let mut pending = self.pending()?;
        pending.push(flash);
        self.0
            .insert(FLASHES_KEY, pending)
            .map_err(|error| Error::internal(format!("failed to persist flash: {error}")))
    }

    /// Take every pending message, leaving the queue empty.
    pub fn drain(&self) -> Result<Vec<FlashMessage>, Error> {
        let pending = self.pending()?;
        if !pending.is_empty() {
            self.0.remove(FLASHES_KEY);
        }
        Ok(pending)
    }

    fn pending(&self) -> Result<Vec<FlashMessage>, Error> {
        self.0
            .get::<Vec<FlashMessage>>(FLASHES_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read flashes: {error}")))
    }
}

impl FromRequest for Flashes {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Flashes::new) })
    }
}
