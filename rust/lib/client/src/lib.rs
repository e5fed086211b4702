//! TradeDesk HTTP client.
//!
//! [`ResourceClient`] is the storage collaborator for one master
//! collection on a `tradedeskd` server; it implements
//! [`tradedesk_records::Collection`] so the form and browser components
//! run unchanged against it. [`Session`] is the identity collaborator.
//! Requests carry the bearer token of a [`TokenSource`]; [`Session`] is
//! the one used by the CLI, [`NoAuth`] sends none.
//!
//! ```ignore
//! let session = Arc::new(Session::new("http://localhost:8080"));
//! session.sign_in("owner@example.com", "secret").await?;
//! let agents = ResourceClient::<Agent>::new("http://localhost:8080", session.clone());
//! let mut browser = RecordBrowser::new(Arc::new(agents));
//! browser.load().await?;
//! ```

mod error;
mod resource;
mod session;
mod token;

pub use error::ApiError;
pub use resource::ResourceClient;
pub use session::{CurrentUser, Session};
pub use token::{NoAuth, TokenSource};
