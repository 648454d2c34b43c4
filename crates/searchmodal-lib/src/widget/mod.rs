//! Behaviour model of the search modal.
//!
//! The modal is driven entirely through [`SearchSession::apply`]; everything
//! the page would render is read back through [`SearchSession::view`].
//! Searches are answered by a [`SearchBackend`], usually the [`DemoCatalog`]
//! fixture.

pub mod backend;
pub mod catalog;
pub mod filter;
pub mod request;
pub mod session;
pub mod view;

pub use backend::{SearchBackend, SearchPage, SearchQuery, SearchResult, TypeaheadSuggestion};
pub use catalog::DemoCatalog;
pub use filter::{ByCategory, FilterCategory, ResultKind, ResultTotals};
pub use request::{IssuedRequest, RequestEncoder, RequestKind};
pub use session::{ActionStatus, Phase, SearchSession, SessionSettings, UserAction};
pub use view::ModalView;
