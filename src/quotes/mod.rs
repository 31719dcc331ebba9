//! Quote collection: types, persistence and random selection

pub mod handler;
pub mod selector;
pub mod store;
pub mod types;

pub use handler::{quotes_router, QuotesState};
pub use store::QuoteStore;
pub use types::{
    default_quotes, CategoryOptions, IndexedQuote, Quote, ALL_CATEGORIES, NO_QUOTES_MESSAGE,
};
