//! millwright-card: the resource-card pattern, implemented once.
//!
//! A [`ResourceCard<R, A>`] owns one collection of `R` records fetched
//! through a [`ResourceApi`](millwright_api::ResourceApi) `A`:
//!
//! - **Fetcher**: [`ResourceCard::load`] reads the collection and its
//!   reference collections concurrently and commits all or nothing.
//! - **Filter view**: [`ResourceCard::visible`] applies the local and
//!   global search terms.
//! - **Mutation controller**: [`ResourceCard::create`],
//!   [`ResourceCard::update`] and [`ResourceCard::delete`] reconcile the
//!   store with what the server returns.
//! - **Exporter**: [`ResourceCard::export`] renders the projection as CSV.

mod card;
mod confirm;
mod notice;

pub use card::{DeleteOutcome, LoadState, ResourceCard};
pub use confirm::Confirm;
pub use notice::{Notice, NoticeKind};
