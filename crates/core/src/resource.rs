//! The schema trait shared by every record type.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kind::ResourceKind;
use crate::reference::ReferenceSet;

/// Which search input a field set is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// The card's own search box.
    Local,
    /// A term supplied by a parent view spanning several cards.
    Global,
}

/// A typed record of one API collection.
///
/// Implementations are plain serde structs; the trait only describes how the
/// generic card identifies, searches and exports them. The server is the
/// source of truth for field values, so nothing here validates.
pub trait Resource:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Form values sent on create. `Default` is the blank creation form.
    type Draft: Clone + fmt::Debug + Default + Serialize + DeserializeOwned + Send + Sync + 'static;

    const KIND: ResourceKind;

    /// Primary key (`<resource>_id`).
    fn id(&self) -> &str;

    /// Human-readable name used when this record is offered as a reference.
    fn label(&self) -> &str;

    /// Text fields consulted by the filter for `scope`.
    fn search_fields(&self, scope: SearchScope) -> Vec<&str>;

    /// One CSV line's cells, in [`ResourceKind::csv_header`] order.
    ///
    /// `refs` resolves foreign keys the server did not embed.
    fn csv_row(&self, refs: &ReferenceSet) -> Vec<String>;

    /// Extra lines shown under a single record, beyond the table columns.
    fn details(&self) -> Vec<String> {
        Vec::new()
    }
}
