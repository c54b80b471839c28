//! Listing browsing and editing: the filter engine and the owner's forms.

pub mod filter;
pub mod form;

pub use filter::{filter, CategoryFilter, FilterCriteria, ListingBrowser, RawCriteria};
pub use form::{
    submit_draft, ConfirmedDelete, DeleteRequest, FormError, PropertyDraft, PropertyEditor, ValidListing,
    DELETE_FAILED, SAVE_FAILED,
};
