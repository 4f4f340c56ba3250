/// Core functionality modules
///
/// Contains the request pipeline: normalizing and classifying text,
/// matching and listing terms, and rendering replies.

pub mod alias;
pub mod classifier;
pub mod dispatcher;
pub mod formatter;
pub mod listing;
pub mod matcher;
pub mod normalizer;
pub mod responder;
pub mod similarity;

pub use classifier::{Classifier, Command, Intent};
pub use dispatcher::{
    DeleteOutcome, Dispatcher, LookupOutcome, Request, SetOutcome, Stats,
};
pub use formatter::Formatter;
pub use listing::{Listing, ListingParams, SortOrder};
pub use responder::{BufferedResponder, Reply, Responder, Response, RichMessage, Visibility};
