// Model exports
pub mod requests;
pub mod responses;

pub use requests::{FreeTextRequest, UrlHtmlRequest};
pub use responses::{
    Envelope, ErrorEnvelope, MatchResult, MatchedItem, MatchedProduct, SuccessEnvelope, Summary,
};
