pub mod ingest;
pub mod listing;
pub mod request;
pub mod response;

pub use ingest::{IngestError, IngestOutcome, IngestWorkflow};
pub use listing::{ArticleListing, ListingWorkflow, SCAN_LIMIT};
pub use request::{EventBody, IngestEvent, IngestRequest, API_KEY_HEADER};
pub use response::{HandlerResponse, ResponseBody};

pub mod prelude {
    pub use super::{HandlerResponse, IngestEvent, IngestWorkflow, ListingWorkflow};
    pub use nr_core::{Article, DisplayArticle, Error, Result};
}
