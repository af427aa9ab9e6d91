use nr_pipeline::{IngestWorkflow, ListingWorkflow};

pub struct AppState {
    pub ingest: IngestWorkflow,
    pub listing: ListingWorkflow,
}
