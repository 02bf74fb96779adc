//! Collaborator trait seams.
//!
//! Every outbound dependency of the pipeline (search backend, page fetcher,
//! translation service, enrichment webhook) sits behind one of these traits
//! so the pipeline can run against mocks in tests and against no-op
//! implementations when a collaborator is not configured.

pub mod delegate;
pub mod extractor;
pub mod searcher;
pub mod translator;

pub use delegate::{
    create_delegate, DelegateAction, NoopDelegate, ResearchDelegate, WebhookDelegate,
    LOCAL_WORKFLOW_ID,
};
pub use extractor::Extractor;
pub use searcher::{SearchHit, WebSearcher};
pub use translator::{create_translator, HttpTranslator, NoopTranslator, Translator};
