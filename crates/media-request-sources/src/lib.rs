pub mod traits;
pub mod factory;
pub mod http;
pub mod notion;
pub mod tmdb;
pub mod deepseek;
pub mod arr;
pub mod error;

pub use traits::{AcquisitionService, MetadataProvider, RequestStore, SearchHit, TitleSuggester};
pub use factory::Services;
pub use error::SourceError;
pub use notion::NotionClient;
pub use tmdb::TmdbClient;
pub use deepseek::DeepseekClient;
pub use arr::{ArrClient, ArrKind};
