pub mod clients;
pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod messages;
pub mod orders;
pub mod plans;
pub mod query;
pub mod stages;
pub mod storage;
pub mod token;
pub mod trace;
pub mod warehouse;

pub use config::{load_config, Config, TokenKeyConfig};
pub use envelope::Reply;
pub use error::{ConfigError, Result, ServiceError, StorageError};
pub use query::{PageRequest, PageResult, SortDirection};
pub use storage::{MediaStore, MediaUpload, StagedMedia};
pub use token::{Claims, TokenError, TokenSealer};
pub use warehouse::{JobStatus, SegmentKind, WarehouseService};
