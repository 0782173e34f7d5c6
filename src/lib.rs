pub mod decoder;
pub mod error;
pub mod executor;
pub mod kv;
pub mod profile;
pub mod render;
pub mod request;
pub mod result_set;
pub mod session;

pub use error::{ConfigError, RequestError};
pub use executor::{ExecutorOptions, RequestExecutor};
pub use kv::{Entry, EntryId, KeyValueList};
pub use request::{BodyEncoding, ListKind, Method, RequestConfig};
pub use result_set::{PageSize, Record, ResultSet};
pub use session::Session;
