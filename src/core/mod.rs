pub mod error;
pub mod types;
pub mod value;

pub use error::{RenderError, Result};
pub use types::{OrderDirection, ResourceKey, Timestamps};
pub use value::Value;
