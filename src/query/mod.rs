pub mod filter;
pub mod options;
pub mod params;

pub use filter::{FilterOp, QueryFilter};
pub use options::{RawRenderOptions, RenderOptions, validate};
pub use params::QueryParams;
