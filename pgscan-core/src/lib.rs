mod as_value;
mod capability;
mod collect;
mod query;
mod scan;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use capability::*;
pub use collect::*;
pub use query::*;
pub use scan::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
