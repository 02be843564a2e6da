mod connection;
mod util;
mod value_holder;

pub use connection::*;
pub use value_holder::*;
