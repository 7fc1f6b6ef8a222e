#[allow(clippy::all)]
#[allow(warnings)]
mod generated {
    include!("gen/mod.rs");
}
pub use generated::*;

mod error;
pub use error::*;

/// API version implemented by every service in the `v1` package.
pub const API_VERSION: &str = "v1";
