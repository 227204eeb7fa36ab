pub(crate) mod health;
pub mod recognize;

pub use health::{health_check, hello};
pub use recognize::recognize;
