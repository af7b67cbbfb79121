//! Types of the generic text-generation contract.

pub mod generation;
pub mod message;
pub mod results;
pub mod stream;
pub mod usage;
pub mod warning;

pub use generation::*;
pub use message::*;
pub use results::*;
pub use stream::*;
pub use usage::*;
pub use warning::*;
