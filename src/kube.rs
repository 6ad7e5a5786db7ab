pub mod apis;
mod client;

pub use self::client::*;
