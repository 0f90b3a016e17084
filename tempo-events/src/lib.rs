mod calendar;
mod client;
pub mod domain;
mod error;
mod events_url;
mod gateway;
mod memory;
mod recorder;
mod store;

pub use calendar::*;
pub use client::*;
pub use error::*;
pub use events_url::*;
pub use gateway::*;
pub use memory::*;
pub use recorder::*;
pub use store::*;
