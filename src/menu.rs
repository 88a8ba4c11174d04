//! Service menu pricing
//!
//! A read-only pricing table loaded once at startup, a stateless resolver
//! over it, and the payload-driven menu sub-flow that navigates
//! branch → category → length → price listing.

mod flow;
mod resolver;
mod table;

pub use flow::{MenuAction, MenuFlow};
pub use resolver::{MenuResolver, Resolution};
pub use table::MenuPricingTable;
