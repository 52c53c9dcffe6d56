//! Ledger operations, grouped by the part of the store they touch.
//!
//! Every operation is a method on [`Database`](crate::Database). Writes that
//! span several statements run in a single transaction; reads run directly
//! on the connection.

mod associations;
mod identity;
mod items;
mod meta;
mod queue;
mod scrapers;
mod tokens;

#[cfg(test)]
pub(crate) mod fixtures;
