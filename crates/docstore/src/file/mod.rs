//! Adapters that put the blocking engine behind other interfaces.

pub mod async_store;
