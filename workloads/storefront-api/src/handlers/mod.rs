//! Route handlers.

pub(crate) mod cart;
pub(crate) mod payments;
pub(crate) mod products;
pub(crate) mod shipping;
pub(crate) mod webhook;
