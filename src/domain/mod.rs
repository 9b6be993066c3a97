//! Business rules with no I/O: everything here is deterministic and unit
//! tested without a database.

pub mod cart;
pub mod checkout;
pub mod payment;
pub mod pricing;
pub mod promo;
