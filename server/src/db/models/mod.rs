//! Database models
//!
//! Storage-side structures. Monetary fields are integer minor units
//! ([`shared::Cents`]); record links are [`surrealdb::RecordId`] serialized
//! as `table:id` strings on the wire.

pub mod serde_helpers;

pub mod bill;
pub mod distributor;
pub mod order;
pub mod product;

pub use bill::{Bill, BillDraft, BillItem, DamagedBillItem};
pub use distributor::{Distributor, DistributorCreate, DistributorUpdate};
pub use order::{DamagedProduct, Order, OrderItem, OrderUpdateData};
pub use product::{Product, ProductCreate, ProductUpdate};
