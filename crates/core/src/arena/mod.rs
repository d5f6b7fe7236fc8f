//! Index-addressed stores.
//!
//! Every cross-reference inside a session is a typed index into one of these
//! stores. Indices stay valid across appends and are invalidated only by
//! `clear`/`release`.

mod store;
mod types;

pub use store::{ChildList, STORE_GROWTH, Store, StoreId};
pub use types::{ComplexId, FontId, RecordId, RectId};
