//! Storage-market subsystem.
//!
//! # Data Flow
//! ```text
//! Logical request (place order / top up prepaid)
//!     → builder.rs (call argument layout)
//!     → [signer, when the client holds one]
//!     → submitter.rs (broadcast, watch, fold events into a receipt)
//!     → status.rs (read-only order state queries)
//! ```

pub mod builder;
pub mod status;
pub mod submitter;

pub use status::{OrderStatus, Replica};
pub use submitter::Submitter;
