//! Order lifecycle types
//!
//! Status enums and the client-held checkout draft. The aggregate status of
//! a persisted order is partly derived from its line items; see the
//! lifecycle manager in `feira-server`.

mod draft;
mod status;

pub use draft::{DraftLine, DraftOrder};
pub use status::{ItemDecision, LineItemStatus, OrderScope, OrderStatus};
