//! Warranty hierarchy and status engine: duration policy → expiration date,
//! expiration date → derived status, flat records → parent/sub tree, and the
//! list presentation policy (filter, search, display sort).

pub mod duration;
pub mod hierarchy;
pub mod status;
pub mod view;

pub use duration::{expiration_date, DurationPolicy, DATE_FORMAT};
pub use hierarchy::{assemble, WarrantyNode};
pub use status::{classify, classify_stored, ExpirationStatus};
pub use view::{present, StatusFilter};
