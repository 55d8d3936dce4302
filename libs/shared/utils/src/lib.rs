pub mod clock;
pub mod dates;
pub mod extractor;
pub mod tracking;

pub use clock::{Clock, ManualClock, SystemClock};
pub use extractor::AuthenticatedUser;
