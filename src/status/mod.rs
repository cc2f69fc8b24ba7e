pub mod http;
pub mod simulated;
pub mod snapshot;
pub mod source;

pub use http::HttpStatusSource;
pub use simulated::{OutcomePicker, SimulatedJob};
pub use snapshot::{JobStatus, StatusSnapshot};
pub use source::StatusSource;
