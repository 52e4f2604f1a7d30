pub mod clock;
pub mod delay;
pub mod ids;
pub mod logging;

pub use clock::{Clock, FixedClock, SystemClock};
pub use delay::simulate_latency;
pub use ids::generate_id;
