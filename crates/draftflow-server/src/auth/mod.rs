mod gate;
mod middleware;

pub use gate::{AuthFailure, AuthGate};
pub use middleware::require_bearer;
