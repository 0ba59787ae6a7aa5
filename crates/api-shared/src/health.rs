use crate::wire::HealthRes;

/// Simple health service used by the REST API and the CLI.
pub struct HealthService;

impl HealthService {
    /// Returns a `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "upload tracker is alive".into(),
        }
    }
}
