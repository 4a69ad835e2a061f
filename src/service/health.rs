use std::time::Duration;

use tracing::{debug, info};

use crate::api::client::{ServiceClient, PONG};
use crate::error::HarnessError;
use crate::service::process::ServiceProcess;

/// Block until the service answers `GET /ping` with `pong`.
///
/// Each of the `attempts` rounds first checks whether the process is still
/// alive and fails with [`HarnessError::ServiceExited`] if not. Request errors
/// inside the loop are swallowed. Once the budget is spent a final ping is
/// made whose error, or wrong body, is returned as is.
pub async fn wait_for_service(
    process: &mut ServiceProcess,
    client: &ServiceClient,
    attempts: u32,
    interval: Duration,
) -> Result<(), HarnessError> {
    for attempt in 1..=attempts {
        if let Some(status) = process.has_exited()? {
            return Err(HarnessError::ServiceExited(status));
        }

        match client.ping().await {
            Ok(body) if body == PONG => {
                info!(attempt, url = %client.base_url(), "Service is ready");
                return Ok(());
            }
            Ok(body) => debug!(attempt, body = %body, "Unexpected /ping body"),
            Err(e) => debug!(attempt, error = %e, "Service not reachable yet"),
        }

        tokio::time::sleep(interval).await;
    }

    let body = client.ping().await?;
    if body == PONG {
        Ok(())
    } else {
        Err(HarnessError::NotReady { body })
    }
}
