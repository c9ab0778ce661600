//! Flow orchestrators.
//!
//! Each flow is a named async function that acquires a browser session,
//! drives the page graph end-to-end for one business scenario, and calls
//! the side-channel dependencies (verification bridge, registry lookup,
//! file generation) at the right points in the sequence.
//!
//! Session handling is centralised in [`run_flow`]: the session is acquired
//! once, the flow body runs against its driver, a diagnostic screenshot
//! keyed by flow name is captured on failure, and the session is released
//! on every exit path before the original error propagates.

pub mod enrolment;
pub mod packaging;
pub mod registration;

pub use enrolment::{producer_enrolment, regulator_accept_approved_person, EnrolmentResult};
pub use packaging::{create_pom_file, report_packaging_data};
pub use registration::{
    complete_registration_submission, create_org_file, regulator_grant_registration,
    submit_registration_data,
};

use crate::browser::{BrowserConfig, Session};
use crate::driver::Driver;
use crate::result::EprResult;
use std::future::Future;
use std::path::Path;
use tracing::{error, info, warn};

/// Shared inputs of every flow invocation
#[derive(Debug, Clone, Copy)]
pub struct FlowContext<'a> {
    /// Browser launch settings
    pub browser: &'a BrowserConfig,
    /// Where failure screenshots are written
    pub screenshots_dir: &'a Path,
}

/// Run one flow body inside a scoped browser session.
///
/// The session is always released — success, business failure, or
/// infrastructure failure — and a failure additionally captures
/// `<screenshots_dir>/<name>.png` before the error is re-raised.
pub(crate) async fn run_flow<T, F, Fut>(
    name: &'static str,
    ctx: FlowContext<'_>,
    body: F,
) -> EprResult<T>
where
    F: FnOnce(Driver) -> Fut,
    Fut: Future<Output = EprResult<T>>,
{
    info!(flow = name, "starting flow");
    let session = Session::launch(ctx.browser).await?;
    let result = body(session.driver()).await;

    if let Err(ref err) = result {
        error!(flow = name, error = %err, "flow failed");
        match session.capture_screenshot(name, ctx.screenshots_dir).await {
            Ok(path) => info!(flow = name, path = %path.display(), "failure screenshot captured"),
            Err(shot_err) => {
                warn!(flow = name, error = %shot_err, "failure screenshot could not be captured");
            }
        }
    }

    let closed = session.close().await;
    match (result, closed) {
        (Ok(value), Ok(())) => {
            info!(flow = name, "flow completed");
            Ok(value)
        }
        // A clean flow must not hide a leaked session
        (Ok(_), Err(close_err)) => Err(close_err),
        // The flow error wins over any close error
        (Err(err), _) => Err(err),
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::result::EprError;

    #[tokio::test]
    async fn failed_flow_leaves_a_screenshot_keyed_by_flow_name() {
        let dir = tempfile::tempdir().unwrap();
        let browser = BrowserConfig::default();
        let ctx = FlowContext {
            browser: &browser,
            screenshots_dir: dir.path(),
        };

        let result: EprResult<()> = run_flow("doomed_flow", ctx, |_driver| async {
            Err(EprError::MissingData {
                what: "anything",
                source_text: String::new(),
            })
        })
        .await;

        assert!(result.is_err());
        assert!(dir.path().join("doomed_flow.png").exists());
    }

    #[tokio::test]
    async fn successful_flow_takes_no_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let browser = BrowserConfig::default();
        let ctx = FlowContext {
            browser: &browser,
            screenshots_dir: dir.path(),
        };

        let value = run_flow("clean_flow", ctx, |_driver| async { Ok(42) })
            .await
            .unwrap();

        assert_eq!(value, 42);
        assert!(!dir.path().join("clean_flow.png").exists());
    }
}
