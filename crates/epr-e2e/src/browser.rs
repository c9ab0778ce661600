//! Browser session provider.
//!
//! Opens an isolated browsing session over the Chrome `DevTools` Protocol and
//! closes it deterministically (page first, then the browser process). When
//! compiled with the `browser` feature this drives a real chromium via
//! chromiumoxide; without the feature a mock session backs the same API so the
//! page graph and flows are testable without a browser.

use crate::driver::Driver;
use crate::result::EprResult;
use std::path::{Path, PathBuf};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

fn screenshot_path(flow_name: &str, out_dir: &Path) -> PathBuf {
    out_dir.join(format!("{flow_name}.png"))
}

// ============================================================================
// Real CDP implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{screenshot_path, BrowserConfig, Driver, EprResult};
    use crate::result::EprError;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams, CloseParams,
    };
    use futures::StreamExt;
    use std::path::{Path, PathBuf};

    /// One browser session: page, browser process, and the CDP event handler.
    ///
    /// Exclusively owned by the flow that launched it; released on every exit
    /// path by [`Session::close`], which consumes the session so a double
    /// close cannot compile.
    #[derive(Debug)]
    pub struct Session {
        driver: Driver,
        browser: CdpBrowser,
        handler: tokio::task::JoinHandle<()>,
    }

    impl Session {
        /// Launch a browser and open a fresh page.
        ///
        /// # Errors
        ///
        /// Returns [`EprError::BrowserLaunch`] if the browser cannot be
        /// started or the initial page cannot be created.
        pub async fn launch(config: &BrowserConfig) -> EprResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| EprError::BrowserLaunch { message: e })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| EprError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| EprError::Page {
                    message: e.to_string(),
                })?;

            Ok(Self {
                driver: Driver::new(page),
                browser,
                handler,
            })
        }

        /// Get a driver handle onto the session's page
        #[must_use]
        pub fn driver(&self) -> Driver {
            self.driver.clone()
        }

        /// Capture a diagnostic screenshot to `<out_dir>/<flow_name>.png`.
        ///
        /// # Errors
        ///
        /// Returns [`EprError::Screenshot`] if capture fails, or an I/O error
        /// if the file cannot be written.
        pub async fn capture_screenshot(
            &self,
            flow_name: &str,
            out_dir: &Path,
        ) -> EprResult<PathBuf> {
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let response = self
                .driver
                .page()
                .execute(params)
                .await
                .map_err(|e| EprError::Screenshot {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&response.data)
                .map_err(|e| EprError::Screenshot {
                    message: e.to_string(),
                })?;

            std::fs::create_dir_all(out_dir)?;
            let path = screenshot_path(flow_name, out_dir);
            std::fs::write(&path, bytes)?;
            Ok(path)
        }

        /// Close the session: browsing context first, then the browser
        /// process, then the event handler.
        ///
        /// # Errors
        ///
        /// Returns [`EprError::Page`] if the browser refuses to shut down.
        pub async fn close(self) -> EprResult<()> {
            let Self {
                driver,
                mut browser,
                handler,
            } = self;

            // Close the page's target before the process so pending
            // navigations unwind cleanly.
            let _ = driver.page().execute(CloseParams::default()).await;
            drop(driver);

            browser.close().await.map_err(|e| EprError::Page {
                message: e.to_string(),
            })?;
            let _ = handler.await;
            Ok(())
        }
    }
}

// ============================================================================
// Mock implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{screenshot_path, BrowserConfig, Driver, EprResult};
    use std::path::{Path, PathBuf};

    /// Mock session for unit testing without a browser
    #[derive(Debug)]
    pub struct Session {
        driver: Driver,
    }

    impl Session {
        /// Launch a mock session
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn launch(_config: &BrowserConfig) -> EprResult<Self> {
            Ok(Self {
                driver: Driver::new(),
            })
        }

        /// Get a driver handle onto the session's page
        #[must_use]
        pub fn driver(&self) -> Driver {
            self.driver.clone()
        }

        /// Record a screenshot capture (writes an empty marker file)
        ///
        /// # Errors
        ///
        /// Returns an I/O error if the marker file cannot be written.
        pub async fn capture_screenshot(
            &self,
            flow_name: &str,
            out_dir: &Path,
        ) -> EprResult<PathBuf> {
            std::fs::create_dir_all(out_dir)?;
            let path = screenshot_path(flow_name, out_dir);
            std::fs::write(&path, b"")?;
            Ok(path)
        }

        /// Close the mock session
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn close(self) -> EprResult<()> {
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::Session;

#[cfg(not(feature = "browser"))]
pub use mock::Session;
