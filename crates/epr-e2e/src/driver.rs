//! Element-level driver shared by every page object.
//!
//! The driver is a cloneable facade over the session's page exposing the
//! small set of interaction verbs the page graph needs: navigate, fill,
//! click (by selector or visible text), upload, and bounded-wait
//! assertions. Text-based lookups are executed as JavaScript through CDP
//! `Runtime.evaluate`; every wait polls with a bounded deadline and fails
//! with [`EprError::NavigationAssertion`] carrying the page identity and
//! the missing expectation.
//!
//! Suspension points are exactly the interaction and wait calls; a page
//! object never touches the browser outside of them.

// The JS builders below are exercised by the CDP driver only; the mock
// driver records actions instead of rendering them.
#![cfg_attr(not(feature = "browser"), allow(dead_code))]

use crate::result::{EprError, EprResult};
use std::time::Duration;

/// Default bounded wait for visibility/interaction assertions
pub const DEFAULT_WAIT: Duration = Duration::from_secs(10);

/// Extended wait for known-slow pages (e.g. file-upload processing)
pub const LONG_WAIT: Duration = Duration::from_secs(30);

/// Embed a Rust string into a generated JavaScript snippet as a literal
fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn js_fill(css: &str, value: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({css}); if (!el) return false; \
         el.focus(); el.value = {value}; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
         el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
         return true; }})()",
        css = js_str(css),
        value = js_str(value),
    )
}

fn js_click_css(css: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({css}); if (!el) return false; \
         el.click(); return true; }})()",
        css = js_str(css),
    )
}

fn js_click_button(text: &str) -> String {
    format!(
        "(() => {{ \
         const els = Array.from(document.querySelectorAll(\"button, input[type='submit'], [role='button']\")); \
         const el = els.find(e => ((e.innerText || e.value || '').trim() === {text})); \
         if (!el) return false; el.click(); return true; }})()",
        text = js_str(text),
    )
}

fn js_click_link(text: &str) -> String {
    format!(
        "(() => {{ \
         const el = Array.from(document.querySelectorAll(\"a, [role='link']\")) \
             .find(e => ((e.innerText || '').trim() === {text})); \
         if (!el) return false; el.click(); return true; }})()",
        text = js_str(text),
    )
}

fn js_check_label(label: &str) -> String {
    format!(
        "(() => {{ \
         const lab = Array.from(document.querySelectorAll('label')) \
             .find(l => ((l.innerText || '').trim() === {label})); \
         if (!lab) return false; \
         const input = lab.htmlFor ? document.getElementById(lab.htmlFor) : lab.querySelector('input'); \
         if (!input) return false; input.click(); return true; }})()",
        label = js_str(label),
    )
}

fn js_click_in_container(container_css: &str, container_text: &str, button_text: &str) -> String {
    format!(
        "(() => {{ \
         const cards = Array.from(document.querySelectorAll({ccss})) \
             .filter(c => (c.innerText || '').includes({ctext})); \
         if (!cards.length) return false; \
         const btn = Array.from(cards[0].querySelectorAll(\"button, a, [role='button']\")) \
             .find(b => ((b.innerText || '').trim() === {btext})); \
         if (!btn) return false; btn.click(); return true; }})()",
        ccss = js_str(container_css),
        ctext = js_str(container_text),
        btext = js_str(button_text),
    )
}

fn js_visible(css: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({css}); \
         return !!el && el.getClientRects().length > 0; }})()",
        css = js_str(css),
    )
}

fn js_text_equals(css: &str, expected: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({css}); \
         return !!el && ((el.innerText || '').trim() === {expected}); }})()",
        css = js_str(css),
        expected = js_str(expected),
    )
}

fn js_heading_visible(text: &str) -> String {
    format!(
        "(() => {{ \
         const els = Array.from(document.querySelectorAll(\"h1, h2, h3, h4, h5, h6, [role='heading']\")); \
         return els.some(e => ((e.innerText || '').trim() === {text}) && e.getClientRects().length > 0); }})()",
        text = js_str(text),
    )
}

fn js_heading_matching(pattern: &str) -> String {
    format!(
        "(() => {{ \
         const re = new RegExp({pattern}); \
         const els = Array.from(document.querySelectorAll(\"h1, h2, h3, h4, h5, h6, [role='heading']\")); \
         return els.some(e => re.test((e.innerText || '').trim()) && e.getClientRects().length > 0); }})()",
        pattern = js_str(pattern),
    )
}

fn js_body_contains(text: &str) -> String {
    format!(
        "(() => !!document.body && document.body.innerText.includes({text}))()",
        text = js_str(text),
    )
}

fn js_inner_text(css: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({css}); return el ? el.innerText : null; }})()",
        css = js_str(css),
    )
}

fn js_inner_text_containing(css: &str, marker: &str) -> String {
    format!(
        "(() => {{ \
         const el = Array.from(document.querySelectorAll({css})) \
             .find(e => (e.innerText || '').includes({marker})); \
         return el ? el.innerText : null; }})()",
        css = js_str(css),
        marker = js_str(marker),
    )
}

// ============================================================================
// Real CDP driver (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{
        js_body_contains, js_check_label, js_click_button, js_click_css, js_click_in_container,
        js_click_link, js_fill, js_heading_matching, js_heading_visible, js_inner_text,
        js_inner_text_containing, js_text_equals, js_visible, EprError, EprResult, DEFAULT_WAIT,
        LONG_WAIT,
    };
    use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
    use chromiumoxide::page::Page;
    use std::path::Path;
    use std::time::{Duration, Instant};

    /// Polling interval while waiting
    const POLL_INTERVAL: Duration = Duration::from_millis(200);

    /// Driver over a real CDP page
    #[derive(Debug, Clone)]
    pub struct Driver {
        page: Page,
    }

    impl Driver {
        /// Wrap a CDP page
        #[must_use]
        pub const fn new(page: Page) -> Self {
            Self { page }
        }

        pub(crate) const fn page(&self) -> &Page {
            &self.page
        }

        /// Navigate to a URL
        ///
        /// # Errors
        ///
        /// Returns [`EprError::Navigation`] if navigation fails.
        pub async fn goto(&self, url: &str) -> EprResult<()> {
            self.page
                .goto(url)
                .await
                .map_err(|e| EprError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn eval_bool(&self, js: &str) -> EprResult<bool> {
            let result = self.page.evaluate(js).await.map_err(|e| EprError::Page {
                message: e.to_string(),
            })?;
            Ok(result.into_value::<bool>().unwrap_or(false))
        }

        async fn eval_text(&self, js: &str) -> EprResult<Option<String>> {
            let result = self.page.evaluate(js).await.map_err(|e| EprError::Page {
                message: e.to_string(),
            })?;
            Ok(result.into_value::<Option<String>>().unwrap_or(None))
        }

        /// Poll a boolean snippet until it yields true or the deadline passes
        async fn poll_until(
            &self,
            page: &'static str,
            expectation: String,
            js: &str,
            timeout: Duration,
        ) -> EprResult<()> {
            let deadline = Instant::now() + timeout;
            loop {
                if self.eval_bool(js).await? {
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(EprError::NavigationAssertion {
                        page,
                        expectation,
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }

        /// Poll a text snippet until it yields a value or the deadline passes
        async fn poll_text(
            &self,
            page: &'static str,
            expectation: String,
            js: &str,
            timeout: Duration,
        ) -> EprResult<String> {
            let deadline = Instant::now() + timeout;
            loop {
                if let Some(text) = self.eval_text(js).await? {
                    return Ok(text);
                }
                if Instant::now() >= deadline {
                    return Err(EprError::NavigationAssertion {
                        page,
                        expectation,
                        timeout_ms: timeout.as_millis() as u64,
                    });
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }

        /// Fill an input located by CSS selector
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] if the element does not
        /// appear within the bounded wait.
        pub async fn fill(&self, page: &'static str, css: &str, value: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("fillable element {css}"),
                &js_fill(css, value),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Click an element located by CSS selector
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn click(&self, page: &'static str, css: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("clickable element {css}"),
                &js_click_css(css),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Click a button by its visible text
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn click_button(&self, page: &'static str, text: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("button {text:?}"),
                &js_click_button(text),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Click a link by its visible text
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn click_link(&self, page: &'static str, text: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("link {text:?}"),
                &js_click_link(text),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Check the input belonging to a label with the given visible text
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn check_label(&self, page: &'static str, label: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("labelled input {label:?}"),
                &js_check_label(label),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Inside the first container matching `container_css` whose text
        /// includes `container_text`, click the control with `button_text`
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn click_in_container(
            &self,
            page: &'static str,
            container_css: &str,
            container_text: &str,
            button_text: &str,
        ) -> EprResult<()> {
            self.poll_until(
                page,
                format!("{button_text:?} inside {container_css} containing {container_text:?}"),
                &js_click_in_container(container_css, container_text, button_text),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Attach a file to a file input located by CSS selector
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] if the input is absent,
        /// or [`EprError::Page`] if the CDP command fails.
        pub async fn upload_file(
            &self,
            page: &'static str,
            css: &str,
            path: &Path,
        ) -> EprResult<()> {
            self.poll_until(
                page,
                format!("file input {css}"),
                &js_visible(css),
                DEFAULT_WAIT,
            )
            .await?;

            // CDP requires an absolute path
            let absolute = path.canonicalize()?;
            let element = self
                .page
                .find_element(css)
                .await
                .map_err(|e| EprError::Page {
                    message: e.to_string(),
                })?;
            let params = SetFileInputFilesParams::builder()
                .files(vec![absolute.display().to_string()])
                .backend_node_id(element.backend_node_id)
                .build()
                .map_err(|e| EprError::Page { message: e })?;
            self.page
                .execute(params)
                .await
                .map_err(|e| EprError::Page {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Wait until an element is visible
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn wait_for_visible(&self, page: &'static str, css: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("visible element {css}"),
                &js_visible(css),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Wait until an element's trimmed text equals `expected`
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn wait_for_text(
            &self,
            page: &'static str,
            css: &str,
            expected: &str,
        ) -> EprResult<()> {
            self.poll_until(
                page,
                format!("{css} to read {expected:?}"),
                &js_text_equals(css, expected),
                DEFAULT_WAIT,
            )
            .await
        }

        /// [`Driver::wait_for_text`] with the extended bound for slow pages
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn wait_for_text_long(
            &self,
            page: &'static str,
            css: &str,
            expected: &str,
        ) -> EprResult<()> {
            self.poll_until(
                page,
                format!("{css} to read {expected:?}"),
                &js_text_equals(css, expected),
                LONG_WAIT,
            )
            .await
        }

        /// Wait for a visible heading with the exact text
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn wait_for_heading(&self, page: &'static str, text: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("heading {text:?}"),
                &js_heading_visible(text),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Wait for a visible heading matching a JS regular expression
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn wait_for_heading_matching(
            &self,
            page: &'static str,
            pattern: &str,
        ) -> EprResult<()> {
            self.poll_until(
                page,
                format!("heading matching /{pattern}/"),
                &js_heading_matching(pattern),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Wait until the page body contains the given text
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn wait_for_body_text(&self, page: &'static str, text: &str) -> EprResult<()> {
            self.poll_until(
                page,
                format!("body text {text:?}"),
                &js_body_contains(text),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Read the inner text of the element matching a CSS selector
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] if no such element
        /// appears within the bounded wait.
        pub async fn inner_text(&self, page: &'static str, css: &str) -> EprResult<String> {
            self.poll_text(
                page,
                format!("text of {css}"),
                &js_inner_text(css),
                DEFAULT_WAIT,
            )
            .await
        }

        /// Read the inner text of the first element matching `css` whose
        /// text includes `marker`
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] on timeout.
        pub async fn inner_text_containing(
            &self,
            page: &'static str,
            css: &str,
            marker: &str,
        ) -> EprResult<String> {
            self.poll_text(
                page,
                format!("text of {css} containing {marker:?}"),
                &js_inner_text_containing(css, marker),
                DEFAULT_WAIT,
            )
            .await
        }
    }
}

// ============================================================================
// Mock driver (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{EprError, EprResult, DEFAULT_WAIT};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    /// One recorded driver interaction
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Action {
        /// Navigation to a URL
        Goto(String),
        /// Fill of an input
        Fill {
            /// Selector
            css: String,
            /// Value typed
            value: String,
        },
        /// Click on a selector
        Click {
            /// Selector
            css: String,
        },
        /// Click on a button by text
        ClickButton {
            /// Button text
            text: String,
        },
        /// Click on a link by text
        ClickLink {
            /// Link text
            text: String,
        },
        /// Check of a labelled input
        CheckLabel {
            /// Label text
            label: String,
        },
        /// Scoped click inside a text-matched container
        ClickInContainer {
            /// Container selector
            css: String,
            /// Container text filter
            text: String,
            /// Button text
            button: String,
        },
        /// File upload
        UploadFile {
            /// File input selector
            css: String,
            /// Uploaded path
            path: PathBuf,
        },
        /// Visibility wait
        WaitVisible {
            /// Selector
            css: String,
        },
        /// Exact-text wait
        WaitText {
            /// Selector
            css: String,
            /// Expected text
            expected: String,
        },
        /// Heading wait
        WaitHeading {
            /// Heading text
            text: String,
        },
        /// Regex heading wait
        WaitHeadingMatching {
            /// Pattern
            pattern: String,
        },
        /// Body-text wait
        WaitBodyText {
            /// Expected fragment
            text: String,
        },
        /// Text read
        ReadText {
            /// Selector
            css: String,
        },
    }

    /// Recording driver for unit tests: every interaction is appended to an
    /// action log, and `inner_text` reads are served from scripted stubs.
    #[derive(Debug, Clone, Default)]
    pub struct Driver {
        actions: Arc<Mutex<Vec<Action>>>,
        texts: Arc<Mutex<HashMap<String, String>>>,
    }

    impl Driver {
        /// Create a new recording driver
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the text returned for a selector
        pub fn stub_text(&self, css: impl Into<String>, text: impl Into<String>) {
            let mut texts = self.texts.lock().expect("texts lock");
            let _ = texts.insert(css.into(), text.into());
        }

        /// Snapshot of all interactions recorded so far
        #[must_use]
        pub fn actions(&self) -> Vec<Action> {
            self.actions.lock().expect("actions lock").clone()
        }

        fn record(&self, action: Action) {
            self.actions.lock().expect("actions lock").push(action);
        }

        /// Record a navigation
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn goto(&self, url: &str) -> EprResult<()> {
            self.record(Action::Goto(url.to_string()));
            Ok(())
        }

        /// Record a fill
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn fill(&self, _page: &'static str, css: &str, value: &str) -> EprResult<()> {
            self.record(Action::Fill {
                css: css.to_string(),
                value: value.to_string(),
            });
            Ok(())
        }

        /// Record a click
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn click(&self, _page: &'static str, css: &str) -> EprResult<()> {
            self.record(Action::Click {
                css: css.to_string(),
            });
            Ok(())
        }

        /// Record a button click
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn click_button(&self, _page: &'static str, text: &str) -> EprResult<()> {
            self.record(Action::ClickButton {
                text: text.to_string(),
            });
            Ok(())
        }

        /// Record a link click
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn click_link(&self, _page: &'static str, text: &str) -> EprResult<()> {
            self.record(Action::ClickLink {
                text: text.to_string(),
            });
            Ok(())
        }

        /// Record a labelled-input check
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn check_label(&self, _page: &'static str, label: &str) -> EprResult<()> {
            self.record(Action::CheckLabel {
                label: label.to_string(),
            });
            Ok(())
        }

        /// Record a scoped container click
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn click_in_container(
            &self,
            _page: &'static str,
            container_css: &str,
            container_text: &str,
            button_text: &str,
        ) -> EprResult<()> {
            self.record(Action::ClickInContainer {
                css: container_css.to_string(),
                text: container_text.to_string(),
                button: button_text.to_string(),
            });
            Ok(())
        }

        /// Record a file upload
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn upload_file(
            &self,
            _page: &'static str,
            css: &str,
            path: &Path,
        ) -> EprResult<()> {
            self.record(Action::UploadFile {
                css: css.to_string(),
                path: path.to_path_buf(),
            });
            Ok(())
        }

        /// Record a visibility wait
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn wait_for_visible(&self, _page: &'static str, css: &str) -> EprResult<()> {
            self.record(Action::WaitVisible {
                css: css.to_string(),
            });
            Ok(())
        }

        /// Record an exact-text wait
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn wait_for_text(
            &self,
            _page: &'static str,
            css: &str,
            expected: &str,
        ) -> EprResult<()> {
            self.record(Action::WaitText {
                css: css.to_string(),
                expected: expected.to_string(),
            });
            Ok(())
        }

        /// Record an exact-text wait (extended bound)
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn wait_for_text_long(
            &self,
            page: &'static str,
            css: &str,
            expected: &str,
        ) -> EprResult<()> {
            self.wait_for_text(page, css, expected).await
        }

        /// Record a heading wait
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn wait_for_heading(&self, _page: &'static str, text: &str) -> EprResult<()> {
            self.record(Action::WaitHeading {
                text: text.to_string(),
            });
            Ok(())
        }

        /// Record a regex heading wait
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn wait_for_heading_matching(
            &self,
            _page: &'static str,
            pattern: &str,
        ) -> EprResult<()> {
            self.record(Action::WaitHeadingMatching {
                pattern: pattern.to_string(),
            });
            Ok(())
        }

        /// Record a body-text wait
        ///
        /// # Errors
        ///
        /// Never fails in mock mode.
        pub async fn wait_for_body_text(&self, _page: &'static str, text: &str) -> EprResult<()> {
            self.record(Action::WaitBodyText {
                text: text.to_string(),
            });
            Ok(())
        }

        /// Serve a scripted text read
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] when no stub is
        /// scripted for the selector.
        pub async fn inner_text(&self, page: &'static str, css: &str) -> EprResult<String> {
            self.record(Action::ReadText {
                css: css.to_string(),
            });
            let texts = self.texts.lock().expect("texts lock");
            texts.get(css).cloned().ok_or(EprError::NavigationAssertion {
                page,
                expectation: format!("text of {css}"),
                timeout_ms: DEFAULT_WAIT.as_millis() as u64,
            })
        }

        /// Serve a scripted text read (marker variant)
        ///
        /// # Errors
        ///
        /// Returns [`EprError::NavigationAssertion`] when no stub is
        /// scripted for the selector.
        pub async fn inner_text_containing(
            &self,
            page: &'static str,
            css: &str,
            _marker: &str,
        ) -> EprResult<String> {
            self.inner_text(page, css).await
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::Driver;

#[cfg(not(feature = "browser"))]
pub use mock::{Action, Driver};

#[cfg(test)]
mod tests {
    use super::*;

    mod js_rendering_tests {
        use super::*;

        #[test]
        fn strings_are_embedded_as_json_literals() {
            let js = js_fill("#email", "a\"b'c");
            assert!(js.contains(r##"document.querySelector("#email")"##));
            assert!(js.contains(r#""a\"b'c""#));
        }

        #[test]
        fn button_click_matches_trimmed_text() {
            let js = js_click_button("Continue");
            assert!(js.contains(r#""Continue""#));
            assert!(js.contains("input[type='submit']"));
        }

        #[test]
        fn heading_pattern_is_a_js_regexp() {
            let js = js_heading_matching(r"registration application for \d{4}");
            assert!(js.contains("new RegExp"));
            assert!(js.contains(r"\\d{4}"));
        }
    }

    #[cfg(not(feature = "browser"))]
    mod mock_driver_tests {
        use super::*;

        #[tokio::test]
        async fn records_interactions_in_order() {
            let driver = Driver::new();
            driver.goto("https://producer.example").await.unwrap();
            driver.fill("SigninPage", "#email", "a@b.test").await.unwrap();
            driver.click("SigninPage", "#next").await.unwrap();

            assert_eq!(
                driver.actions(),
                vec![
                    Action::Goto("https://producer.example".to_string()),
                    Action::Fill {
                        css: "#email".to_string(),
                        value: "a@b.test".to_string(),
                    },
                    Action::Click {
                        css: "#next".to_string(),
                    },
                ]
            );
        }

        #[tokio::test]
        async fn unstubbed_text_read_is_a_navigation_assertion() {
            let driver = Driver::new();
            let err = driver.inner_text("DashboardPage", "p.govuk-body").await;
            assert!(matches!(
                err,
                Err(crate::result::EprError::NavigationAssertion { page: "DashboardPage", .. })
            ));
        }

        #[tokio::test]
        async fn stubbed_text_is_served() {
            let driver = Driver::new();
            driver.stub_text("p.govuk-body", "Organisation ID: 123 456");
            let text = driver.inner_text("DashboardPage", "p.govuk-body").await.unwrap();
            assert_eq!(text, "Organisation ID: 123 456");
        }
    }
}
