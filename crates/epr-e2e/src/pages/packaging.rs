//! Packaging-data reporting screens.

use crate::driver::Driver;
use crate::result::EprResult;
use std::path::Path;

// ==========================================================
// ReportPackagingDataPage
// ==========================================================

const REPORT_LANDING: &str = "ReportPackagingDataPage";

const PERIOD_CARD: &str = "div.submission-period-card";

/// Reporting landing screen listing the open submission periods
#[derive(Debug)]
pub struct ReportPackagingDataPage {
    driver: Driver,
}

impl ReportPackagingDataPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Start reporting for the submission period with the given card text,
    /// e.g. `"January to June 2025 (large producers)"`
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if no card for the period exists.
    pub async fn start_report_for_period(
        self,
        period_text: &str,
    ) -> EprResult<ReportDataFileUploadPage> {
        let card_text = format!("Report packaging data for {period_text}");
        self.driver
            .click_in_container(REPORT_LANDING, PERIOD_CARD, &card_text, "Start now")
            .await?;
        Ok(ReportDataFileUploadPage::new(self.driver))
    }
}

// ==========================================================
// ReportDataFileUploadPage
// ==========================================================

const FILE_UPLOAD: &str = "ReportDataFileUploadPage";

const FILE_INPUT: &str = "#file";
const UPLOAD_BUTTON: &str = "[data-testid='pom-data-upload-button']";

/// Packaging-data CSV upload
#[derive(Debug)]
pub struct ReportDataFileUploadPage {
    driver: Driver,
}

impl ReportDataFileUploadPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Attach the generated packaging-data CSV and upload it
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the upload controls are absent.
    pub async fn upload_packaging_data(self, csv_path: &Path) -> EprResult<CheckWarningsPage> {
        self.driver.upload_file(FILE_UPLOAD, FILE_INPUT, csv_path).await?;
        self.driver.click(FILE_UPLOAD, UPLOAD_BUTTON).await?;
        Ok(CheckWarningsPage::new(self.driver))
    }
}

// ==========================================================
// CheckWarningsPage
// ==========================================================

const CHECK_WARNINGS: &str = "CheckWarningsPage";

const KEEP_SAME_FILE_RADIO: &str = "#UploadNewFile-1";

/// Validation-warnings screen offering a re-upload
#[derive(Debug)]
pub struct CheckWarningsPage {
    driver: Driver,
}

impl CheckWarningsPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Choose to keep the uploaded file despite warnings
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the radio is absent.
    pub async fn keep_same_file(&self) -> EprResult<()> {
        self.driver.click(CHECK_WARNINGS, KEEP_SAME_FILE_RADIO).await
    }

    /// Continue to the check-and-submit screen
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the continue button is absent.
    pub async fn continue_to_check(self) -> EprResult<CheckFileAndSubmitPage> {
        self.driver.click_button(CHECK_WARNINGS, "Continue").await?;
        Ok(CheckFileAndSubmitPage::new(self.driver))
    }
}

// ==========================================================
// CheckFileAndSubmitPage
// ==========================================================

const CHECK_AND_SUBMIT: &str = "CheckFileAndSubmitPage";

// En dash, as rendered by the service
const UPLOADED_HEADING: &str = "Packaging data uploaded – check and submit";

/// Check-and-submit review screen
#[derive(Debug)]
pub struct CheckFileAndSubmitPage {
    driver: Driver,
}

impl CheckFileAndSubmitPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the uploaded-check-and-submit heading
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_uploaded_heading(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading(CHECK_AND_SUBMIT, UPLOADED_HEADING)
            .await
    }

    /// Continue to the submission declaration
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the continue button is absent.
    pub async fn continue_to_declaration(self) -> EprResult<SubmissionDeclarationPage> {
        self.driver.click_button(CHECK_AND_SUBMIT, "Continue").await?;
        Ok(SubmissionDeclarationPage::new(self.driver))
    }
}

// ==========================================================
// SubmissionDeclarationPage
// ==========================================================

const DECLARATION: &str = "SubmissionDeclarationPage";

const DECLARATION_NAME_INPUT: &str = "#DeclarationName";
const SUBMIT_BUTTON: &str = "[data-testid='submission-declaration-button']";

/// Declaration before submitting packaging data
#[derive(Debug)]
pub struct SubmissionDeclarationPage {
    driver: Driver,
}

impl SubmissionDeclarationPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Enter the declarer's name and submit the file
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the controls are absent.
    pub async fn submit_with_name(
        self,
        full_name: &str,
    ) -> EprResult<SubmissionConfirmationPage> {
        self.driver
            .fill(DECLARATION, DECLARATION_NAME_INPUT, full_name)
            .await?;
        self.driver.click(DECLARATION, SUBMIT_BUTTON).await?;
        Ok(SubmissionConfirmationPage::new(self.driver))
    }
}

// ==========================================================
// SubmissionConfirmationPage
// ==========================================================

const CONFIRMATION: &str = "SubmissionConfirmationPage";

/// Submitted-to-regulator confirmation
#[derive(Debug)]
pub struct SubmissionConfirmationPage {
    driver: Driver,
}

impl SubmissionConfirmationPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the submitted-to-regulator heading
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_submitted(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading(
                CONFIRMATION,
                "Packaging data submitted to the environmental regulator",
            )
            .await
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::driver::Action;

    #[tokio::test]
    async fn period_card_click_is_scoped_to_the_card() {
        let driver = Driver::new();
        let page = ReportPackagingDataPage::new(driver.clone());
        let _upload = page
            .start_report_for_period("January to June 2025 (large producers)")
            .await
            .unwrap();

        assert_eq!(
            driver.actions(),
            vec![Action::ClickInContainer {
                css: "div.submission-period-card".to_string(),
                text: "Report packaging data for January to June 2025 (large producers)"
                    .to_string(),
                button: "Start now".to_string(),
            }]
        );
    }
}
