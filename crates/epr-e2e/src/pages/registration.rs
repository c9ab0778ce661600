//! Registration-submission screens.
//!
//! Three branches hang off the registration task list: organisation-data
//! upload, fee payment, and application submission. Each branch is its own
//! typed chain; the task list is re-entered from the dashboard between
//! branches.

use crate::driver::Driver;
use crate::pages::dashboard::ProducerDashboardPage;
use crate::result::{EprError, EprResult};
use regex::Regex;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

const NOTIFICATION_BANNER_TITLE: &str = "#govuk-notification-banner-title";

/// How the registration fee is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// Offline bank transfer
    BankTransfer,
}

impl PaymentMethod {
    /// Selector of the radio input for this method
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::BankTransfer => "#PayByBankTransfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = EprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bank transfer" | "bank-transfer" => Ok(Self::BankTransfer),
            _ => Err(EprError::InvalidChoice {
                field: "payment method",
                value: s.to_string(),
            }),
        }
    }
}

// ==========================================================
// RegistrationGuidancePage
// ==========================================================

const GUIDANCE: &str = "RegistrationGuidancePage";

/// Registration guidance interstitial
#[derive(Debug)]
pub struct RegistrationGuidancePage {
    driver: Driver,
}

impl RegistrationGuidancePage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Continue past the guidance to the task list
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the continue button is absent.
    pub async fn continue_to_task_list(self) -> EprResult<RegistrationTaskListPage> {
        self.driver.click_button(GUIDANCE, "Continue").await?;
        Ok(RegistrationTaskListPage::new(self.driver))
    }
}

// ==========================================================
// RegistrationTaskListPage
// ==========================================================

const TASK_LIST: &str = "RegistrationTaskListPage";

/// Registration task list: root of the three submission branches
#[derive(Debug)]
pub struct RegistrationTaskListPage {
    driver: Driver,
}

impl RegistrationTaskListPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Enter the organisation-data submission branch
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn submit_registration_data(self) -> EprResult<UploadOrganisationDetailsPage> {
        self.driver
            .click_link(TASK_LIST, "Submit registration data")
            .await?;
        Ok(UploadOrganisationDetailsPage::new(self.driver))
    }

    /// Enter the fee-payment branch
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn view_registration_fee(self) -> EprResult<RegistrationFeeCalculationsPage> {
        self.driver
            .click_link(TASK_LIST, "View registration fee")
            .await?;
        Ok(RegistrationFeeCalculationsPage::new(self.driver))
    }

    /// Enter the application-submission branch
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn submit_registration_application(self) -> EprResult<AdditionalInformationPage> {
        self.driver
            .click_link(TASK_LIST, "Submit registration application")
            .await?;
        Ok(AdditionalInformationPage::new(self.driver))
    }
}

// ==========================================================
// UploadOrganisationDetailsPage
// ==========================================================

const UPLOAD_ORG: &str = "UploadOrganisationDetailsPage";

const FILE_INPUT: &str = "#file";

/// Organisation-details CSV upload
#[derive(Debug)]
pub struct UploadOrganisationDetailsPage {
    driver: Driver,
}

impl UploadOrganisationDetailsPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Attach the generated organisation CSV and upload it
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the upload controls are absent.
    pub async fn upload_organisation_details(
        self,
        csv_path: &Path,
    ) -> EprResult<OrganisationDetailsUploadedPage> {
        self.driver.upload_file(UPLOAD_ORG, FILE_INPUT, csv_path).await?;
        self.driver.click_button(UPLOAD_ORG, "Upload file").await?;
        Ok(OrganisationDetailsUploadedPage::new(self.driver))
    }
}

// ==========================================================
// OrganisationDetailsUploadedPage
// ==========================================================

const ORG_UPLOADED: &str = "OrganisationDetailsUploadedPage";

const UPLOADED_BANNER_HEADING: &str = "h3.govuk-notification-banner__heading";

/// Upload confirmation banner
#[derive(Debug)]
pub struct OrganisationDetailsUploadedPage {
    driver: Driver,
}

impl OrganisationDetailsUploadedPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the upload succeeded. Upload validation can take a while, so
    /// the banner wait uses the extended bound.
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the banner never confirms.
    pub async fn verify_uploaded(&self) -> EprResult<()> {
        self.driver
            .wait_for_text_long(ORG_UPLOADED, NOTIFICATION_BANNER_TITLE, "Success")
            .await?;
        self.driver
            .wait_for_text(
                ORG_UPLOADED,
                UPLOADED_BANNER_HEADING,
                "Organisation details uploaded",
            )
            .await
    }

    /// Continue to the review screen
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the continue link is absent.
    pub async fn continue_to_review(self) -> EprResult<ReviewOrganisationDataPage> {
        self.driver.click_link(ORG_UPLOADED, "Continue").await?;
        Ok(ReviewOrganisationDataPage::new(self.driver))
    }
}

// ==========================================================
// ReviewOrganisationDataPage
// ==========================================================

const REVIEW_ORG: &str = "ReviewOrganisationDataPage";

const SUBMIT_ORG_DETAILS_RADIO: &str = "#SubmitOrganisationDetailsResponse";

/// "Check files and submit" review screen
#[derive(Debug)]
pub struct ReviewOrganisationDataPage {
    driver: Driver,
}

impl ReviewOrganisationDataPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the review heading is shown
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_check_files_heading(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading(REVIEW_ORG, "Check files and submit")
            .await
    }

    /// Choose to submit the uploaded details and confirm
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the controls are absent.
    pub async fn select_and_confirm_submission(self) -> EprResult<RegistrationDeclarationPage> {
        self.driver.click(REVIEW_ORG, SUBMIT_ORG_DETAILS_RADIO).await?;
        self.driver.click_button(REVIEW_ORG, "Confirm").await?;
        Ok(RegistrationDeclarationPage::new(self.driver))
    }
}

// ==========================================================
// RegistrationDeclarationPage
// ==========================================================

const REG_DECLARATION: &str = "RegistrationDeclarationPage";

const FULL_NAME_INPUT: &str = "#FullName";

/// Declaration before file submission
#[derive(Debug)]
pub struct RegistrationDeclarationPage {
    driver: Driver,
}

impl RegistrationDeclarationPage {
    /// Construct the page around a live session
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
    ) -> EprResult<OrganisationDetailsConfirmationPage> {
        self.driver.fill(REG_DECLARATION, FULL_NAME_INPUT, full_name).await?;
        self.driver.click_button(REG_DECLARATION, "Submit file").await?;
        Ok(OrganisationDetailsConfirmationPage::new(self.driver))
    }
}

// ==========================================================
// OrganisationDetailsConfirmationPage
// ==========================================================

const ORG_CONFIRMATION: &str = "OrganisationDetailsConfirmationPage";

/// Organisation-details submission confirmation
#[derive(Debug)]
pub struct OrganisationDetailsConfirmationPage {
    driver: Driver,
}

impl OrganisationDetailsConfirmationPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the submission confirmation heading
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_submitted(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading(ORG_CONFIRMATION, "Organisation details submitted")
            .await
    }
}

// ==========================================================
// RegistrationFeeCalculationsPage
// ==========================================================

const FEE_CALCULATIONS: &str = "RegistrationFeeCalculationsPage";

/// Registration-fee breakdown
#[derive(Debug)]
pub struct RegistrationFeeCalculationsPage {
    driver: Driver,
}

impl RegistrationFeeCalculationsPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the fee heading is shown
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_fee_heading(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading(FEE_CALCULATIONS, "Registration fee")
            .await
    }

    /// Continue to payment-method selection
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the continue button is absent.
    pub async fn continue_to_payment(self) -> EprResult<SelectPaymentOptionsPage> {
        self.driver.click_button(FEE_CALCULATIONS, "Continue").await?;
        Ok(SelectPaymentOptionsPage::new(self.driver))
    }
}

// ==========================================================
// SelectPaymentOptionsPage
// ==========================================================

const PAYMENT_OPTIONS: &str = "SelectPaymentOptionsPage";

/// Payment-method selection
#[derive(Debug)]
pub struct SelectPaymentOptionsPage {
    driver: Driver,
}

impl SelectPaymentOptionsPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the payment heading is shown
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_payment_heading(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading(PAYMENT_OPTIONS, "How to pay your registration fee")
            .await
    }

    /// Select the payment method
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the radio is absent.
    pub async fn select_payment_method(&self, method: PaymentMethod) -> EprResult<()> {
        self.driver.click(PAYMENT_OPTIONS, method.selector()).await
    }

    /// Continue to the bank-transfer instructions
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the continue button is absent.
    pub async fn continue_to_bank_transfer(self) -> EprResult<PayByBankTransferPage> {
        self.driver.click_button(PAYMENT_OPTIONS, "Continue").await?;
        Ok(PayByBankTransferPage::new(self.driver))
    }
}

// ==========================================================
// PayByBankTransferPage
// ==========================================================

const BANK_TRANSFER: &str = "PayByBankTransferPage";

const RETURN_TO_DASHBOARD_LINK: &str = "a[href=\"/report-data/home-self-managed\"]";

/// Bank-transfer payment instructions
#[derive(Debug)]
pub struct PayByBankTransferPage {
    driver: Driver,
}

impl PayByBankTransferPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the fee-due heading is shown
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_fee_due(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading(BANK_TRANSFER, "Pay by bank transfer")
            .await
    }

    /// Return to the producer dashboard
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the dashboard link is absent.
    pub async fn return_to_dashboard(self) -> EprResult<ProducerDashboardPage> {
        self.driver.click(BANK_TRANSFER, RETURN_TO_DASHBOARD_LINK).await?;
        Ok(ProducerDashboardPage::new(self.driver))
    }
}

// ==========================================================
// AdditionalInformationPage
// ==========================================================

const ADDITIONAL_INFO: &str = "AdditionalInformationPage";

/// Additional information before application submission
#[derive(Debug)]
pub struct AdditionalInformationPage {
    driver: Driver,
}

impl AdditionalInformationPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Submit the registration application
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the submit button is absent.
    pub async fn submit_application(self) -> EprResult<SubmitRegistrationRequestPage> {
        self.driver
            .click_button(ADDITIONAL_INFO, "Submit registration application")
            .await?;
        Ok(SubmitRegistrationRequestPage::new(self.driver))
    }
}

// ==========================================================
// SubmitRegistrationRequestPage
// ==========================================================

const SUBMIT_REQUEST: &str = "SubmitRegistrationRequestPage";

const SUBMITTED_HEADING_PATTERN: &str =
    r"Your registration application for \d{4} has been submitted for approval";
const APPLICATION_REFERENCE_PANEL: &str = "div.govuk-panel__body";
const BACK_BUTTON: &str = "#Back";

/// Application submitted confirmation
#[derive(Debug)]
pub struct SubmitRegistrationRequestPage {
    driver: Driver,
}

impl SubmitRegistrationRequestPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the submitted-for-approval heading
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the heading never appears.
    pub async fn verify_submitted_for_approval(&self) -> EprResult<()> {
        self.driver
            .wait_for_heading_matching(SUBMIT_REQUEST, SUBMITTED_HEADING_PATTERN)
            .await
    }

    /// Extract the application reference number from the confirmation panel
    ///
    /// # Errors
    ///
    /// Returns [`EprError::MissingData`] with the raw panel text if the
    /// reference cannot be extracted.
    pub async fn application_reference(&self) -> EprResult<String> {
        let text = self
            .driver
            .inner_text_containing(
                SUBMIT_REQUEST,
                APPLICATION_REFERENCE_PANEL,
                "Application reference:",
            )
            .await?;

        let reference = text
            .rsplit("Application reference:")
            .next()
            .map(str::trim)
            .filter(|r| !r.is_empty() && !r.contains('\n'))
            .ok_or_else(|| EprError::MissingData {
                what: "application reference",
                source_text: text.clone(),
            })?
            .to_string();
        info!(%reference, "application reference extracted");
        Ok(reference)
    }

    /// Go back to the registration task list
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the back control is absent.
    pub async fn back_to_task_list(self) -> EprResult<RegistrationTaskListPage> {
        self.driver.click(SUBMIT_REQUEST, BACK_BUTTON).await?;
        Ok(RegistrationTaskListPage::new(self.driver))
    }
}

/// Extract a registration reference (`R<2 digits><2 letters><10+ digits>`)
/// from arbitrary table text.
///
/// # Errors
///
/// Returns [`EprError::MissingData`] with the searched text when no
/// reference is present.
pub(crate) fn extract_registration_reference(text: &str) -> EprResult<String> {
    let re = Regex::new(r"R\d{2}[A-Z]{2}\d{10,}").expect("valid regex");
    re.find(text.trim())
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| EprError::MissingData {
            what: "registration reference",
            source_text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod reference_extraction_tests {
        use super::*;

        #[test]
        fn finds_reference_in_table_text() {
            let text = "Organisation ID and reference number\n100123\nR26EN1234567890";
            assert_eq!(
                extract_registration_reference(text).unwrap(),
                "R26EN1234567890"
            );
        }

        #[test]
        fn short_digit_run_is_not_a_reference() {
            let err = extract_registration_reference("R26EN12345").unwrap_err();
            assert!(matches!(
                err,
                EprError::MissingData {
                    what: "registration reference",
                    ..
                }
            ));
        }
    }

    #[test]
    fn unknown_payment_method_is_invalid_choice() {
        let err = "cheque".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(
            err,
            EprError::InvalidChoice {
                field: "payment method",
                ..
            }
        ));
    }

    #[cfg(not(feature = "browser"))]
    mod application_reference_tests {
        use super::*;

        #[tokio::test]
        async fn reference_is_extracted_after_the_marker() {
            let driver = Driver::new();
            driver.stub_text("div.govuk-panel__body", "Application reference: PEPR-2026-0042");
            let page = SubmitRegistrationRequestPage::new(driver);

            assert_eq!(page.application_reference().await.unwrap(), "PEPR-2026-0042");
        }

        #[tokio::test]
        async fn panel_without_reference_is_missing_data() {
            let driver = Driver::new();
            driver.stub_text("div.govuk-panel__body", "Application reference:");
            let page = SubmitRegistrationRequestPage::new(driver);

            assert!(matches!(
                page.application_reference().await,
                Err(EprError::MissingData {
                    what: "application reference",
                    ..
                })
            ));
        }
    }
}
