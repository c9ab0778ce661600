//! Regulator portal screens.

use crate::driver::Driver;
use crate::pages::registration::extract_registration_reference;
use crate::pages::signin::SigninPage;
use crate::pages::YesNo;
use crate::result::EprResult;
use tracing::info;

const NOTIFICATION_BANNER_TITLE: &str = "#govuk-notification-banner-title";

// ==========================================================
// RegulatorHomePage
// ==========================================================

const HOME: &str = "RegulatorHomePage";

const MANAGE_APPLICATIONS_LINK: &str = "a[href=\"/regulators/applications\"]";
const MANAGE_REGISTRATION_SUBMISSIONS_LINK: &str =
    "a[href=\"/regulators/manage-registration-submissions\"]";
const SIGN_OUT_LINK: &str = "a[href=\"/regulators/Account/SignOut\"]";

/// Regulator home screen
#[derive(Debug)]
pub struct RegulatorHomePage {
    driver: Driver,
}

impl RegulatorHomePage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Open the approved/delegated-person applications list
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn manage_approved_person_applications(
        self,
    ) -> EprResult<RegulatorApplicationsPage> {
        self.driver.click(HOME, MANAGE_APPLICATIONS_LINK).await?;
        Ok(RegulatorApplicationsPage::new(self.driver))
    }

    /// Open the registration-submissions list
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn manage_registration_submissions(
        self,
    ) -> EprResult<ManageRegistrationSubmissionsPage> {
        self.driver
            .click(HOME, MANAGE_REGISTRATION_SUBMISSIONS_LINK)
            .await?;
        Ok(ManageRegistrationSubmissionsPage::new(self.driver))
    }

    /// Sign out of the regulator portal
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn sign_out(self) -> EprResult<SigninPage> {
        self.driver.click(HOME, SIGN_OUT_LINK).await?;
        Ok(SigninPage::new(self.driver))
    }
}

// ==========================================================
// RegulatorApplicationsPage
// ==========================================================

const APPLICATIONS: &str = "RegulatorApplicationsPage";

const SEARCH_ORG_NAME_INPUT: &str = "#SearchOrganisationName";
const ACCEPT_APPROVED_PERSON_BUTTON: &str = "#acceptApprovedPersonButton";

/// Approved-person applications list
#[derive(Debug)]
pub struct RegulatorApplicationsPage {
    driver: Driver,
}

impl RegulatorApplicationsPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Filter the list to one organisation
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the filter controls are absent.
    pub async fn search_organisation(&self, company_name: &str) -> EprResult<()> {
        self.driver
            .fill(APPLICATIONS, SEARCH_ORG_NAME_INPUT, company_name)
            .await?;
        self.driver.click_button(APPLICATIONS, "Apply filters").await
    }

    /// Open the organisation's application and accept its approved person,
    /// asserting the "Accepted" banner
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the row, the accept button, or the
    /// banner is absent.
    pub async fn accept_approved_person(&self, company_name: &str) -> EprResult<()> {
        self.driver
            .click_in_container(APPLICATIONS, "tr", company_name, "View")
            .await?;
        self.driver
            .click(APPLICATIONS, ACCEPT_APPROVED_PERSON_BUTTON)
            .await?;
        self.driver
            .wait_for_text(APPLICATIONS, NOTIFICATION_BANNER_TITLE, "Accepted")
            .await
    }
}

// ==========================================================
// ManageRegistrationSubmissionsPage
// ==========================================================

const SUBMISSIONS: &str = "ManageRegistrationSubmissionsPage";

const ORG_NAME_INPUT: &str = "#OrganisationName";
const SUBMISSIONS_TABLE: &str = "table";

/// Registration-submissions list
#[derive(Debug)]
pub struct ManageRegistrationSubmissionsPage {
    driver: Driver,
}

impl ManageRegistrationSubmissionsPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Filter the list to one organisation
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the filter controls are absent.
    pub async fn search_organisation(&self, company_name: &str) -> EprResult<()> {
        self.driver.fill(SUBMISSIONS, ORG_NAME_INPUT, company_name).await?;
        self.driver.click_button(SUBMISSIONS, "Apply filters").await
    }

    /// Open the submission details for an organisation
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if no link with the organisation name
    /// exists.
    pub async fn select_organisation(
        self,
        company_name: &str,
    ) -> EprResult<RegistrationSubmissionDetailsPage> {
        self.driver.click_link(SUBMISSIONS, company_name).await?;
        Ok(RegistrationSubmissionDetailsPage::new(self.driver))
    }

    /// Extract the granted registration reference number from the
    /// submissions table
    ///
    /// # Errors
    ///
    /// Returns [`EprError::MissingData`](crate::result::EprError) with the
    /// table text when no reference is present.
    pub async fn registration_reference(&self) -> EprResult<String> {
        let text = self
            .driver
            .inner_text_containing(SUBMISSIONS, SUBMISSIONS_TABLE, "reference")
            .await?;
        let reference = extract_registration_reference(&text)?;
        info!(%reference, "registration reference extracted");
        Ok(reference)
    }
}

// ==========================================================
// RegistrationSubmissionDetailsPage
// ==========================================================

const SUBMISSION_DETAILS: &str = "RegistrationSubmissionDetailsPage";

const BACK_LINK: &str = "a[href*='/regulators/registration-submission-details/']";

/// Details of one registration submission
#[derive(Debug)]
pub struct RegistrationSubmissionDetailsPage {
    driver: Driver,
}

impl RegistrationSubmissionDetailsPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Open the grant-registration screen
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn grant_registration(self) -> EprResult<GrantRegistrationPage> {
        self.driver
            .click_link(SUBMISSION_DETAILS, "Grant registration")
            .await?;
        Ok(GrantRegistrationPage::new(self.driver))
    }

    /// Return to the submissions list
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the back link is absent.
    pub async fn back_to_submissions(self) -> EprResult<ManageRegistrationSubmissionsPage> {
        self.driver.click(SUBMISSION_DETAILS, BACK_LINK).await?;
        Ok(ManageRegistrationSubmissionsPage::new(self.driver))
    }
}

// ==========================================================
// GrantRegistrationPage
// ==========================================================

const GRANT: &str = "GrantRegistrationPage";

const GRANT_CONTINUE_BUTTON: &str = "#grantRegistrationSubmissionButton";

/// Grant-registration confirmation question
#[derive(Debug)]
pub struct GrantRegistrationPage {
    driver: Driver,
}

impl GrantRegistrationPage {
    /// Wrap a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Answer the grant-confirmation question and continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the controls are absent.
    pub async fn confirm_grant(
        self,
        decision: YesNo,
    ) -> EprResult<RegistrationSubmissionDetailsPage> {
        self.driver.check_label(GRANT, decision.value()).await?;
        self.driver.click(GRANT, GRANT_CONTINUE_BUTTON).await?;
        Ok(RegistrationSubmissionDetailsPage::new(self.driver))
    }
}
