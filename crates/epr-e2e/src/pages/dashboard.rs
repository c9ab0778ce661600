//! Producer dashboard ("Account home").

use crate::driver::Driver;
use crate::pages::packaging::ReportPackagingDataPage;
use crate::pages::registration::RegistrationGuidancePage;
use crate::pages::signin::SigninPage;
use crate::result::{EprError, EprResult};
use regex::Regex;

const NAME: &str = "ProducerDashboardPage";

const ORGANISATION_ID_PARAGRAPH: &str = "p.govuk-body";
const REPORT_PACKAGING_DATA_LINK: &str = "a[href=\"/report-data/file-upload-sub-landing\"]";

/// Producer dashboard, root of the registration and packaging-report graphs
#[derive(Debug)]
pub struct ProducerDashboardPage {
    driver: Driver,
}

impl ProducerDashboardPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Read the organisation ID off the dashboard.
    ///
    /// Asserts the account-home heading for the company first, then parses
    /// `"Organisation ID: 123 456"` and strips the grouping spaces.
    ///
    /// # Errors
    ///
    /// Returns [`EprError::MissingData`] with the raw paragraph text if the
    /// ID cannot be extracted.
    pub async fn organisation_id(&self, company_name: &str) -> EprResult<String> {
        let heading = format!("Account home - {}", company_name.to_uppercase());
        self.driver.wait_for_heading(NAME, &heading).await?;

        let text = self
            .driver
            .inner_text_containing(NAME, ORGANISATION_ID_PARAGRAPH, "Organisation ID:")
            .await?;

        let re = Regex::new(r"Organisation ID:\s*([\d ]+)").expect("valid regex");
        let id = re
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().replace(' ', ""))
            .filter(|id| !id.is_empty())
            .ok_or_else(|| EprError::MissingData {
                what: "organisation id",
                source_text: text.clone(),
            })?;
        Ok(id)
    }

    /// Sign out, asserting the signed-out confirmation
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if sign-out does not complete.
    pub async fn sign_out(self) -> EprResult<SigninPage> {
        self.driver.click_link(NAME, "Sign out").await?;
        self.driver.wait_for_heading(NAME, "Signed out").await?;
        Ok(SigninPage::new(self.driver))
    }

    /// Open the registration journey for a given year
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if no registration link for the year
    /// exists.
    pub async fn open_registration_for_year(
        self,
        year: &str,
    ) -> EprResult<RegistrationGuidancePage> {
        let selector = format!("a[href$='registrationyear={year}']");
        self.driver.click(NAME, &selector).await?;
        Ok(RegistrationGuidancePage::new(self.driver))
    }

    /// Open the packaging-data reporting journey
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the link is absent.
    pub async fn open_report_packaging_data(self) -> EprResult<ReportPackagingDataPage> {
        self.driver.click(NAME, REPORT_PACKAGING_DATA_LINK).await?;
        Ok(ReportPackagingDataPage::new(self.driver))
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn organisation_id_strips_grouping_spaces() {
        let driver = Driver::new();
        driver.stub_text("p.govuk-body", "Organisation ID: 123 456");
        let page = ProducerDashboardPage::new(driver);

        let id = page.organisation_id("Acme Packaging Ltd").await.unwrap();
        assert_eq!(id, "123456");
    }

    #[tokio::test]
    async fn missing_organisation_id_surfaces_raw_text() {
        let driver = Driver::new();
        driver.stub_text("p.govuk-body", "Nothing useful here");
        let page = ProducerDashboardPage::new(driver);

        let err = page.organisation_id("Acme Packaging Ltd").await.unwrap_err();
        match err {
            EprError::MissingData { what, source_text } => {
                assert_eq!(what, "organisation id");
                assert_eq!(source_text, "Nothing useful here");
            }
            other => panic!("expected MissingData, got {other}"),
        }
    }

    #[tokio::test]
    async fn heading_assertion_uses_uppercased_company_name() {
        let driver = Driver::new();
        driver.stub_text("p.govuk-body", "Organisation ID: 99");
        let page = ProducerDashboardPage::new(driver.clone());
        let _id = page.organisation_id("Acme Packaging Ltd").await.unwrap();

        assert!(driver.actions().contains(&crate::driver::Action::WaitHeading {
            text: "Account home - ACME PACKAGING LTD".to_string(),
        }));
    }
}
