//! Sign-in screen shared by both portals.

use crate::driver::Driver;
use crate::pages::create_account::CreateAccountPage;
use crate::pages::dashboard::ProducerDashboardPage;
use crate::pages::regulator::RegulatorHomePage;
use crate::result::EprResult;

const NAME: &str = "SigninPage";

const EMAIL_INPUT: &str = "#email";
const PASSWORD_INPUT: &str = "#password";
const NEXT_BUTTON: &str = "#next";
const CREATE_ACCOUNT_LINK: &str = "#createAccount";

/// The shared sign-in screen.
///
/// Both portals enter here; which dashboard the credentials land on is
/// decided by the portal URL, so the two outcomes are two distinct typed
/// transitions rather than one dynamic return.
#[derive(Debug)]
pub struct SigninPage {
    driver: Driver,
}

impl SigninPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    async fn submit_credentials(&self, email: &str, password: &str) -> EprResult<()> {
        self.driver.fill(NAME, EMAIL_INPUT, email).await?;
        self.driver.fill(NAME, PASSWORD_INPUT, password).await?;
        self.driver.click(NAME, NEXT_BUTTON).await
    }

    /// Sign in on the producer portal
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the sign-in form is absent.
    pub async fn login_producer(
        self,
        email: &str,
        password: &str,
    ) -> EprResult<ProducerDashboardPage> {
        self.submit_credentials(email, password).await?;
        Ok(ProducerDashboardPage::new(self.driver))
    }

    /// Sign in on the regulator portal
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the sign-in form is absent.
    pub async fn login_regulator(
        self,
        email: &str,
        password: &str,
    ) -> EprResult<RegulatorHomePage> {
        self.submit_credentials(email, password).await?;
        Ok(RegulatorHomePage::new(self.driver))
    }

    /// Start account creation
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the create-account link is absent.
    pub async fn create_new_account(self) -> EprResult<CreateAccountPage> {
        self.driver.click(NAME, CREATE_ACCOUNT_LINK).await?;
        Ok(CreateAccountPage::new(self.driver))
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::driver::Action;

    #[tokio::test]
    async fn login_fills_credentials_then_clicks_next() {
        let driver = Driver::new();
        let page = SigninPage::new(driver.clone());
        let _dashboard = page.login_producer("p@example.test", "pw").await.unwrap();

        assert_eq!(
            driver.actions(),
            vec![
                Action::Fill {
                    css: "#email".to_string(),
                    value: "p@example.test".to_string(),
                },
                Action::Fill {
                    css: "#password".to_string(),
                    value: "pw".to_string(),
                },
                Action::Click {
                    css: "#next".to_string(),
                },
            ]
        );
    }
}
