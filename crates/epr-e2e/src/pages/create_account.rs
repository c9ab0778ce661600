//! Producer account-creation screens.
//!
//! The enrolment chain from the create-account form through to the producer
//! dashboard. No back-edges: every transition moves strictly forward.

use crate::driver::Driver;
use crate::notify::NotificationsClient;
use crate::pages::dashboard::ProducerDashboardPage;
use crate::pages::YesNo;
use crate::result::{EprError, EprResult};
use std::str::FromStr;
use tracing::info;

/// UK nation of the organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UkNation {
    /// England
    England,
    /// Scotland
    Scotland,
    /// Wales
    Wales,
    /// Northern Ireland
    NorthernIreland,
}

impl UkNation {
    /// DOM value carried by the corresponding radio input
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::England => "England",
            Self::Scotland => "Scotland",
            Self::Wales => "Wales",
            Self::NorthernIreland => "Northern Ireland",
        }
    }
}

impl FromStr for UkNation {
    type Err = EprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "england" => Ok(Self::England),
            "scotland" => Ok(Self::Scotland),
            "wales" => Ok(Self::Wales),
            "northern ireland" | "northern-ireland" => Ok(Self::NorthernIreland),
            _ => Err(EprError::InvalidChoice {
                field: "uk nation",
                value: s.to_string(),
            }),
        }
    }
}

/// Role of the enrolling person within the organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganisationRole {
    /// Company director
    Director,
    /// Company secretary
    CompanySecretary,
    /// Partner
    Partner,
    /// Member
    Member,
    /// None of the listed roles
    NoneOfTheAbove,
}

impl OrganisationRole {
    /// DOM value carried by the corresponding radio input
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Director => "Director",
            Self::CompanySecretary => "Company Secretary",
            Self::Partner => "Partner",
            Self::Member => "Member",
            Self::NoneOfTheAbove => "None of the above",
        }
    }
}

impl FromStr for OrganisationRole {
    type Err = EprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "director" => Ok(Self::Director),
            "company secretary" | "company-secretary" => Ok(Self::CompanySecretary),
            "partner" => Ok(Self::Partner),
            "member" => Ok(Self::Member),
            "none of the above" | "none" => Ok(Self::NoneOfTheAbove),
            _ => Err(EprError::InvalidChoice {
                field: "organisation role",
                value: s.to_string(),
            }),
        }
    }
}

// ==========================================================
// CreateAccountPage
// ==========================================================

const CREATE_ACCOUNT: &str = "CreateAccountPage";

const EMAIL_INPUT: &str = "#email";
const SEND_CODE_BUTTON: &str = "#emailVerificationControl_but_send_code";
const VERIFICATION_CODE_INPUT: &str = "#verificationCode";
const VERIFY_CODE_BUTTON: &str = "#emailVerificationControl_but_verify_code";
const NEW_PASSWORD_INPUT: &str = "#newPassword";
const RETYPE_PASSWORD_INPUT: &str = "#reenterPassword";
const CREATE_BUTTON: &str = "button#continue";

/// Account-creation form with email verification
#[derive(Debug)]
pub struct CreateAccountPage {
    driver: Driver,
}

impl CreateAccountPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Create a producer account: trigger the verification email, retrieve
    /// the code from the notifications feed, verify, and set the password.
    ///
    /// # Errors
    ///
    /// Fails with a navigation assertion if the form is absent, or
    /// [`EprError::MissingData`] if no verification code arrives.
    pub async fn create_producer_account(
        self,
        email: &str,
        password: &str,
        notifications: &NotificationsClient,
    ) -> EprResult<RegisteredCharityPage> {
        self.driver.fill(CREATE_ACCOUNT, EMAIL_INPUT, email).await?;
        self.driver.click(CREATE_ACCOUNT, SEND_CODE_BUTTON).await?;

        let code = notifications.fetch_verification_code(email).await?;
        info!(email, %code, "verification code retrieved");

        self.driver
            .fill(CREATE_ACCOUNT, VERIFICATION_CODE_INPUT, &code)
            .await?;
        self.driver.click(CREATE_ACCOUNT, VERIFY_CODE_BUTTON).await?;

        self.driver
            .fill(CREATE_ACCOUNT, NEW_PASSWORD_INPUT, password)
            .await?;
        self.driver
            .fill(CREATE_ACCOUNT, RETYPE_PASSWORD_INPUT, password)
            .await?;
        self.driver.click(CREATE_ACCOUNT, CREATE_BUTTON).await?;
        Ok(RegisteredCharityPage::new(self.driver))
    }
}

// ==========================================================
// RegisteredCharityPage
// ==========================================================

const REGISTERED_CHARITY: &str = "RegisteredCharityPage";

/// "Is the organisation a registered charity?"
#[derive(Debug)]
pub struct RegisteredCharityPage {
    driver: Driver,
}

impl RegisteredCharityPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Answer the charity question and continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the radio group is absent.
    pub async fn select_registered_charity(
        self,
        answer: YesNo,
    ) -> EprResult<RegisteredWithCompaniesHousePage> {
        let selector = format!(
            "input[name='isTheOrganisationCharity'][value='{}']",
            answer.value()
        );
        self.driver.click(REGISTERED_CHARITY, &selector).await?;
        self.driver.click_button(REGISTERED_CHARITY, "Continue").await?;
        Ok(RegisteredWithCompaniesHousePage::new(self.driver))
    }
}

// ==========================================================
// RegisteredWithCompaniesHousePage
// ==========================================================

const REGISTERED_WITH_CH: &str = "RegisteredWithCompaniesHousePage";

/// "Is the organisation registered with Companies House?"
#[derive(Debug)]
pub struct RegisteredWithCompaniesHousePage {
    driver: Driver,
}

impl RegisteredWithCompaniesHousePage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Answer the Companies House question and continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the radio group is absent.
    pub async fn select_registered_with_companies_house(
        self,
        answer: YesNo,
    ) -> EprResult<CompaniesHouseNumberPage> {
        let selector = format!(
            "input[name='IsTheOrganisationRegistered'][value='{}']",
            answer.value()
        );
        self.driver.click(REGISTERED_WITH_CH, &selector).await?;
        self.driver.click_button(REGISTERED_WITH_CH, "Continue").await?;
        Ok(CompaniesHouseNumberPage::new(self.driver))
    }
}

// ==========================================================
// CompaniesHouseNumberPage
// ==========================================================

const CH_NUMBER: &str = "CompaniesHouseNumberPage";

const CH_NUMBER_INPUT: &str = "#CompaniesHouseNumber";

/// Companies House number entry
#[derive(Debug)]
pub struct CompaniesHouseNumberPage {
    driver: Driver,
}

impl CompaniesHouseNumberPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Enter the company number and continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the input is absent.
    pub async fn enter_companies_house_number(
        self,
        company_number: &str,
    ) -> EprResult<ConfirmCompanyDetailsPage> {
        self.driver
            .fill(CH_NUMBER, CH_NUMBER_INPUT, company_number)
            .await?;
        self.driver.click_button(CH_NUMBER, "Continue").await?;
        Ok(ConfirmCompanyDetailsPage::new(self.driver))
    }
}

// ==========================================================
// ConfirmCompanyDetailsPage
// ==========================================================

const CONFIRM_DETAILS: &str = "ConfirmCompanyDetailsPage";

const CONFIRM_DETAILS_TEXT: &str =
    "Confirm your organisation’s details from Companies House";

/// Confirmation of the looked-up company details
#[derive(Debug)]
pub struct ConfirmCompanyDetailsPage {
    driver: Driver,
}

impl ConfirmCompanyDetailsPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the confirmation prompt is shown, then continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the prompt never appears.
    pub async fn confirm_company_details(self) -> EprResult<OrganisationNationPage> {
        self.driver
            .wait_for_body_text(CONFIRM_DETAILS, CONFIRM_DETAILS_TEXT)
            .await?;
        self.driver.click_button(CONFIRM_DETAILS, "Continue").await?;
        Ok(OrganisationNationPage::new(self.driver))
    }
}

// ==========================================================
// OrganisationNationPage
// ==========================================================

const ORG_NATION: &str = "OrganisationNationPage";

/// UK-nation selection
#[derive(Debug)]
pub struct OrganisationNationPage {
    driver: Driver,
}

impl OrganisationNationPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Select the organisation's nation and continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the radio group is absent.
    pub async fn select_nation(self, nation: UkNation) -> EprResult<RoleInOrganisationPage> {
        let selector = format!("input[name='UkNation'][value='{}']", nation.value());
        self.driver.click(ORG_NATION, &selector).await?;
        self.driver.click_button(ORG_NATION, "Continue").await?;
        Ok(RoleInOrganisationPage::new(self.driver))
    }
}

// ==========================================================
// RoleInOrganisationPage
// ==========================================================

const ROLE_IN_ORG: &str = "RoleInOrganisationPage";

/// Role-in-organisation selection
#[derive(Debug)]
pub struct RoleInOrganisationPage {
    driver: Driver,
}

impl RoleInOrganisationPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Select the person's role and continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the radio group is absent.
    pub async fn select_role(self, role: OrganisationRole) -> EprResult<FullNamePage> {
        let selector = format!("input[name='RoleInOrganisation'][value='{}']", role.value());
        self.driver.click(ROLE_IN_ORG, &selector).await?;
        self.driver.click_button(ROLE_IN_ORG, "Continue").await?;
        Ok(FullNamePage::new(self.driver))
    }
}

// ==========================================================
// FullNamePage
// ==========================================================

const FULL_NAME: &str = "FullNamePage";

const FIRST_NAME_INPUT: &str = "#FirstName";
const LAST_NAME_INPUT: &str = "#LastName";

/// Name entry
#[derive(Debug)]
pub struct FullNamePage {
    driver: Driver,
}

impl FullNamePage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Enter first and last name, then continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the inputs are absent.
    pub async fn enter_full_name(
        self,
        first_name: &str,
        last_name: &str,
    ) -> EprResult<TelephoneNumberPage> {
        self.driver.fill(FULL_NAME, FIRST_NAME_INPUT, first_name).await?;
        self.driver.fill(FULL_NAME, LAST_NAME_INPUT, last_name).await?;
        self.driver.click_button(FULL_NAME, "Continue").await?;
        Ok(TelephoneNumberPage::new(self.driver))
    }
}

// ==========================================================
// TelephoneNumberPage
// ==========================================================

const TELEPHONE: &str = "TelephoneNumberPage";

const TELEPHONE_INPUT: &str = "#TelephoneNumber";

/// Telephone-number entry
#[derive(Debug)]
pub struct TelephoneNumberPage {
    driver: Driver,
}

impl TelephoneNumberPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Enter the telephone number and continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the input is absent.
    pub async fn enter_telephone_number(
        self,
        telephone_number: &str,
    ) -> EprResult<CheckYourDetailsPage> {
        self.driver.fill(TELEPHONE, TELEPHONE_INPUT, telephone_number).await?;
        self.driver.click_button(TELEPHONE, "Continue").await?;
        Ok(CheckYourDetailsPage::new(self.driver))
    }
}

// ==========================================================
// CheckYourDetailsPage
// ==========================================================

const CHECK_DETAILS: &str = "CheckYourDetailsPage";

/// Review of the entered details
#[derive(Debug)]
pub struct CheckYourDetailsPage {
    driver: Driver,
}

impl CheckYourDetailsPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the review screen is shown, then continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the screen never appears.
    pub async fn confirm_details(self) -> EprResult<DeclarationPage> {
        self.driver
            .wait_for_body_text(CHECK_DETAILS, "Check your details")
            .await?;
        self.driver.click_button(CHECK_DETAILS, "Continue").await?;
        Ok(DeclarationPage::new(self.driver))
    }
}

// ==========================================================
// DeclarationPage
// ==========================================================

const DECLARATION: &str = "DeclarationPage";

/// Final declaration before account creation
#[derive(Debug)]
pub struct DeclarationPage {
    driver: Driver,
}

impl DeclarationPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Confirm and create the account
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the confirm button is absent.
    pub async fn confirm_and_create_account(self) -> EprResult<AccountCreatedPage> {
        self.driver
            .click_button(DECLARATION, "Confirm details and create account")
            .await?;
        Ok(AccountCreatedPage::new(self.driver))
    }
}

// ==========================================================
// AccountCreatedPage
// ==========================================================

const ACCOUNT_CREATED: &str = "AccountCreatedPage";

const NOTIFICATION_BANNER_TITLE: &str = "#govuk-notification-banner-title";

/// Landing screen after account creation
#[derive(Debug)]
pub struct AccountCreatedPage {
    driver: Driver,
}

impl AccountCreatedPage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Assert the success banner, then continue
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the banner never reads "Success".
    pub async fn verify_account_creation(self) -> EprResult<UsingCompliancePage> {
        self.driver
            .wait_for_text(ACCOUNT_CREATED, NOTIFICATION_BANNER_TITLE, "Success")
            .await?;
        self.driver.click_button(ACCOUNT_CREATED, "Continue").await?;
        Ok(UsingCompliancePage::new(self.driver))
    }
}

// ==========================================================
// UsingCompliancePage
// ==========================================================

const USING_COMPLIANCE: &str = "UsingCompliancePage";

/// "Are you using a compliance scheme?"
#[derive(Debug)]
pub struct UsingCompliancePage {
    driver: Driver,
}

impl UsingCompliancePage {
    /// Construct the page around a live session
    #[must_use]
    pub const fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Answer the compliance-scheme question and continue to the dashboard.
    ///
    /// The radio inputs carry boolean DOM values rather than Yes/No.
    ///
    /// # Errors
    ///
    /// Returns a navigation assertion if the radio group is absent.
    pub async fn select_using_compliance_scheme(
        self,
        answer: YesNo,
    ) -> EprResult<ProducerDashboardPage> {
        let value = match answer {
            YesNo::Yes => "true",
            YesNo::No => "false",
        };
        let selector = format!("input[name='UsingComplianceScheme'][value='{value}']");
        self.driver.click(USING_COMPLIANCE, &selector).await?;
        self.driver.click_button(USING_COMPLIANCE, "Continue").await?;
        Ok(ProducerDashboardPage::new(self.driver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod choice_enum_tests {
        use super::*;

        #[test]
        fn nation_values_match_dom() {
            assert_eq!(UkNation::England.value(), "England");
            assert_eq!(UkNation::NorthernIreland.value(), "Northern Ireland");
        }

        #[test]
        fn nation_parses_hyphenated_form() {
            assert_eq!(
                "northern-ireland".parse::<UkNation>().unwrap(),
                UkNation::NorthernIreland
            );
        }

        #[test]
        fn out_of_set_nation_is_invalid_choice() {
            let err = "Narnia".parse::<UkNation>().unwrap_err();
            assert!(matches!(
                err,
                EprError::InvalidChoice {
                    field: "uk nation",
                    ..
                }
            ));
        }

        #[test]
        fn role_values_match_dom() {
            assert_eq!(OrganisationRole::CompanySecretary.value(), "Company Secretary");
            assert_eq!(OrganisationRole::NoneOfTheAbove.value(), "None of the above");
        }

        #[test]
        fn out_of_set_role_is_invalid_choice() {
            assert!("intern".parse::<OrganisationRole>().is_err());
        }
    }

    #[cfg(not(feature = "browser"))]
    mod transition_tests {
        use super::*;
        use crate::driver::Action;
        use crate::pages::YesNo;

        #[tokio::test]
        async fn charity_answer_clicks_the_value_carrying_radio() {
            let driver = Driver::new();
            let page = RegisteredCharityPage::new(driver.clone());
            let _next = page.select_registered_charity(YesNo::No).await.unwrap();

            assert_eq!(
                driver.actions(),
                vec![
                    Action::Click {
                        css: "input[name='isTheOrganisationCharity'][value='No']".to_string(),
                    },
                    Action::ClickButton {
                        text: "Continue".to_string(),
                    },
                ]
            );
        }

        #[tokio::test]
        async fn compliance_answer_maps_to_boolean_dom_values() {
            let driver = Driver::new();
            let page = UsingCompliancePage::new(driver.clone());
            let _dashboard = page
                .select_using_compliance_scheme(YesNo::No)
                .await
                .unwrap();

            assert!(driver.actions().contains(&Action::Click {
                css: "input[name='UsingComplianceScheme'][value='false']".to_string(),
            }));
        }
    }
}
