//! Producer enrolment and regulator acceptance flows.

use crate::companies::CompaniesHouseClient;
use crate::driver::Driver;
use crate::flows::{run_flow, FlowContext};
use crate::notify::NotificationsClient;
use crate::pages::create_account::{OrganisationRole, UkNation};
use crate::pages::signin::SigninPage;
use crate::pages::YesNo;
use crate::result::{EprError, EprResult};
use tracing::info;

/// Output of the enrolment flow, read by the later submission flows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolmentResult {
    /// Organisation identifier extracted from the dashboard
    pub organisation_id: String,
    /// Account email
    pub email: String,
    /// Company legal name from the registry
    pub company_name: String,
    /// Company registry number
    pub company_number: String,
}

/// Personal details entered during enrolment
#[derive(Debug, Clone)]
pub struct EnrolmentDetails {
    /// Organisation nation
    pub nation: UkNation,
    /// Role of the enrolling person
    pub role: OrganisationRole,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Contact telephone number
    pub telephone_number: String,
}

impl Default for EnrolmentDetails {
    fn default() -> Self {
        Self {
            nation: UkNation::England,
            role: OrganisationRole::Director,
            first_name: "Automation".to_string(),
            last_name: "Testing".to_string(),
            telephone_number: "07777777777".to_string(),
        }
    }
}

/// Create a producer account and enrol the organisation.
///
/// Drives SignIn → CreateAccount → … → Dashboard: account creation with an
/// email-verification code from the notifications bridge, company selection
/// via the registry stream, and the remaining enrolment questions. Returns
/// the enrolment metadata after signing back out.
///
/// # Errors
///
/// Any navigation assertion, lookup failure, or missing extraction is fatal
/// and propagates after the failure screenshot is captured.
pub async fn producer_enrolment(
    ctx: FlowContext<'_>,
    producer_base_url: &str,
    email: &str,
    password: &str,
    details: &EnrolmentDetails,
    companies: &CompaniesHouseClient,
    notifications: &NotificationsClient,
) -> EprResult<EnrolmentResult> {
    run_flow("producer_enrolment", ctx, |driver| async move {
        enrolment_steps(
            driver,
            producer_base_url,
            email,
            password,
            details,
            companies,
            notifications,
        )
        .await
    })
    .await
}

async fn enrolment_steps(
    driver: Driver,
    producer_base_url: &str,
    email: &str,
    password: &str,
    details: &EnrolmentDetails,
    companies: &CompaniesHouseClient,
    notifications: &NotificationsClient,
) -> EprResult<EnrolmentResult> {
    driver.goto(producer_base_url).await?;

    let signin = SigninPage::new(driver);
    let create_account = signin.create_new_account().await?;
    let registered_charity = create_account
        .create_producer_account(email, password, notifications)
        .await?;

    let registered_with_ch = registered_charity
        .select_registered_charity(YesNo::No)
        .await?;
    let ch_number_page = registered_with_ch
        .select_registered_with_companies_house(YesNo::Yes)
        .await?;

    let found = companies.fetch_companies(1).await?;
    let company = found.first().ok_or_else(|| EprError::ExternalLookup {
        service: "company registry",
        message: "stream yielded no usable company records".to_string(),
    })?;
    info!(
        company_number = %company.company_number,
        company_name = %company.company_name,
        "company selected from registry"
    );

    let confirm_details = ch_number_page
        .enter_companies_house_number(&company.company_number)
        .await?;
    let nation_page = confirm_details.confirm_company_details().await?;
    let role_page = nation_page.select_nation(details.nation).await?;
    let full_name_page = role_page.select_role(details.role).await?;
    let telephone_page = full_name_page
        .enter_full_name(&details.first_name, &details.last_name)
        .await?;
    let check_details = telephone_page
        .enter_telephone_number(&details.telephone_number)
        .await?;
    let declaration = check_details.confirm_details().await?;
    let account_created = declaration.confirm_and_create_account().await?;
    let using_compliance = account_created.verify_account_creation().await?;
    let dashboard = using_compliance
        .select_using_compliance_scheme(YesNo::No)
        .await?;

    let organisation_id = dashboard.organisation_id(&company.company_name).await?;
    let _signin = dashboard.sign_out().await?;

    Ok(EnrolmentResult {
        organisation_id,
        email: email.to_string(),
        company_name: company.company_name.clone(),
        company_number: company.company_number.clone(),
    })
}

/// Regulator flow: accept the "approved person" of a freshly enrolled
/// organisation.
///
/// # Errors
///
/// Any navigation assertion is fatal and propagates after the failure
/// screenshot is captured.
pub async fn regulator_accept_approved_person(
    ctx: FlowContext<'_>,
    regulator_base_url: &str,
    email: &str,
    password: &str,
    company_name: &str,
) -> EprResult<()> {
    run_flow("regulator_accept_approved_person", ctx, |driver| async move {
        driver.goto(regulator_base_url).await?;

        let signin = SigninPage::new(driver);
        let home = signin.login_regulator(email, password).await?;
        let applications = home.manage_approved_person_applications().await?;
        applications.search_organisation(company_name).await?;
        applications.accept_approved_person(company_name).await
    })
    .await
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::companies::CompaniesHouseConfig;
    use crate::driver::Action;
    use crate::notify::NotifyConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn stub_external_endpoints() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "notifications": [{
                    "email_address": "fresh@example.test",
                    "body": "6-digit verification code:\n#112233\nThis code will expire in 10 minutes"
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":{"company_number":"01234567","company_name":"Acme Packaging Ltd"}}"#,
            ))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn enrolment_yields_digit_only_organisation_id() {
        let server = stub_external_endpoints().await;
        let companies = CompaniesHouseClient::new(
            CompaniesHouseConfig::new("token").with_base_url(server.uri()),
        );
        let notifications = NotificationsClient::new(
            NotifyConfig::new("iss", "secret").with_base_url(server.uri()),
        );

        let driver = Driver::new();
        driver.stub_text("p.govuk-body", "Organisation ID: 123 456");

        let result = enrolment_steps(
            driver.clone(),
            "https://producer.example",
            "fresh@example.test",
            "Password123",
            &EnrolmentDetails::default(),
            &companies,
            &notifications,
        )
        .await
        .unwrap();

        assert_eq!(
            result,
            EnrolmentResult {
                organisation_id: "123456".to_string(),
                email: "fresh@example.test".to_string(),
                company_name: "Acme Packaging Ltd".to_string(),
                company_number: "01234567".to_string(),
            }
        );

        // The retrieved verification code and company number reach the page graph
        let actions = driver.actions();
        assert!(actions.contains(&Action::Fill {
            css: "#verificationCode".to_string(),
            value: "112233".to_string(),
        }));
        assert!(actions.contains(&Action::Fill {
            css: "#CompaniesHouseNumber".to_string(),
            value: "01234567".to_string(),
        }));
        // The flow signs out at the end
        assert!(actions.contains(&Action::ClickLink {
            text: "Sign out".to_string(),
        }));
    }

    #[tokio::test]
    async fn empty_registry_stream_is_a_fatal_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "notifications": [{
                    "email_address": "fresh@example.test",
                    "body": "6-digit verification code: #1 This code will expire in 10 minutes"
                }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/companies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let companies = CompaniesHouseClient::new(
            CompaniesHouseConfig::new("token").with_base_url(server.uri()),
        );
        let notifications = NotificationsClient::new(
            NotifyConfig::new("iss", "secret").with_base_url(server.uri()),
        );

        let err = enrolment_steps(
            Driver::new(),
            "https://producer.example",
            "fresh@example.test",
            "Password123",
            &EnrolmentDetails::default(),
            &companies,
            &notifications,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            EprError::ExternalLookup {
                service: "company registry",
                ..
            }
        ));
    }
}
