//! Walks the producer page graph end-to-end against the recording driver.
#![cfg(not(feature = "browser"))]

use epr_e2e::driver::{Action, Driver};
use epr_e2e::pages::create_account::{OrganisationRole, UkNation};
use epr_e2e::pages::signin::SigninPage;
use epr_e2e::pages::YesNo;

#[tokio::test]
async fn enrolment_path_reaches_the_dashboard_in_order() {
    let driver = Driver::new();
    driver.stub_text("p.govuk-body", "Organisation ID: 500 100");

    // The create-account form itself needs the notifications bridge (covered
    // by the flow tests), so this walk starts at the charity question.
    let charity = epr_e2e::pages::create_account::RegisteredCharityPage::new(driver.clone());
    let with_ch = charity.select_registered_charity(YesNo::No).await.unwrap();
    let ch_number = with_ch
        .select_registered_with_companies_house(YesNo::Yes)
        .await
        .unwrap();
    let confirm = ch_number
        .enter_companies_house_number("01234567")
        .await
        .unwrap();
    let nation = confirm.confirm_company_details().await.unwrap();
    let role = nation.select_nation(UkNation::England).await.unwrap();
    let name = role.select_role(OrganisationRole::Director).await.unwrap();
    let phone = name.enter_full_name("Automation", "Testing").await.unwrap();
    let check = phone.enter_telephone_number("07777777777").await.unwrap();
    let declaration = check.confirm_details().await.unwrap();
    let created = declaration.confirm_and_create_account().await.unwrap();
    let compliance = created.verify_account_creation().await.unwrap();
    let dashboard = compliance
        .select_using_compliance_scheme(YesNo::No)
        .await
        .unwrap();

    let organisation_id = dashboard.organisation_id("Acme Packaging Ltd").await.unwrap();
    assert_eq!(organisation_id, "500100");

    let actions = driver.actions();

    // Every radio click carries its DOM value
    assert!(actions.contains(&Action::Click {
        css: "input[name='isTheOrganisationCharity'][value='No']".to_string(),
    }));
    assert!(actions.contains(&Action::Click {
        css: "input[name='UkNation'][value='England']".to_string(),
    }));
    assert!(actions.contains(&Action::Click {
        css: "input[name='RoleInOrganisation'][value='Director']".to_string(),
    }));

    // The success banner is asserted before the dashboard is reached
    let banner = actions
        .iter()
        .position(|a| {
            *a == Action::WaitText {
                css: "#govuk-notification-banner-title".to_string(),
                expected: "Success".to_string(),
            }
        })
        .expect("banner asserted");
    let heading = actions
        .iter()
        .position(|a| {
            *a == Action::WaitHeading {
                text: "Account home - ACME PACKAGING LTD".to_string(),
            }
        })
        .expect("account-home heading asserted");
    assert!(banner < heading);
}

#[tokio::test]
async fn regulator_grant_path_orders_grant_before_reference_read() {
    let driver = Driver::new();
    driver.stub_text(
        "table",
        "Organisation ID and reference number\n500100\nR26EN1234567890",
    );

    let signin = SigninPage::new(driver.clone());
    let home = signin.login_regulator("reg@example.test", "pw").await.unwrap();
    let submissions = home.manage_registration_submissions().await.unwrap();
    submissions.search_organisation("Acme Packaging Ltd").await.unwrap();
    let details = submissions
        .select_organisation("Acme Packaging Ltd")
        .await
        .unwrap();
    let grant = details.grant_registration().await.unwrap();
    let details = grant.confirm_grant(YesNo::Yes).await.unwrap();
    let submissions = details.back_to_submissions().await.unwrap();
    submissions.search_organisation("Acme Packaging Ltd").await.unwrap();
    let reference = submissions.registration_reference().await.unwrap();

    assert_eq!(reference, "R26EN1234567890");

    let actions = driver.actions();
    let grant_click = actions
        .iter()
        .position(|a| {
            *a == Action::Click {
                css: "#grantRegistrationSubmissionButton".to_string(),
            }
        })
        .expect("grant confirmed");
    let reference_read = actions
        .iter()
        .position(|a| {
            *a == Action::ReadText {
                css: "table".to_string(),
            }
        })
        .expect("reference read");
    assert!(grant_click < reference_read);
}
