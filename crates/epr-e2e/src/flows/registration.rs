//! Registration submission flows, producer and regulator side.

use crate::driver::Driver;
use crate::flows::enrolment::EnrolmentResult;
use crate::flows::{run_flow, FlowContext};
use crate::pages::registration::PaymentMethod;
use crate::pages::signin::SigninPage;
use crate::pages::YesNo;
use crate::result::EprResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generate the organisation-details CSV for one enrolled organisation
///
/// # Errors
///
/// Propagates template/IO errors from the CSV factory.
pub fn create_org_file(
    templates_dir: &Path,
    output_dir: &Path,
    enrolment: &EnrolmentResult,
) -> EprResult<PathBuf> {
    let template = templates_dir.join("org-file-template.csv");
    let output = output_dir.join(format!("org_{}.csv", enrolment.organisation_id));

    let row: HashMap<String, String> = [
        (
            "organisation_id".to_string(),
            enrolment.organisation_id.clone(),
        ),
        (
            "organisation_name".to_string(),
            enrolment.company_name.clone(),
        ),
        (
            "companies_house_number".to_string(),
            enrolment.company_number.clone(),
        ),
    ]
    .into();

    let written = crate::csvgen::create_csv_from_template(&template, &output, &[row])?;
    info!(path = %written.display(), "organisation CSV created");
    Ok(written)
}

/// Producer flow: upload and submit the organisation registration data for
/// a given registration year.
///
/// # Errors
///
/// Any navigation assertion or CSV failure is fatal and propagates after
/// the failure screenshot is captured.
#[allow(clippy::too_many_arguments)]
pub async fn submit_registration_data(
    ctx: FlowContext<'_>,
    producer_base_url: &str,
    password: &str,
    year: &str,
    enrolment: &EnrolmentResult,
    declarer_name: &str,
    templates_dir: &Path,
    output_dir: &Path,
) -> EprResult<()> {
    run_flow("submit_registration_data", ctx, |driver| async move {
        driver.goto(producer_base_url).await?;

        let signin = SigninPage::new(driver);
        let dashboard = signin.login_producer(&enrolment.email, password).await?;
        let guidance = dashboard.open_registration_for_year(year).await?;
        let task_list = guidance.continue_to_task_list().await?;
        let upload_page = task_list.submit_registration_data().await?;

        let org_file = create_org_file(templates_dir, output_dir, enrolment)?;
        let uploaded = upload_page.upload_organisation_details(&org_file).await?;
        uploaded.verify_uploaded().await?;

        let review = uploaded.continue_to_review().await?;
        review.verify_check_files_heading().await?;
        let declaration = review.select_and_confirm_submission().await?;
        let confirmation = declaration.submit_with_name(declarer_name).await?;
        confirmation.verify_submitted().await
    })
    .await
}

/// Producer flow: acknowledge the registration fee (bank transfer) and
/// submit the registration application. Returns the application reference.
///
/// # Errors
///
/// Any navigation assertion or missing extraction is fatal and propagates
/// after the failure screenshot is captured.
pub async fn complete_registration_submission(
    ctx: FlowContext<'_>,
    producer_base_url: &str,
    email: &str,
    password: &str,
    year: &str,
) -> EprResult<String> {
    run_flow("complete_registration_submission", ctx, |driver| async move {
        complete_registration_steps(driver, producer_base_url, email, password, year).await
    })
    .await
}

async fn complete_registration_steps(
    driver: Driver,
    producer_base_url: &str,
    email: &str,
    password: &str,
    year: &str,
) -> EprResult<String> {
    driver.goto(producer_base_url).await?;

    let signin = SigninPage::new(driver);
    let dashboard = signin.login_producer(email, password).await?;

    // Fee branch
    let guidance = dashboard.open_registration_for_year(year).await?;
    let task_list = guidance.continue_to_task_list().await?;
    let fee_page = task_list.view_registration_fee().await?;
    fee_page.verify_fee_heading().await?;
    let payment_options = fee_page.continue_to_payment().await?;
    payment_options.verify_payment_heading().await?;
    payment_options
        .select_payment_method(PaymentMethod::BankTransfer)
        .await?;
    let bank_transfer = payment_options.continue_to_bank_transfer().await?;
    bank_transfer.verify_fee_due().await?;
    let dashboard = bank_transfer.return_to_dashboard().await?;

    // Application branch, back through the task list
    let guidance = dashboard.open_registration_for_year(year).await?;
    let task_list = guidance.continue_to_task_list().await?;
    let additional_info = task_list.submit_registration_application().await?;
    let submitted = additional_info.submit_application().await?;
    submitted.verify_submitted_for_approval().await?;
    let reference = submitted.application_reference().await?;
    let _task_list = submitted.back_to_task_list().await?;
    Ok(reference)
}

/// Regulator flow: grant the registration of an organisation and extract
/// the granted registration reference.
///
/// # Errors
///
/// Any navigation assertion or missing extraction is fatal and propagates
/// after the failure screenshot is captured.
pub async fn regulator_grant_registration(
    ctx: FlowContext<'_>,
    regulator_base_url: &str,
    email: &str,
    password: &str,
    company_name: &str,
) -> EprResult<String> {
    run_flow("regulator_grant_registration", ctx, |driver| async move {
        driver.goto(regulator_base_url).await?;

        let signin = SigninPage::new(driver);
        let home = signin.login_regulator(email, password).await?;
        let submissions = home.manage_registration_submissions().await?;
        submissions.search_organisation(company_name).await?;
        let details = submissions.select_organisation(company_name).await?;
        let grant_page = details.grant_registration().await?;
        let details = grant_page.confirm_grant(YesNo::Yes).await?;
        let submissions = details.back_to_submissions().await?;
        submissions.search_organisation(company_name).await?;
        submissions.registration_reference().await
    })
    .await
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::driver::Action;

    fn enrolment() -> EnrolmentResult {
        EnrolmentResult {
            organisation_id: "100001".to_string(),
            email: "fresh@example.test".to_string(),
            company_name: "Acme Packaging Ltd".to_string(),
            company_number: "01234567".to_string(),
        }
    }

    #[test]
    fn org_file_carries_the_enrolment_fields() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(
            templates.join("org-file-template.csv"),
            "organisation_id,organisation_name,companies_house_number\n",
        )
        .unwrap();

        let written = create_org_file(&templates, &dir.path().join("out"), &enrolment()).unwrap();

        let contents = std::fs::read_to_string(&written).unwrap();
        assert!(written.ends_with("org_100001.csv"));
        assert!(contents.contains("100001,Acme Packaging Ltd,01234567"));
    }

    #[tokio::test]
    async fn fee_branch_selects_bank_transfer_before_continuing() {
        let driver = Driver::new();
        driver.stub_text("div.govuk-panel__body", "Application reference: PEPR-2026-0042");

        let reference = complete_registration_steps(
            driver.clone(),
            "https://producer.example",
            "fresh@example.test",
            "Password123",
            "2026",
        )
        .await
        .unwrap();

        assert_eq!(reference, "PEPR-2026-0042");

        let actions = driver.actions();
        let bank_transfer_click = actions
            .iter()
            .position(|a| {
                *a == Action::Click {
                    css: "#PayByBankTransfer".to_string(),
                }
            })
            .expect("bank transfer radio clicked");
        let registration_link_clicks: Vec<usize> = actions
            .iter()
            .enumerate()
            .filter(|(_, a)| {
                **a == Action::Click {
                    css: "a[href$='registrationyear=2026']".to_string(),
                }
            })
            .map(|(i, _)| i)
            .collect();

        // The year link is followed twice: fee branch, then application branch
        assert_eq!(registration_link_clicks.len(), 2);
        assert!(registration_link_clicks[0] < bank_transfer_click);
        assert!(bank_transfer_click < registration_link_clicks[1]);
    }
}
