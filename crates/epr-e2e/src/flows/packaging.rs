//! Packaging-data reporting flow.

use crate::driver::Driver;
use crate::flows::{run_flow, FlowContext};
use crate::pages::signin::SigninPage;
use crate::result::EprResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Generate the packaging-data (POM) CSV for one organisation
///
/// # Errors
///
/// Propagates template/IO errors from the CSV factory.
pub fn create_pom_file(
    templates_dir: &Path,
    output_dir: &Path,
    organisation_id: &str,
) -> EprResult<PathBuf> {
    let template = templates_dir.join("pom-file-template.csv");
    let output = output_dir.join(format!("pom_{organisation_id}.csv"));

    let row: HashMap<String, String> =
        [("organisation_id".to_string(), organisation_id.to_string())].into();

    let written = crate::csvgen::create_csv_from_template(&template, &output, &[row])?;
    info!(path = %written.display(), "POM CSV created");
    Ok(written)
}

/// Producer flow: report packaging data for a submission period and submit
/// it to the regulator.
///
/// # Errors
///
/// Any navigation assertion or CSV failure is fatal and propagates after
/// the failure screenshot is captured.
#[allow(clippy::too_many_arguments)]
pub async fn report_packaging_data(
    ctx: FlowContext<'_>,
    producer_base_url: &str,
    email: &str,
    password: &str,
    organisation_id: &str,
    period: &str,
    declarer_name: &str,
    templates_dir: &Path,
    output_dir: &Path,
) -> EprResult<()> {
    run_flow("report_packaging_data", ctx, |driver| async move {
        packaging_steps(
            driver,
            producer_base_url,
            email,
            password,
            organisation_id,
            period,
            declarer_name,
            templates_dir,
            output_dir,
        )
        .await
    })
    .await
}

#[allow(clippy::too_many_arguments)]
async fn packaging_steps(
    driver: Driver,
    producer_base_url: &str,
    email: &str,
    password: &str,
    organisation_id: &str,
    period: &str,
    declarer_name: &str,
    templates_dir: &Path,
    output_dir: &Path,
) -> EprResult<()> {
    driver.goto(producer_base_url).await?;

    let signin = SigninPage::new(driver);
    let dashboard = signin.login_producer(email, password).await?;
    let report_landing = dashboard.open_report_packaging_data().await?;
    let upload_page = report_landing.start_report_for_period(period).await?;

    let pom_file = create_pom_file(templates_dir, output_dir, organisation_id)?;
    let warnings = upload_page.upload_packaging_data(&pom_file).await?;
    warnings.keep_same_file().await?;
    let check_page = warnings.continue_to_check().await?;
    check_page.verify_uploaded_heading().await?;

    let declaration = check_page.continue_to_declaration().await?;
    let confirmation = declaration.submit_with_name(declarer_name).await?;
    confirmation.verify_submitted().await?;
    info!("packaging data submission completed");
    Ok(())
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::driver::Action;

    fn write_pom_template(dir: &Path) -> PathBuf {
        let templates = dir.join("templates");
        std::fs::create_dir_all(&templates).unwrap();
        std::fs::write(
            templates.join("pom-file-template.csv"),
            "organisation_id,organisation_size,packaging_material\n,L,PL\n",
        )
        .unwrap();
        templates
    }

    #[test]
    fn pom_file_overrides_only_the_organisation_id() {
        let dir = tempfile::tempdir().unwrap();
        let templates = write_pom_template(dir.path());

        let written = create_pom_file(&templates, &dir.path().join("out"), "100001").unwrap();

        let contents = std::fs::read_to_string(&written).unwrap();
        assert!(written.ends_with("pom_100001.csv"));
        assert!(contents.contains("100001,L,PL"));
    }

    #[tokio::test]
    async fn generated_pom_file_is_what_gets_uploaded() {
        let dir = tempfile::tempdir().unwrap();
        let templates = write_pom_template(dir.path());
        let output = dir.path().join("out");

        let driver = Driver::new();
        packaging_steps(
            driver.clone(),
            "https://producer.example",
            "fresh@example.test",
            "Password123",
            "100001",
            "January to June 2025 (large producers)",
            "Automation Tester",
            &templates,
            &output,
        )
        .await
        .unwrap();

        let actions = driver.actions();
        assert!(actions.contains(&Action::UploadFile {
            css: "#file".to_string(),
            path: output.join("pom_100001.csv"),
        }));
        // Keep-file choice precedes the final submit
        let keep = actions
            .iter()
            .position(|a| {
                *a == Action::Click {
                    css: "#UploadNewFile-1".to_string(),
                }
            })
            .expect("keep-same-file radio clicked");
        let submit = actions
            .iter()
            .position(|a| {
                *a == Action::Click {
                    css: "[data-testid='submission-declaration-button']".to_string(),
                }
            })
            .expect("declaration submitted");
        assert!(keep < submit);
    }
}
