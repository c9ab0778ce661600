//! Page objects for the producer and regulator portals.
//!
//! One struct per screen, holding nothing but the session driver. A
//! transition consumes its page value and returns the struct for the unique
//! next screen, so the multi-page workflow forms a statically navigable
//! graph: an action that is not valid on a screen simply does not exist on
//! its type.

pub mod create_account;
pub mod dashboard;
pub mod packaging;
pub mod registration;
pub mod regulator;
pub mod signin;

pub use create_account::{CreateAccountPage, OrganisationRole, UkNation};
pub use dashboard::ProducerDashboardPage;
pub use packaging::ReportPackagingDataPage;
pub use registration::{PaymentMethod, RegistrationGuidancePage, RegistrationTaskListPage};
pub use regulator::RegulatorHomePage;
pub use signin::SigninPage;

use crate::result::EprError;
use std::str::FromStr;

/// Yes/No answer to a closed radio-button question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    /// Affirmative
    Yes,
    /// Negative
    No,
}

impl YesNo {
    /// DOM value carried by the corresponding radio input
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl FromStr for YesNo {
    type Err = EprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Self::Yes),
            "no" | "n" => Ok(Self::No),
            _ => Err(EprError::InvalidChoice {
                field: "yes/no",
                value: s.to_string(),
            }),
        }
    }
}
