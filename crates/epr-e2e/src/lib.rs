//! End-to-end UI automation harness for the EPR producer and regulator
//! portals.
//!
//! The core of the crate is a page-object graph with typed state
//! transitions: each screen is a struct exposing only the actions valid on
//! it, and every action consumes the page and returns the struct for the
//! unique next screen. Flows thread a chain of awaited transitions through
//! that graph, calling out-of-band dependencies (email verification code,
//! company registry stream, generated CSV uploads) at fixed points.
//!
//! ```text
//! SignIn → CreateAccount → RegisteredCharity → RegisteredWithCompaniesHouse
//!        → CompaniesHouseNumber → ConfirmCompanyDetails → OrganisationNation
//!        → RoleInOrganisation → FullName → TelephoneNumber → CheckYourDetails
//!        → Declaration → AccountCreated → UsingCompliance → Dashboard
//! ```
//!
//! Real browser control (chromiumoxide over CDP) sits behind the `browser`
//! cargo feature; without it a recording mock backs the same driver API so
//! the graph and the flows are unit-testable.

#![warn(missing_docs)]

pub mod browser;
pub mod companies;
pub mod config;
pub mod csvgen;
pub mod driver;
pub mod flows;
pub mod notify;
pub mod pages;
pub mod result;

pub use browser::{BrowserConfig, Session};
pub use companies::{CompaniesHouseClient, CompaniesHouseConfig, CompanyRecord};
pub use config::{load_config, Config, Environment, Secrets, DEFAULT_PROFILE};
pub use csvgen::create_csv_from_template;
pub use driver::Driver;
pub use flows::{EnrolmentResult, FlowContext};
pub use notify::{NotificationsClient, NotifyConfig};
pub use result::{EprError, EprResult};
