//! # caravel_cloud
//!
//! Cloud identity resolution and post-provision configuration for
//! Caravel.
//!
//! The cloud CLI is an opaque external collaborator: this crate wraps the
//! operations the workflow consumes (account listing/selection/login,
//! hostname and certificate binding, bot endpoint update, VPN profile
//! generation) and drives the ordered post-provisioning chain over the
//! outputs a successful apply produced.

pub mod configurator;
pub mod control;
pub mod error;
pub mod identity;

pub use configurator::{
    ConfigureError, ConfigureOutcome, ConfigureStep, ConfigureStepError, DomainBinding,
    PostProvisionConfigurator, VPN_CLIENT_CONFIG_FILE,
};
pub use control::AzureControlPlane;
pub use error::{CertificateLookupError, ControlPlaneError, IdentityError};
pub use identity::IdentityResolver;
