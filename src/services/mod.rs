pub mod alumni_service;
pub mod alumni_service_impl;
pub use alumni_service::{AlumniError, AlumniService};
pub use alumni_service_impl::SeaOrmAlumniService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, RegisterRequest};
pub use auth_service_impl::SeaOrmAuthService;

pub mod assistant;
pub use assistant::{
    AssistantError, AssistantService, DefaultAssistantService, DraftEmailRequest, RankedSearch,
    SummaryRequest,
};

pub mod prompts;
pub mod query_expansion;
