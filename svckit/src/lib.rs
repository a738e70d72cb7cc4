pub mod codes;
pub mod config;
pub mod errors;
pub mod filters;
pub mod http;
pub mod metrics;
pub mod pagination;
pub mod services;
pub mod types;

pub use config::{load_config, AdminDashConfig};
pub use errors::ApiError;
pub use filters::{BookingFilters, Sort, SortOrder};
pub use pagination::{compute_window, Page, PageWindow};
pub use services::AdminApi;
