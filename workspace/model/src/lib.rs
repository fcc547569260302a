pub mod chat;
pub mod forecast;
pub mod sales_group;
pub mod status;

pub use chat::{ChatMessage, Role};
pub use forecast::{ForecastOptions, ForecastRecord, Horizon};
pub use sales_group::{ALL_CATEGORIES, SalesGroup, normalize_tags, parse_tag_list};
pub use status::{GroupStatus, PipelineEvent, StatusError};

// Re-export tracing for use in dependent crates
pub use tracing;
