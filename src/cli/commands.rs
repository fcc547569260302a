pub mod ask;
pub mod dashboard;
pub mod forecast;
pub mod groups;
pub mod history;
pub mod overview;
pub mod upload;

pub use ask::ask;
pub use dashboard::dashboard;
pub use forecast::forecast;
pub use groups::groups;
pub use history::history;
pub use overview::overview;
pub use upload::{UploadRequest, upload};
