pub mod active_window;
pub mod announcements;
pub mod authorizer;
pub mod metrics;
pub mod timestamp;
