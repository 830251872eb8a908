pub mod image;
pub mod repair_request;
pub mod review;
pub mod service_center;
pub mod technician;
pub mod user;
