mod health;
mod media;
mod reviews;
mod upload;

pub use health::health_handler;
pub use media::{delete_media_handler, list_media_handler};
pub use reviews::{
    delete_review_handler, list_reviews_handler, review_result_handler, review_status_handler,
    start_review_handler,
};
pub use upload::upload_handler;
