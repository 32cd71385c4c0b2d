pub mod http_feed;
pub mod util;

pub use http_feed::HttpPriceFeed;
pub use util::RetryPolicy;
