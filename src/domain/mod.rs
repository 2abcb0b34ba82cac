// Domain layer: shared models and ports (interfaces).

pub mod model;
pub mod ports;

pub use model::{AccessToken, JsonMap, ReplyList};
pub use ports::AccessTokenProvider;
