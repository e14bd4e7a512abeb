pub mod cache;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod photos;
pub mod recent;
pub mod routes;
pub mod ws;

pub use routes::create_router;
pub use ws::WsMessage;
