pub mod page_routes;
pub mod submit_routes;
