pub mod operations;
pub mod responses;
pub mod route_types;
pub mod schemas;
