pub mod attendance;
pub mod forecast;
