pub mod locations;
pub mod routes;
pub mod users;
