pub mod percolate;
pub mod post;
pub mod social_auth;
pub mod user;
