pub mod auth;
pub mod livestream;
pub mod saml;
