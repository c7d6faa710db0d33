pub mod editor;
pub mod livestream;
