pub mod retire;
