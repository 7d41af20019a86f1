pub mod convert;
pub mod version;
