pub mod domain;
pub mod foundation;
