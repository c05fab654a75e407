pub mod interview;
pub mod response;
