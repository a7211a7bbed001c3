pub mod activation;
pub mod authenticate;
pub mod registration;
pub mod token;
