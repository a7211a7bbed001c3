mod helpers;

mod registration_test;
mod token_test;
