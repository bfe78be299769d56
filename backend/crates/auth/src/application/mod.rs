pub mod access_token;
pub mod admin;
pub mod config;
pub mod refresh;
pub mod session;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod two_factor;
pub mod verify_email;
