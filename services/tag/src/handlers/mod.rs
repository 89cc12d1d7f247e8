pub mod admin;
pub mod emergency;
pub mod health;
pub mod otp;
pub mod qr;
