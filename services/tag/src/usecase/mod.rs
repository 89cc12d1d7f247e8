pub mod admin;
pub mod contact;
pub mod lookup;
pub mod otp;
pub mod resolve;
