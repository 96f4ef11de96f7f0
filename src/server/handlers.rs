pub mod crls;
pub mod health;
