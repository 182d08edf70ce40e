pub mod borrower;
pub mod credit_mesh;
pub mod decision;
pub mod home;
pub mod not_found;
pub mod shopkeeper;
pub mod tcn_agent;
