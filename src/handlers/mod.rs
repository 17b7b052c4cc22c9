pub mod auth;
pub mod drafts;
pub mod employees;
pub mod payments;
pub mod periods;
pub mod shared;
pub mod submissions;
