//! Types shared between the backend and any page that draws its forms.

pub mod domain;
pub mod shared;
