mod customer;
mod payment;
mod reminder;
mod status;
mod template;

pub mod dtos {
    pub use crate::customer::dtos::*;
    pub use crate::payment::dtos::*;
    pub use crate::reminder::dtos::*;
    pub use crate::template::dtos::*;
}

pub use crate::customer::api::*;
pub use crate::payment::api::*;
pub use crate::reminder::api::*;
pub use crate::status::api::*;
pub use crate::template::api::*;
