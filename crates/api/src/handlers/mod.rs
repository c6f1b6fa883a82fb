pub mod contact;
pub mod dogs;
pub mod images;
pub mod site;
