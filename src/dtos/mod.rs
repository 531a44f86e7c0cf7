pub mod notificationdtos;
pub mod pointsdtos;
pub mod userdtos;
