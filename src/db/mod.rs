pub mod cache;
pub mod categorydb;
pub mod db;
pub mod notificationdb;
pub mod pointsdb;
pub mod userdb;
