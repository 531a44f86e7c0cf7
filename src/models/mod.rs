pub mod notificationmodel;
pub mod pointsmodel;
pub mod usermodel;
