use serde::Serialize;

use crate::models::notificationmodel::Notification;

#[derive(Debug, Serialize)]
pub struct NotificationListResponseDto {
    pub status: String,
    pub notifications: Vec<Notification>,
    pub results: i64,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponseDto {
    pub status: String,
    pub unread_count: i64,
}
