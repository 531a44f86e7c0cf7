pub mod error;
pub mod ledger_service;
pub mod levels;
pub mod notification_service;
pub mod restriction_service;
