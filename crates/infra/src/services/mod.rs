mod notification;

pub use notification::{
    INotificationSender, NotificationOutcome, NotificationPayload, PushGatewaySender,
    SentNotification, StubNotificationSender,
};
