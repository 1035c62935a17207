pub mod notifier;

pub use notifier::{LogNotifier, NotificationSink, TelegramNotifier};
