use crate::error::AppError;
use crate::notify::{Notice, Notifier};
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        Notification::new()
            .appname("studymate")
            .summary(&notice.summary)
            .body(&notice.body)
            .show()
            .map(|_| ())
            .map_err(|err| AppError::io(err.to_string()))
    }
}
