use crate::error::AppError;
use crate::notify::{Notice, Notifier};
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, notice: &Notice) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(&notice.summary)
            .text1(&notice.body)
            .show()
            .map_err(|err| AppError::io(err.to_string()))
    }
}
