use crate::error::AppError;
use crate::storage::{KeyValueStore, USER_EMAIL_KEY, USER_NAME_KEY};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Reads the profile; missing keys and read failures yield empty fields.
pub fn load_profile<S: KeyValueStore + ?Sized>(store: &S) -> Profile {
    Profile {
        name: read_field(store, USER_NAME_KEY),
        email: read_field(store, USER_EMAIL_KEY),
    }
}

/// Writes the given fields; `None` leaves a field untouched and a blank value
/// removes it.
pub fn save_profile<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<Profile, AppError> {
    if let Some(email) = email.map(str::trim).filter(|email| !email.is_empty())
        && !email.contains('@')
    {
        return Err(AppError::invalid_input("email must contain '@'"));
    }

    for (key, value) in [(USER_NAME_KEY, name), (USER_EMAIL_KEY, email)] {
        let Some(value) = value else { continue };
        let trimmed = value.trim();
        let result = if trimmed.is_empty() {
            store.remove(key)
        } else {
            store.set(key, trimmed)
        };
        result.inspect_err(|err| tracing::error!(error = %err, key, "failed to save profile"))?;
    }

    Ok(load_profile(&*store))
}

/// Time-of-day greeting, personalised when a name is known.
pub fn greeting(hour: u8, name: Option<&str>) -> String {
    let base = match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    };
    match name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("{base}, {name}"),
        None => base.to_string(),
    }
}

fn read_field<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.filter(|value| !value.trim().is_empty()),
        Err(err) => {
            tracing::warn!(error = %err, key, "profile field unreadable");
            None
        }
    }
}
