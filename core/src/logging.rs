use log::Level;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// Structured diagnostic record emitted through the `log` facade.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub id: String,
    pub ts: i64,
    pub level: String,
    pub code: Option<String>,
    pub module: String,
    pub message: String,
    pub explain: Option<String>,
    pub data: Option<Value>,
}

#[cfg(test)]
thread_local! {
    static CAPTURED: std::cell::RefCell<Vec<EventRecord>> = std::cell::RefCell::new(Vec::new());
}

/// Drain the records emitted on this thread.
#[cfg(test)]
pub(crate) fn take_captured() -> Vec<EventRecord> {
    CAPTURED.with(|captured| std::mem::take(&mut *captured.borrow_mut()))
}

pub fn log_event(
    level: Level,
    code: Option<&str>,
    module: &str,
    message: &str,
    explain: Option<&str>,
    data: Option<Value>,
) -> EventRecord {
    let record = EventRecord {
        id: Uuid::new_v4().to_string(),
        ts: OffsetDateTime::now_utc().unix_timestamp(),
        level: level.as_str().to_lowercase(),
        code: code.map(str::to_string),
        module: module.to_string(),
        message: message.to_string(),
        explain: explain.map(str::to_string),
        data,
    };
    match serde_json::to_string(&record) {
        Ok(line) => log::log!(target: module, level, "{line}"),
        Err(_) => log::log!(target: module, level, "{message}"),
    }
    #[cfg(test)]
    CAPTURED.with(|captured| captured.borrow_mut().push(record.clone()));
    record
}
