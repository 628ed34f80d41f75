//! Splitting a multi-session dump into per-session record lists.

use super::schema::Record;
use log::debug;
use std::collections::HashMap;

/// All records captured under one trace execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Empty when the records carried no session id
    pub id: String,
    pub records: Vec<Record>,
}

/// Group records by `sessionId`, keeping first-seen session order and
/// the original record order within each session
pub fn split_sessions(records: Vec<Record>) -> Vec<Session> {
    let mut sessions: Vec<Session> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let key = record.session_id.clone().unwrap_or_default();

        match index.get(&key) {
            Some(&pos) => sessions[pos].records.push(record),
            None => {
                index.insert(key.clone(), sessions.len());
                sessions.push(Session {
                    id: key,
                    records: vec![record],
                });
            }
        }
    }

    debug!("Split dump into {} sessions", sessions.len());

    sessions
}
