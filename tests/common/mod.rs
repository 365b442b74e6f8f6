//! Scripted collaborators shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use s2convert::prelude::*;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Assistant that replays canned replies and records every request.
#[derive(Default)]
pub struct ScriptedAssistant {
    replies: Mutex<VecDeque<Result<String, ServiceError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: ServiceError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// User message of the n-th request.
    pub fn prompt(&self, n: usize) -> String {
        let requests = self.requests.lock().unwrap();
        requests[n]
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextCompletionService for ScriptedAssistant {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("SELECT 1;".to_string()))
    }
}

/// Keyword-driven transpiler.
///
/// Parsing fails on unbalanced parentheses. Transpiling fails on statements
/// containing `BROKEN`; otherwise the text is uppercased.
#[derive(Default)]
pub struct FakeTranspiler {
    transpiled: Mutex<Vec<(String, String)>>,
}

impl FakeTranspiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transpile_calls(&self) -> usize {
        self.transpiled.lock().unwrap().len()
    }

    /// `(text, read dialect)` of every transpile call.
    pub fn transpiled(&self) -> Vec<(String, String)> {
        self.transpiled.lock().unwrap().clone()
    }
}

impl DialectTranspiler for FakeTranspiler {
    fn parse(&self, text: &str, dialect: &str) -> Result<SqlUnit, TranspileError> {
        if text.matches('(').count() != text.matches(')').count() {
            return Err(TranspileError::Parse("unbalanced parentheses".into()));
        }
        let upper = text.to_uppercase();
        let shape = if upper.starts_with("CREATE PROCEDURE") {
            StatementShape::Create {
                kind: "procedure".into(),
            }
        } else if upper.starts_with("CREATE TABLE") {
            StatementShape::Create {
                kind: "TABLE".into(),
            }
        } else if upper.starts_with("INSERT") {
            StatementShape::Insert
        } else if upper.starts_with("DROP") || upper.starts_with("ALTER") {
            StatementShape::Ddl
        } else {
            StatementShape::Other
        };
        Ok(SqlUnit::new(shape, text, dialect))
    }

    fn transpile(&self, text: &str, read: &str, write: &str) -> Result<String, TranspileError> {
        assert_eq!(write, TARGET_DIALECT);
        self.transpiled
            .lock()
            .unwrap()
            .push((text.to_string(), read.to_string()));
        if text.contains("BROKEN") {
            return Err(TranspileError::Parse(format!("cannot parse '{}'", text)));
        }
        Ok(text.to_uppercase())
    }
}

pub const PROCEDURE: &str = "CREATE PROCEDURE dbo.archive_orders @cutoff DATE AS
BEGIN
    DECLARE @moved INT;
    INSERT INTO archive SELECT * FROM orders WHERE placed < @cutoff;
    DELETE FROM orders WHERE placed < @cutoff;
    SELECT COUNT(*) FROM archive;
END";
