//! Stored procedure decomposition and reassembly.
//!
//! Neither step has a deterministic fallback: both need an understanding of
//! procedural control flow that the transpiler does not have, so assistant
//! failures are returned to the caller.

use crate::assistant::{ChatMessage, TextCompletionService};
use crate::error::{ConvertError, ConvertResult};
use crate::prompts;

use tracing::{debug, info};

/// Ordered DML statements extracted from one procedure body.
pub type StatementBatch = Vec<String>;

/// Ask the assistant for the procedure's DML statements, one per line.
pub async fn decompose(
    assistant: &dyn TextCompletionService,
    procedure: &str,
) -> ConvertResult<StatementBatch> {
    let messages = [
        ChatMessage::system(prompts::EXTRACTION_SYSTEM),
        ChatMessage::user(prompts::extraction_prompt(procedure)),
    ];

    let raw = assistant
        .complete(&messages)
        .await
        .map_err(ConvertError::ExtractionService)?;

    let batch = split_statement_lines(&raw);
    info!(statements = batch.len(), "procedure decomposed");
    Ok(batch)
}

/// Split an extraction reply into statements.
///
/// Lines are trimmed, empty lines dropped. Markdown fence lines are not
/// statements and are dropped too.
pub fn split_statement_lines(raw: &str) -> StatementBatch {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(str::to_string)
        .collect()
}

/// Ask the assistant to rebuild the procedure around already converted statements.
pub async fn reassemble(
    assistant: &dyn TextCompletionService,
    original: &str,
    converted: &str,
) -> ConvertResult<String> {
    let prompt = prompts::reassembly_prompt(original, converted);
    debug!(prompt_chars = prompt.len(), "requesting reassembly");

    let messages = [
        ChatMessage::system(prompts::TRANSLATION_SYSTEM),
        ChatMessage::user(prompt),
    ];

    let reply = assistant
        .complete(&messages)
        .await
        .map_err(ConvertError::ReassemblyService)?;

    Ok(reply.trim().to_string())
}

/// Frame converted statements for a MySQL-protocol client without an assistant call.
pub fn frame_delimited(converted: &str) -> String {
    format!("DELIMITER //\n{}\n//\nDELIMITER ;", converted.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        reply: Result<String, u16>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl Canned {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(code: u16) -> Self {
            Self {
                reply: Err(code),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextCompletionService for Canned {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ServiceError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(code) => Err(ServiceError::Status {
                    code: *code,
                    body: "model not found".into(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_decompose_splits_and_trims() {
        let assistant = Canned::ok("  SELECT 1;\n\n   UPDATE t SET a = 1;  \n\nDELETE FROM t;\n");
        let batch = decompose(&assistant, "CREATE PROCEDURE p AS ...").await.unwrap();
        assert_eq!(
            batch,
            vec!["SELECT 1;", "UPDATE t SET a = 1;", "DELETE FROM t;"]
        );

        let seen = assistant.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].content, prompts::EXTRACTION_SYSTEM);
    }

    #[test]
    fn test_split_drops_fences() {
        let batch = split_statement_lines("```sql\nSELECT 1;\n```");
        assert_eq!(batch, vec!["SELECT 1;"]);
    }

    #[tokio::test]
    async fn test_decompose_failure_propagates() {
        let assistant = Canned::failing(404);
        let err = decompose(&assistant, "CREATE PROCEDURE p").await.unwrap_err();
        assert!(matches!(err, ConvertError::ExtractionService(_)));
    }

    #[tokio::test]
    async fn test_reassemble_trims_and_embeds() {
        let assistant = Canned::ok("\n\nDELIMITER //\nCREATE OR REPLACE PROCEDURE p() AS BEGIN END //\nDELIMITER ;\n  ");
        let out = reassemble(&assistant, "CREATE PROCEDURE p AS BEGIN END", "SELECT 1;")
            .await
            .unwrap();
        assert!(out.starts_with("DELIMITER //"));
        assert!(out.ends_with("DELIMITER ;"));

        let seen = assistant.seen.lock().unwrap();
        assert_eq!(seen[0][0].content, prompts::TRANSLATION_SYSTEM);
        assert!(seen[0][1].content.contains("SELECT 1;"));
    }

    #[tokio::test]
    async fn test_reassemble_failure_propagates() {
        let assistant = Canned::failing(500);
        let err = reassemble(&assistant, "CREATE PROCEDURE p", "SELECT 1;")
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::ReassemblyService(_)));
    }

    #[test]
    fn test_frame_delimited() {
        assert_eq!(
            frame_delimited("SELECT 1;\nDELETE FROM t;\n"),
            "DELIMITER //\nSELECT 1;\nDELETE FROM t;\n//\nDELIMITER ;"
        );
    }
}
