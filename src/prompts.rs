//! Instruction templates sent to the assistant.

use crate::classifier::HandlingClass;

/// System message for statement extraction.
pub const EXTRACTION_SYSTEM: &str = "You extract SQL statements.";

/// System message for translation, reassembly and validation.
pub const TRANSLATION_SYSTEM: &str = "You translate SQL between dialects.";

/// Rewriting rules applied when rebuilding a procedure for SingleStore.
/// Order matters: the assistant is told to apply them in sequence.
pub const REASSEMBLY_RULES: [&str; 7] = [
    "Rewrite the header as CREATE OR REPLACE PROCEDURE, keeping any RETURNS clause \
     and adding the appropriate AUTHORIZE AS DEFINER or AUTHORIZE AS CURRENT_USER clause.",
    "Declare every local variable with DECLARE and an explicit default value; remove \
     modifiers that SingleStore does not support on query-type parameters.",
    "Replace multi-row returns with ECHO SELECT to emit a rowset, or use \
     RETURNS QUERY(...) where appropriate.",
    "Wrap the procedure between DELIMITER // and DELIMITER ; so that semicolons \
     inside the body are not treated as statement ends by MySQL clients.",
    "Remove or refactor DDL statements that SingleStore does not allow inside \
     procedures invoked from pipelines.",
    "Remove or rewrite any other unsupported statements (for example EXPLAIN BALANCE \
     or DDL inside a pipeline) to SingleStore equivalents.",
    "Keep nested DECLARE blocks, %ROWTYPE and %TYPE usages, and translate loops and \
     other control flow into SingleStore procedural extensions.",
];

/// Ask for the data-manipulation statements of a procedure, one per line.
pub fn extraction_prompt(procedure: &str) -> String {
    format!(
        "List each data manipulation statement (SELECT, INSERT, UPDATE, DELETE, MERGE) \
         in the following stored procedure. Return exactly one statement per line, in \
         the order they appear, and do not include any additional text.\n\n\
         STORED_PROCEDURE:\n{}\n\nSTATEMENTS:",
        procedure
    )
}

/// Ask for a complete SingleStore procedure built around `converted`.
pub fn reassembly_prompt(procedure: &str, converted: &str) -> String {
    let mut prompt = String::from(
        "You are an expert in SingleStore Helios stored-procedure syntax and semantics. \
         Take INPUT_PROCEDURE, find every construct SingleStore does not support, and \
         emit a fully valid SingleStore stored procedure as OUTPUT_PROCEDURE.\n\n\
         Apply these changes in order:\n",
    );
    for (i, rule) in REASSEMBLY_RULES.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, rule));
    }
    prompt.push_str(
        "\nOutput only the converted procedure code, with the DELIMITER commands, \
         inside SQL fences.\n\n",
    );
    prompt.push_str(&format!("INPUT_PROCEDURE:\n{}\n\nOUTPUT_PROCEDURE:\n", procedure));
    prompt.push_str(&format!(
        "\nUse these SingleStore statements for the procedure body, unchanged and in this order:\n{}\n",
        converted
    ));
    prompt
}

/// Ask the assistant to double-check an already transpiled statement.
pub fn validation_prompt(class: HandlingClass, sql: &str) -> String {
    format!(
        "Double check that the following {} is valid SingleStore SQL:\n{}",
        class.label(),
        sql
    )
}
