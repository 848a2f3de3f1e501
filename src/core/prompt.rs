use crate::domain::model::FixRequest;

const DEFAULT_INSTRUCTIONS: &str =
    "No specific instructions provided. Please analyze and fix any obvious bugs.";

pub const FILE_START_MARKER: &str = "START_FILE: ";
pub const FILE_END_MARKER: &str = "END_FILE";

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Renders the single prompt sent to the model for a fix request.
///
/// The reply format it asks for is what [`crate::core::response::parse_fixed_files`]
/// understands: one `START_FILE: <path>` ... `END_FILE` block per changed file.
pub fn build_prompt(request: &FixRequest) -> String {
    let instructions = if request.instructions.is_empty() {
        DEFAULT_INSTRUCTIONS
    } else {
        request.instructions.as_str()
    };

    let mut lines: Vec<String> = vec![
        "You are an expert AI code-fixing agent, BugFixer.ai.".to_string(),
        "A user has uploaded a project with the following files and structure.".to_string(),
        "Your task is to fix the bug(s) described in their instructions, preserving the exact file structure.".to_string(),
        "\n--- USER INSTRUCTIONS ---".to_string(),
        instructions.to_string(),
        "\n--- OPTIONAL OPTIMIZATIONS ---".to_string(),
        format!("- Fix Linting Errors: {}", yes_no(request.options.fix_lint)),
        format!(
            "- Add Explanatory Comments: {}",
            yes_no(request.options.add_comments)
        ),
        "\n--- PROJECT FILES ---".to_string(),
    ];

    for file in request.files.iter() {
        lines.push(format!("\n--- File: {} ---", file.path));
        lines.push(file.content.clone());
        lines.push("--- End of File ---".to_string());
    }

    lines.push("\n--- YOUR TASK ---".to_string());
    lines.push(
        "Generate the corrected code for all files that need changes. \
         For each file you modify, you MUST provide the output in the following format, \
         and only this format:"
            .to_string(),
    );
    lines.push(format!(
        "{}[full/path/to/file.js]\n[... the complete, corrected code for this file ...]\n{}",
        FILE_START_MARKER, FILE_END_MARKER
    ));
    lines.push(
        "If a file does not need any changes, do not include it in your response.".to_string(),
    );

    lines.join("\n")
}
